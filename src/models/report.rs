use crate::models::conversion::ConversionResult;

/// 一次批次轉換的統計資料
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub total_input_kb: f64,
    pub total_output_kb: f64,
    /// 1 - 輸出/輸入 的百分比，可能為負值（PDF 比原檔大）
    pub compression_ratio: f64,
    pub total_duration_seconds: f64,
    pub average_duration_seconds: f64,
}

impl BatchSummary {
    pub fn from_results(results: &[ConversionResult]) -> Self {
        let total = results.len();
        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = total - succeeded;

        // 從 0.0 累加，空集合的 sum() 會得到 -0.0
        let total_input_kb = results.iter().filter_map(|r| r.input_size_kb).fold(0.0, |a, b| a + b);
        let total_output_kb = results.iter().filter_map(|r| r.output_size_kb).fold(0.0, |a, b| a + b);
        let total_duration_seconds = results.iter().map(|r| r.duration_seconds).fold(0.0, |a, b| a + b);

        let success_rate = if total == 0 {
            0.0
        } else {
            (succeeded as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };
        let compression_ratio = if total_input_kb > 0.0 {
            (1.0 - total_output_kb / total_input_kb) * 100.0
        } else {
            0.0
        };
        let average_duration_seconds = if total == 0 {
            0.0
        } else {
            total_duration_seconds / total as f64
        };

        BatchSummary {
            total,
            succeeded,
            failed,
            success_rate,
            total_input_kb,
            total_output_kb,
            compression_ratio,
            total_duration_seconds,
            average_duration_seconds,
        }
    }
}
