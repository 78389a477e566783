use std::path::PathBuf;
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;
use crate::models::conversion::ConversionResult;
use crate::models::report::BatchSummary;
use crate::service::traits::i_service::ReportServiceTrait;
use crate::utils::logger::RunLogger;

const BOX_WIDTH: usize = 64;

/// 報告服務，負責將轉換結果整理成固定寬度的文字報告
pub struct ReportService {
    logger: Arc<dyn RunLogger>,
    output_folder: PathBuf,
    log_file: PathBuf,
}

impl ReportService {
    pub fn new(logger: Arc<dyn RunLogger>, output_folder: PathBuf, log_file: PathBuf) -> Self {
        ReportService { logger, output_folder, log_file }
    }

    pub fn render(&self, summary: &BatchSummary) -> String {
        let border = "═".repeat(BOX_WIDTH);
        let mut lines = vec![
            format!("╔{}╗", border),
            center_row("批次轉換報告"),
            format!("╠{}╣", border),
            row(&format!("處理檔案總數：  {:>8}", summary.total)),
            row(&format!("成功：          {:>8}", summary.succeeded)),
            row(&format!("失敗：          {:>8}", summary.failed)),
            row(&format!("成功率：        {:>7.1}%", summary.success_rate)),
            row(""),
            row(&format!("輸入總大小：    {:>8.2} KB", summary.total_input_kb)),
            row(&format!("輸出總大小：    {:>8.2} KB", summary.total_output_kb)),
            row(&format!("壓縮比：        {:>7.1}%", summary.compression_ratio)),
            row(&format!("總耗時：        {:>8.2} 秒", summary.total_duration_seconds)),
            row(&format!("平均每檔：      {:>8.2} 秒", summary.average_duration_seconds)),
            format!("╚{}╝", border),
        ];
        lines.push(String::new());
        lines.push(format!("輸出目錄：{}", self.output_folder.display()));
        lines.push(format!("紀錄檔：{}", self.log_file.display()));
        lines.join("\n")
    }
}

impl ReportServiceTrait for ReportService {
    fn generate_report(&self, results: &[ConversionResult]) -> BatchSummary {
        let summary = BatchSummary::from_results(results);
        self.logger.log(&format!("\n{}", self.render(&summary)));

        let failed: Vec<&ConversionResult> = results.iter().filter(|r| !r.success).collect();
        if !failed.is_empty() {
            self.logger.log("失敗的檔案：");
            for (index, result) in failed.iter().enumerate() {
                self.logger.log(&format!(
                    "{}. {} - {}",
                    index + 1,
                    result.file_name,
                    result.error.as_deref().unwrap_or("未知錯誤")
                ));
            }
        }

        let succeeded: Vec<&ConversionResult> = results.iter().filter(|r| r.success).collect();
        if !succeeded.is_empty() {
            self.logger.log("成功轉換：");
            for (index, result) in succeeded.iter().enumerate() {
                self.logger.log(&format!(
                    "{}. {} -> {}",
                    index + 1,
                    result.file_name,
                    result.output_file_name().unwrap_or_default()
                ));
            }
        }

        summary
    }
}

// 依顯示寬度補齊，中文字元佔兩格
fn row(text: &str) -> String {
    let padding = BOX_WIDTH.saturating_sub(text.width() + 1);
    format!("║ {}{}║", text, " ".repeat(padding))
}

fn center_row(text: &str) -> String {
    let free = BOX_WIDTH.saturating_sub(text.width());
    let left = free / 2;
    format!("║{}{}{}║", " ".repeat(left), text, " ".repeat(free - left))
}
