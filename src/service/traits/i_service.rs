use crate::error::ConvertError;
use crate::models::conversion::ConversionResult;
use crate::models::file::{FileCollectInput, FileCollectOutput};
use crate::models::report::BatchSummary;

// File 服務接口，負責找出待轉換的檔案
pub trait FileServiceTrait: Send + Sync {
    /// 掃描輸入目錄
    /// # 參數
    /// - input: 輸入/輸出目錄與支援的副檔名
    /// # 回傳
    /// - 成功時返回符合的檔案數與待轉換工作，輸入目錄不存在時返回 DirectoryNotFound
    fn collect_files(&self, input: FileCollectInput) -> Result<FileCollectOutput, ConvertError>;
}

// 報告服務接口，負責彙總並輸出轉換結果
pub trait ReportServiceTrait: Send + Sync {
    /// 計算統計並輸出報告、失敗清單與成功清單
    fn generate_report(&self, results: &[ConversionResult]) -> BatchSummary;
}
