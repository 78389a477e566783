use std::io;
use crate::models::conversion::ConversionOutput;

// Facade 接口，負責協調檔案轉換流程
pub trait ConversionFacadeTrait {
    /// 依配置的模式執行轉換
    /// # 回傳
    /// - 成功時返回輸出目錄與每次執行的結果，無法建立執行環境時返回 IO 錯誤
    fn execute_conversion(&self) -> io::Result<ConversionOutput>;
}
