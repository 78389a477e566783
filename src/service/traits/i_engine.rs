use tokio_util::sync::CancellationToken;
use crate::error::EngineError;

/// 交給引擎載入的原始文件
pub struct DocumentSource {
    /// 原始檔名，部分引擎依副檔名判斷格式
    pub file_name: String,
    pub bytes: Vec<u8>,
}

// 外部轉換引擎接口，呼叫皆為阻塞式
pub trait ConversionEngine: Send + Sync {
    fn name(&self) -> &str;

    /// 載入文件，格式錯誤或不支援時返回引擎錯誤
    fn load(&self, source: DocumentSource) -> Result<Box<dyn EngineDocument>, EngineError>;
}

// 已載入的文件，使用完畢必須 close
pub trait EngineDocument: Send {
    /// 輸出 PDF；`cancel` 觸發後應盡快中止並返回錯誤
    fn export_pdf(&mut self, cancel: &CancellationToken) -> Result<Vec<u8>, EngineError>;

    /// 釋放引擎資源，重複呼叫必須安全
    fn close(&mut self) -> Result<(), EngineError>;
}
