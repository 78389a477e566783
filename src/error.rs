use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// 引擎回報的錯誤，訊息原樣保留以便寫入報告
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        EngineError(message.into())
    }
}

impl From<io::Error> for EngineError {
    fn from(e: io::Error) -> Self {
        EngineError(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("輸入目錄不存在：{}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("讀取檔案 {} 失敗：{source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("寫入檔案 {} 失敗：{source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("關閉引擎文件失敗：{0}")]
    Cleanup(EngineError),

    #[error("轉換逾時（{:.2} 秒）", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("轉換工作中止：{0}")]
    Task(String),
}

impl From<ConvertError> for io::Error {
    fn from(e: ConvertError) -> Self {
        let kind = match &e {
            ConvertError::DirectoryNotFound(_) => io::ErrorKind::NotFound,
            ConvertError::Read { source, .. } | ConvertError::Write { source, .. } => source.kind(),
            ConvertError::Timeout(_) => io::ErrorKind::TimedOut,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, e.to_string())
    }
}
