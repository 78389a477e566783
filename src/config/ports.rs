use std::collections::BTreeSet;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;
use crate::config::config::Mode;

// 應用配置結構體，封裝所有參數
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: Mode,
    pub max_concurrent: NonZeroUsize,
    pub supported_extensions: BTreeSet<String>,
    // filtered 模式下的轉換順序
    pub only_extensions: Vec<String>,
    pub log_file: PathBuf,
    pub batch_pause: Duration,
    pub task_timeout: Option<Duration>,
    pub no_progress: bool,
    pub soffice: Option<PathBuf>,
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> io::Result<AppConfig>;
}

// 轉換執行的 Port
pub trait ConversionPort {
    fn execute(&self, config: AppConfig) -> io::Result<String>;
}
