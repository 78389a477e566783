use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;
use crate::config::config::{
    default_extensions, Mode, DEFAULT_BATCH_PAUSE_SECS, DEFAULT_LOG_FILE, DEFAULT_MAX_CONCURRENT,
};
use crate::config::ports::{AppConfig, ConfigPort};

// 配置服務，負責選擇適當的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        self.config_port.get_config()
    }
}

// 預設配置適配器：整個目錄批次轉換、每批 3 個檔案、批次間等待 2 秒
pub struct DefaultConfigAdapter {
    input: String,
    output: String,
}

impl DefaultConfigAdapter {
    pub fn new(input: String, output: String) -> Self {
        DefaultConfigAdapter { input, output }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let max_concurrent = NonZeroUsize::new(DEFAULT_MAX_CONCURRENT).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "併發數必須大於 0")
        })?;
        Ok(AppConfig {
            input: PathBuf::from(&self.input),
            output: PathBuf::from(&self.output),
            mode: Mode::Batch,
            max_concurrent,
            supported_extensions: default_extensions(),
            only_extensions: Vec::new(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            batch_pause: Duration::from_secs_f64(DEFAULT_BATCH_PAUSE_SECS),
            task_timeout: None,
            no_progress: false,
            soffice: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_adapter_applies_explicit_defaults() {
        let service = ConfigService::new(Box::new(DefaultConfigAdapter::new(
            "in".to_string(),
            "out".to_string(),
        )));
        let config = service.get_config().unwrap();
        assert_eq!(config.mode, Mode::Batch);
        assert_eq!(config.max_concurrent.get(), 3);
        assert_eq!(config.batch_pause, Duration::from_secs(2));
        assert!(config.task_timeout.is_none());
        assert_eq!(config.supported_extensions.len(), 6);
    }
}
