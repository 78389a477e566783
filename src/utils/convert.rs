use std::io;
use std::sync::Arc;
use crate::config::ports::{AppConfig, ConversionPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::RunOutcome;
use crate::service::engine::LibreOfficeEngine;
use crate::service::traits::i_engine::ConversionEngine;
use crate::utils::logger::{FileLogger, RunLogger};

// 以 LibreOffice 引擎與檔案紀錄執行轉換的 Port 實作
pub struct ConversionRunner;

impl ConversionRunner {
    fn engine(config: &AppConfig) -> io::Result<Arc<dyn ConversionEngine>> {
        let engine = match &config.soffice {
            Some(binary) => LibreOfficeEngine::new(binary),
            None => LibreOfficeEngine::locate()
                .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e.to_string()))?,
        };
        log::info!("使用轉換引擎：{}（{}）", engine.name(), engine.binary().display());
        Ok(Arc::new(engine))
    }
}

impl ConversionPort for ConversionRunner {
    fn execute(&self, config: AppConfig) -> io::Result<String> {
        let engine = Self::engine(&config)?;
        let file_logger = FileLogger::new(config.log_file.clone());
        log::info!("紀錄檔：{}", file_logger.path().display());
        let logger: Arc<dyn RunLogger> = Arc::new(file_logger);
        let facade = ConversionFacade::with_default_services(config, engine, logger);
        let output = facade.execute_conversion()?;

        for outcome in &output.outcomes {
            match outcome {
                RunOutcome::Completed(summary) if summary.failed > 0 => {
                    log::warn!("{} 個檔案轉換失敗，詳見紀錄檔", summary.failed)
                }
                RunOutcome::Failed(message) => log::error!("{}", message),
                RunOutcome::Cancelled => log::warn!("轉換已取消"),
                _ => {}
            }
        }
        Ok(output.output_path)
    }
}
