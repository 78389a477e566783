use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use clap::Parser;
use crate::config::config::{
    default_extensions, normalize_extension, validate_extensions, validate_input_path,
    validate_seconds, Cli, Mode,
};
use crate::action::interactive::process_interactive_mode;
use crate::utils::utils::setup_logging;
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::service::config_service::ConfigService;
use crate::utils::convert::ConversionRunner;

pub fn process_args(args: Vec<String>) -> io::Result<String> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<String> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let config_service = ConfigService::new(Box::new(CliConfigAdapter::new(cli.clone())));
    let config = config_service.get_config()?;

    // 若啟用 --show-config，在轉換前顯示配置
    if cli.show_config {
        println!("實際使用的配置：{:#?}", config);
    }

    let conversion_port: Box<dyn ConversionPort> = Box::new(ConversionRunner);
    conversion_port.execute(config)
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        // 單檔模式需要輸入檔案存在；目錄模式下輸入目錄不存在只會記錄錯誤
        if self.cli.mode == Mode::Single {
            let path = validate_input_path(&self.cli.input)?;
            if !path.is_file() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("single 模式需要檔案路徑，'{}' 不是檔案", self.cli.input)
                ));
            }
        }

        let max_concurrent = NonZeroUsize::new(self.cli.max_concurrent).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "--max-concurrent 必須大於 0")
        })?;

        let supported_extensions = match &self.cli.extensions {
            Some(extensions) => validate_extensions(extensions)?,
            None => default_extensions(),
        };

        let only_extensions = match (&self.cli.mode, &self.cli.only) {
            (Mode::Filtered, Some(only)) => {
                validate_extensions(only)?;
                let mut ordered: Vec<String> = Vec::new();
                for ext in only.iter().map(|e| normalize_extension(e)) {
                    if !ordered.contains(&ext) {
                        ordered.push(ext);
                    }
                }
                ordered
            }
            (Mode::Filtered, None) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "filtered 模式需要以 --only 指定副檔名，例如 --only docx,pptx"
                ));
            }
            (_, Some(_)) => {
                log::warn!("--only 僅在 filtered 模式下有效，已忽略");
                Vec::new()
            }
            (_, None) => Vec::new(),
        };

        let batch_pause = validate_seconds("--batch-pause", self.cli.batch_pause)?;
        let task_timeout = self
            .cli
            .timeout
            .map(|secs| validate_seconds("--timeout", secs))
            .transpose()?;

        Ok(AppConfig {
            input: PathBuf::from(&self.cli.input),
            output: PathBuf::from(&self.cli.output),
            mode: self.cli.mode,
            max_concurrent,
            supported_extensions,
            only_extensions,
            log_file: PathBuf::from(&self.cli.log_file),
            batch_pause,
            task_timeout,
            no_progress: self.cli.no_progress,
            soffice: self.cli.soffice.as_ref().map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config_from(args: &[&str]) -> io::Result<AppConfig> {
        let mut argv = vec!["office_to_pdf"];
        argv.extend_from_slice(args);
        CliConfigAdapter::new(Cli::parse_from(argv)).get_config()
    }

    #[test]
    fn batch_mode_defaults() {
        let config = config_from(&["./missing-input-is-fine"]).unwrap();
        assert_eq!(config.mode, Mode::Batch);
        assert_eq!(config.max_concurrent.get(), 3);
        assert_eq!(config.batch_pause, Duration::from_secs(2));
        assert_eq!(config.supported_extensions, default_extensions());
        assert!(config.only_extensions.is_empty());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(config_from(&["./in", "-j", "0"]).is_err());
    }

    #[test]
    fn filtered_mode_requires_only() {
        assert!(config_from(&["./in", "--mode", "filtered"]).is_err());
        let config = config_from(&["./in", "--mode", "filtered", "--only", ".DOCX,pptx,docx"]).unwrap();
        assert_eq!(config.only_extensions, vec!["docx".to_string(), "pptx".to_string()]);
    }

    #[test]
    fn single_mode_requires_existing_file() {
        assert!(config_from(&["/definitely/not/here.docx", "--mode", "single"]).is_err());

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.docx");
        std::fs::write(&file, b"doc").unwrap();
        let file_arg = file.to_string_lossy().to_string();
        let config = config_from(&[file_arg.as_str(), "--mode", "single"]).unwrap();
        assert_eq!(config.input, file);

        let dir_arg = dir.path().to_string_lossy().to_string();
        assert!(config_from(&[dir_arg.as_str(), "--mode", "single"]).is_err());
    }

    #[test]
    fn timeout_and_pause_are_parsed() {
        let config = config_from(&["./in", "--timeout", "30", "--batch-pause", "0.5"]).unwrap();
        assert_eq!(config.task_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.batch_pause, Duration::from_millis(500));
    }
}
