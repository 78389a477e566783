use dialoguer::{Confirm, Input, Select};
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::config::{
    default_extensions, normalize_extension, validate_extensions, Mode, DEFAULT_BATCH_PAUSE_SECS,
    DEFAULT_LOG_FILE, DEFAULT_MAX_CONCURRENT, DEFAULT_OUTPUT, SUPPORTED_EXTENSIONS,
};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::utils::convert::ConversionRunner;
use crate::utils::utils::setup_logging;

pub fn process_interactive_mode() -> io::Result<String> {
    setup_logging("info")?;
    println!("=== Office 批次 PDF 轉換 - 互動模式 ===");
    let use_default_config = get_default_config_option()?;
    let input = get_input_path()?;
    let output = get_output_path()?;

    let config_port: Box<dyn ConfigPort> = if use_default_config {
        Box::new(DefaultConfigAdapter::new(input, output))
    } else {
        Box::new(InteractiveConfigAdapter::new(input, output))
    };
    let config = ConfigService::new(config_port).get_config()?;
    print_config(&config);

    let conversion_port: Box<dyn ConversionPort> = Box::new(ConversionRunner);
    conversion_port.execute(config)
}

fn print_config(config: &AppConfig) {
    println!("配置：");
    println!("   輸入目錄：{}", config.input.display());
    println!("   輸出目錄：{}", config.output.display());
    println!("   併發數：  每批 {} 個檔案", config.max_concurrent);
    if config.mode == Mode::Filtered {
        println!("   副檔名：  {}", config.only_extensions.join(", "));
    }
    println!();
}

pub fn get_default_config_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否使用預設配置？（整個目錄、每批 3 個檔案，僅需指定輸入和輸出路徑）")
        .default(true)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("預設配置選擇失敗: {}", e)))
}

pub fn get_input_path() -> io::Result<String> {
    Input::new()
        .with_prompt("請輸入 Office 文件所在目錄（例如：./documents）")
        .validate_with(|input: &String| -> Result<(), String> {
            if PathBuf::from(input).is_dir() { Ok(()) } else { Err(format!("目錄 '{}' 不存在", input)) }
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

pub fn get_output_path() -> io::Result<String> {
    Input::new()
        .with_prompt(format!("輸入輸出目錄（預設為 {}）", DEFAULT_OUTPUT))
        .default(DEFAULT_OUTPUT.to_string())
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

pub fn get_max_concurrent() -> io::Result<NonZeroUsize> {
    Input::<NonZeroUsize>::new()
        .with_prompt("每批同時轉換的檔案數（大檔案建議 1）")
        .default(NonZeroUsize::new(DEFAULT_MAX_CONCURRENT).unwrap_or(NonZeroUsize::MIN))
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("併發數輸入失敗: {}", e)))
}

pub fn get_mode() -> io::Result<Mode> {
    let mode = Select::new()
        .with_prompt("選擇轉換模式（使用方向鍵選擇，按 Enter 確認）")
        .items(&["整個目錄 - 轉換所有支援的文件", "指定副檔名 - 依序轉換選定的類型"])
        .default(0)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("轉換模式選擇失敗: {}", e)))?;
    Ok(if mode == 1 { Mode::Filtered } else { Mode::Batch })
}

pub fn get_only_extensions() -> io::Result<Vec<String>> {
    let answer: String = Input::new()
        .with_prompt(format!("輸入要轉換的副檔名，依序處理（可選：{}）", SUPPORTED_EXTENSIONS.join(",")))
        .default("docx,pptx".to_string())
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("副檔名輸入失敗: {}", e)))?;
    let extensions: Vec<String> = answer
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    validate_extensions(&extensions)?;

    let mut ordered = Vec::new();
    for ext in extensions.iter().map(|e| normalize_extension(e)) {
        if !ordered.contains(&ext) {
            ordered.push(ext);
        }
    }
    Ok(ordered)
}

// 交互配置適配器
pub struct InteractiveConfigAdapter {
    input: String,
    output: String,
}

impl InteractiveConfigAdapter {
    pub fn new(input: String, output: String) -> Self {
        InteractiveConfigAdapter { input, output }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let mode = get_mode()?;
        let only_extensions = if mode == Mode::Filtered { get_only_extensions()? } else { Vec::new() };
        let max_concurrent = get_max_concurrent()?;

        Ok(AppConfig {
            input: PathBuf::from(&self.input),
            output: PathBuf::from(&self.output),
            mode,
            max_concurrent,
            supported_extensions: default_extensions(),
            only_extensions,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            batch_pause: Duration::from_secs_f64(DEFAULT_BATCH_PAUSE_SECS),
            task_timeout: None,
            no_progress: false,
            soffice: None,
        })
    }
}
