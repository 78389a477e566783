use clap::{Parser, ValueEnum};
use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::time::Duration;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["docx", "doc", "pptx", "ppt", "xlsx", "xls"];
pub const DEFAULT_OUTPUT: &str = "batch-converted";
pub const DEFAULT_LOG_FILE: &str = "conversion-log.txt";
pub const DEFAULT_MAX_CONCURRENT: usize = 3;
pub const DEFAULT_BATCH_PAUSE_SECS: f64 = 2.0;

#[derive(Parser, Clone)]
#[command(
    name = "office_to_pdf",
    about = "將 Office 文件（Word、PowerPoint、Excel）批次轉換為 PDF",
    long_about = "掃描輸入目錄中的 Office 文件，略過已有對應 PDF 的檔案，以固定併發數分批轉換並輸出統計報告。\n支援整個目錄（batch）、指定副檔名（filtered）與單一文件（single）三種模式。不帶任何參數執行時進入互動模式。\n使用 `--help` 查看詳細用法。",
    arg_required_else_help = true
)]
pub struct Cli {
    /// 輸入目錄（single 模式下為單一文件路徑）
    pub input: String,
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,
    #[arg(long, default_value = "batch")]
    pub mode: Mode,
    /// 每批同時轉換的檔案數
    #[arg(short = 'j', long, default_value_t = DEFAULT_MAX_CONCURRENT)]
    pub max_concurrent: usize,
    /// 覆寫支援的副檔名清單，例如 docx,pptx
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,
    /// filtered 模式下依序轉換的副檔名，例如 docx,pptx
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: String,
    /// 批次之間的等待秒數
    #[arg(long, default_value_t = DEFAULT_BATCH_PAUSE_SECS)]
    pub batch_pause: f64,
    /// 單一檔案轉換的逾時秒數，預設不限
    #[arg(long)]
    pub timeout: Option<f64>,
    /// LibreOffice 執行檔路徑，預設從 PATH 尋找 soffice
    #[arg(long)]
    pub soffice: Option<String>,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,
    #[arg(long, default_value_t = false)]
    pub show_config: bool,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Debug)]
pub enum Mode {
    Batch,
    Filtered,
    Single,
}

pub fn validate_input_path(input: &str) -> io::Result<&Path> {
    let path = Path::new(input);
    if !path.exists() {
        log::error!("輸入路徑不存在：{}", input);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入路徑 '{}' 不存在", input)
        ));
    }
    Ok(path)
}

/// 去除前導的點並轉為小寫，`.DOCX` 與 `docx` 視為相同
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

pub fn is_valid_extension(ext: &str) -> bool {
    let ext = normalize_extension(ext);
    !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn validate_extensions(extensions: &[String]) -> io::Result<BTreeSet<String>> {
    if extensions.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "副檔名清單不可為空"));
    }
    for ext in extensions {
        if !is_valid_extension(ext) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("無效的副檔名: {}", ext)));
        }
    }
    Ok(extensions.iter().map(|e| normalize_extension(e)).collect())
}

pub fn default_extensions() -> BTreeSet<String> {
    SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

pub fn validate_seconds(name: &str, seconds: f64) -> io::Result<Duration> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} 必須為非負數，收到 {}", name, seconds)
        ));
    }
    Duration::try_from_secs_f64(seconds).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("{} 超出可接受範圍：{}（{}）", name, seconds, e))
    })
}
