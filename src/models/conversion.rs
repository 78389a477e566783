use std::path::{Path, PathBuf};

use crate::models::report::BatchSummary;

/// 單一檔案的轉換工作，建立後不再變動
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionTask {
    pub file_name: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl ConversionTask {
    /// 依輸入目錄與輸出目錄建立工作，輸出檔名為原檔名去除副檔名後加上 `.pdf`
    pub fn new(file_name: &str, input_folder: &Path, output_folder: &Path) -> Self {
        ConversionTask {
            file_name: file_name.to_string(),
            input_path: input_folder.join(file_name),
            output_path: output_folder.join(pdf_file_name(file_name)),
        }
    }

    /// 以明確的輸入檔案路徑建立工作（單檔模式）
    pub fn for_file(input_path: &Path, output_folder: &Path) -> Self {
        let file_name = input_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| input_path.to_string_lossy().to_string());
        ConversionTask {
            output_path: output_folder.join(pdf_file_name(&file_name)),
            input_path: input_path.to_path_buf(),
            file_name,
        }
    }
}

pub fn pdf_file_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    format!("{}.pdf", stem)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub file_name: String,
    pub success: bool,
    pub input_size_kb: Option<f64>,
    pub output_size_kb: Option<f64>,
    pub duration_seconds: f64,
    pub error: Option<String>,
    pub output_path: Option<PathBuf>,
}

impl ConversionResult {
    pub fn success(
        task: &ConversionTask,
        input_size_kb: f64,
        output_size_kb: f64,
        duration_seconds: f64,
    ) -> Self {
        ConversionResult {
            file_name: task.file_name.clone(),
            success: true,
            input_size_kb: Some(input_size_kb),
            output_size_kb: Some(output_size_kb),
            duration_seconds,
            error: None,
            output_path: Some(task.output_path.clone()),
        }
    }

    pub fn failure(file_name: &str, error: impl Into<String>, duration_seconds: f64) -> Self {
        ConversionResult {
            file_name: file_name.to_string(),
            success: false,
            input_size_kb: None,
            output_size_kb: None,
            duration_seconds,
            error: Some(error.into()),
            output_path: None,
        }
    }

    /// 輸出檔案名稱（不含目錄），失敗時為 None
    pub fn output_file_name(&self) -> Option<String> {
        self.output_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().to_string())
    }
}

/// 一次執行的結束狀態
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    NothingToConvert,
    Completed(BatchSummary),
    Cancelled,
    Failed(String),
}

#[derive(Debug)]
pub struct ConversionOutput {
    pub output_path: String,
    pub outcomes: Vec<RunOutcome>,
}
