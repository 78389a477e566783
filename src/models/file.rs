use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::models::conversion::ConversionTask;

#[derive(Clone)]
pub struct FileCollectInput {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    /// 已正規化的副檔名（小寫、不含點）
    pub extensions: BTreeSet<String>,
}

#[derive(Debug)]
pub struct FileCollectOutput {
    /// 目錄中副檔名符合的文件數（含已轉換）
    pub total_matching: usize,
    pub pending: Vec<ConversionTask>,
}

impl FileCollectOutput {
    pub fn already_converted(&self) -> usize {
        self.total_matching - self.pending.len()
    }
}
