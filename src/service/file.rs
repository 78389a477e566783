use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::config::config::normalize_extension;
use crate::error::ConvertError;
use crate::models::conversion::ConversionTask;
use crate::models::file::{FileCollectInput, FileCollectOutput};
use crate::service::traits::i_service::FileServiceTrait;
use crate::utils::logger::RunLogger;

/// 檔案服務，掃描輸入目錄並排除已轉換的文件
pub struct FileService {
    logger: Arc<dyn RunLogger>,
}

impl FileService {
    pub fn new(logger: Arc<dyn RunLogger>) -> Self {
        FileService { logger }
    }
}

impl FileServiceTrait for FileService {
    fn collect_files(&self, input: FileCollectInput) -> Result<FileCollectOutput, ConvertError> {
        if !input.input_folder.is_dir() {
            return Err(ConvertError::DirectoryNotFound(input.input_folder.clone()));
        }

        let entries = fs::read_dir(&input.input_folder).map_err(|source| ConvertError::Read {
            path: input.input_folder.clone(),
            source,
        })?;

        let paths = readable_entries(
            entries.map(|entry| entry.map(|entry| entry.path())),
            &input.input_folder,
            self.logger.as_ref(),
        );

        let mut office_files = Vec::new();
        for path in paths {
            let file_name = match path.file_name() {
                Some(name) => name.to_string_lossy().to_string(),
                None => continue,
            };
            if !has_supported_extension(&file_name, &input) {
                continue;
            }
            if !path.is_file() {
                log::debug!("略過非一般檔案：{}", path.display());
                continue;
            }
            office_files.push(file_name);
        }

        self.logger.log(&format!(
            "在 {} 找到 {} 個 Office 文件",
            input.input_folder.display(),
            office_files.len()
        ));

        let total_matching = office_files.len();
        let pending: Vec<ConversionTask> = office_files
            .iter()
            .map(|name| ConversionTask::new(name, &input.input_folder, &input.output_folder))
            .filter(|task| !task.output_path.exists())
            .collect();

        let output = FileCollectOutput { total_matching, pending };
        self.logger.log(&format!(
            "{} 個檔案需要轉換（{} 個已轉換）",
            output.pending.len(),
            output.already_converted()
        ));
        Ok(output)
    }
}

// 無法讀取的目錄項目只記錄並略過，不影響其他檔案
fn readable_entries<I>(entries: I, folder: &Path, logger: &dyn RunLogger) -> Vec<PathBuf>
where
    I: Iterator<Item = io::Result<PathBuf>>,
{
    entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("讀取 {} 的目錄項目失敗：{}", folder.display(), e);
                logger.log(&format!("略過無法讀取的項目（{}）：{}", folder.display(), e));
                None
            }
        })
        .collect()
}

fn has_supported_extension(file_name: &str, input: &FileCollectInput) -> bool {
    Path::new(file_name)
        .extension()
        .map(|ext| input.extensions.contains(&normalize_extension(&ext.to_string_lossy())))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logger::MemoryLogger;

    #[test]
    fn unreadable_entry_is_skipped() {
        let logger = MemoryLogger::new();
        let folder = Path::new("docs");
        let entries = vec![
            Ok(folder.join("a.docx")),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            Ok(folder.join("b.pptx")),
        ];

        let paths = readable_entries(entries.into_iter(), folder, &logger);

        assert_eq!(paths, vec![folder.join("a.docx"), folder.join("b.pptx")]);
        assert!(logger.contains("略過無法讀取的項目"));
        assert!(logger.contains("denied"));
    }
}
