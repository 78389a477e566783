use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use chrono::{SecondsFormat, Utc};

/// 執行紀錄的輸出端，每個元件在建構時取得
pub trait RunLogger: Send + Sync {
    fn log(&self, message: &str);
}

pub fn timestamp_line(message: &str) -> String {
    format!("[{}] {}", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true), message)
}

#[derive(Default)]
struct LogFileState {
    file: Option<File>,
    warned: bool,
}

/// 同時寫到標準輸出與附加模式的紀錄檔；檔案在第一次寫入時才開啟，
/// 開啟失敗時下次寫入會再嘗試（例如輸出目錄稍後才建立）
pub struct FileLogger {
    path: PathBuf,
    state: Mutex<LogFileState>,
}

impl FileLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileLogger {
            path: path.into(),
            state: Mutex::new(LogFileState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunLogger for FileLogger {
    fn log(&self, message: &str) {
        let line = timestamp_line(message);
        println!("{}", line);

        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.file.is_none() {
            match OpenOptions::new().create(true).append(true).open(&self.path) {
                Ok(file) => state.file = Some(file),
                Err(e) => {
                    if !state.warned {
                        log::warn!("無法開啟紀錄檔 {}：{}，僅輸出至終端", self.path.display(), e);
                        state.warned = true;
                    }
                    return;
                }
            }
        }
        if let Some(file) = state.file.as_mut() {
            if let Err(e) = writeln!(file, "{}", line).and_then(|_| file.flush()) {
                log::warn!("寫入紀錄檔 {} 失敗：{}", self.path.display(), e);
            }
        }
    }
}

/// 保存在記憶體中的紀錄，供測試檢查輸出
#[derive(Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        MemoryLogger::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl RunLogger for MemoryLogger {
    fn log(&self, message: &str) {
        let mut lines = match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logger_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let logger = FileLogger::new(&path);
        assert!(!path.exists());

        logger.log("first");
        logger.log("second");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] first"));
        assert!(lines[1].ends_with("] second"));
    }

    #[test]
    fn file_logger_keeps_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "old line\n").unwrap();

        FileLogger::new(&path).log("new line");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("old line\n"));
        assert!(content.contains("] new line"));
    }

    #[test]
    fn log_file_opens_once_directory_exists() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("later");
        let logger = FileLogger::new(folder.join("run.log"));
        logger.log("before the folder exists");

        std::fs::create_dir(&folder).unwrap();
        logger.log("after");

        let content = std::fs::read_to_string(folder.join("run.log")).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("] after"));
    }

    #[test]
    fn timestamp_is_iso8601() {
        let line = timestamp_line("x");
        let stamp = &line[1..line.find(']').unwrap()];
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
