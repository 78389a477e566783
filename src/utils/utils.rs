use std::io;
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};
use log;

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    // 互動模式與 CLI 模式可能各呼叫一次，重複初始化時沿用第一次的設定
    if env_logger::Builder::new()
        .filter_level(log_level_filter)
        .try_init()
        .is_err()
    {
        log::debug!("日誌系統已初始化，略過");
    }
    Ok(())
}

pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
}

impl ProgressManager {
    pub fn new(total: u64, no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total);
            match ProgressStyle::default_bar().template("{msg} [{bar:40}] {pos}/{len} ETA: {eta_precise}") {
                Ok(style) => pb.set_style(style.progress_chars("##-")),
                Err(e) => log::debug!("進度條樣式無效：{}", e),
            }
            pb
        };
        ProgressManager { pb, no_progress }
    }

    pub fn file_done(&self, file_name: &str, success: bool) {
        if self.no_progress {
            return;
        }
        let status = if success { "完成" } else { "失敗" };
        self.pb.set_message(format!("{}：{}", status, file_name));
        self.pb.inc(1);
    }

    pub fn finish(&self, succeeded: usize, failed: usize) {
        if self.no_progress {
            return;
        }
        self.pb.finish_with_message(format!("轉換結束，成功 {} 個，失敗 {} 個", succeeded, failed));
    }
}

pub fn create_progress_bar(total: u64, no_progress: bool) -> ProgressManager {
    ProgressManager::new(total, no_progress)
}

/// 四捨五入到小數點後兩位
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn bytes_to_kb(size: u64) -> f64 {
    round2(size as f64 / 1024.0)
}

pub fn duration_secs(duration: Duration) -> f64 {
    round2(duration.as_secs_f64())
}

pub fn format_file_size(size: u64) -> String {
    if size < 1024 * 1024 {
        format!("{:.2} KB", size as f64 / 1024.0)
    } else {
        format!("{:.2} MB", size as f64 / (1024.0 * 1024.0))
    }
}
