#![allow(dead_code)]

use std::collections::HashMap;
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use office_to_pdf::config::config::{default_extensions, Mode};
use office_to_pdf::config::ports::AppConfig;
use office_to_pdf::error::EngineError;
use office_to_pdf::service::traits::i_engine::{ConversionEngine, DocumentSource, EngineDocument};

/// 依檔名決定的引擎行為
#[derive(Clone)]
pub enum Behavior {
    Pdf(usize),
    LoadError(&'static str),
    ExportError(&'static str),
    CloseError,
    Hang(Duration),
    Panic,
}

#[derive(Default)]
pub struct EngineStats {
    pub loads: AtomicUsize,
    pub closes: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub aborted: AtomicUsize,
}

impl EngineStats {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn aborted(&self) -> usize {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// 測試用引擎：不做任何轉換，依腳本返回固定大小的 PDF 或錯誤
pub struct ScriptedEngine {
    behaviors: HashMap<String, Behavior>,
    default_pdf_size: usize,
    delay: Duration,
    pub stats: Arc<EngineStats>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        ScriptedEngine {
            behaviors: HashMap::new(),
            default_pdf_size: 2048,
            delay: Duration::ZERO,
            stats: Arc::new(EngineStats::default()),
        }
    }

    pub fn with(mut self, file_name: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(file_name.to_string(), behavior);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl ConversionEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn load(&self, source: DocumentSource) -> Result<Box<dyn EngineDocument>, EngineError> {
        let behavior = self
            .behaviors
            .get(&source.file_name)
            .cloned()
            .unwrap_or(Behavior::Pdf(self.default_pdf_size));
        if let Behavior::LoadError(message) = behavior {
            return Err(EngineError::new(message));
        }
        self.stats.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedDocument {
            behavior,
            delay: self.delay,
            stats: Arc::clone(&self.stats),
            closed: false,
        }))
    }
}

struct ScriptedDocument {
    behavior: Behavior,
    delay: Duration,
    stats: Arc<EngineStats>,
    closed: bool,
}

impl EngineDocument for ScriptedDocument {
    fn export_pdf(&mut self, cancel: &CancellationToken) -> Result<Vec<u8>, EngineError> {
        let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let mut wait = self.delay;
        if let Behavior::Hang(duration) = &self.behavior {
            wait += *duration;
        }
        let finished = sleep_unless_cancelled(wait, cancel);
        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
        if !finished {
            self.stats.aborted.fetch_add(1, Ordering::SeqCst);
            return Err(EngineError::new("aborted"));
        }

        match &self.behavior {
            Behavior::Pdf(size) => Ok(vec![b'%'; *size]),
            Behavior::ExportError(message) => Err(EngineError::new(*message)),
            Behavior::CloseError | Behavior::Hang(_) => Ok(vec![b'%'; 1024]),
            Behavior::Panic => panic!("engine crashed"),
            Behavior::LoadError(message) => Err(EngineError::new(*message)),
        }
    }

    fn close(&mut self) -> Result<(), EngineError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        if let Behavior::CloseError = self.behavior {
            return Err(EngineError::new("handle already released"));
        }
        Ok(())
    }
}

/// 分段睡眠以便及早發現取消，返回是否睡滿
fn sleep_unless_cancelled(total: Duration, cancel: &CancellationToken) -> bool {
    let deadline = Instant::now() + total;
    while Instant::now() < deadline {
        if cancel.is_cancelled() {
            return false;
        }
        std::thread::sleep(Duration::from_millis(10).min(deadline.saturating_duration_since(Instant::now())));
    }
    true
}

pub fn write_files(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), format!("content of {}", name)).unwrap();
    }
}

pub fn config_for(input: &Path, output: &Path, max_concurrent: usize) -> AppConfig {
    AppConfig {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        mode: Mode::Batch,
        max_concurrent: NonZeroUsize::new(max_concurrent).unwrap(),
        supported_extensions: default_extensions(),
        only_extensions: Vec::new(),
        log_file: output.join("conversion-log.txt"),
        batch_pause: Duration::ZERO,
        task_timeout: None,
        no_progress: true,
        soffice: None,
    }
}

pub fn extensions(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|e| e.to_string()).collect()
}
