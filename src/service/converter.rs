use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use crate::error::{ConvertError, EngineError};
use crate::models::conversion::{ConversionResult, ConversionTask};
use crate::service::traits::i_engine::{ConversionEngine, DocumentSource, EngineDocument};
use crate::utils::logger::RunLogger;
use crate::utils::utils::{bytes_to_kb, duration_secs};

/// 轉換適配器：讀檔、交給引擎輸出 PDF、寫檔，所有錯誤都轉為失敗結果
pub struct ConversionAdapter {
    engine: Arc<dyn ConversionEngine>,
    logger: Arc<dyn RunLogger>,
    timeout: Option<Duration>,
}

impl ConversionAdapter {
    pub fn new(engine: Arc<dyn ConversionEngine>, logger: Arc<dyn RunLogger>) -> Self {
        ConversionAdapter { engine, logger, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn convert(&self, task: &ConversionTask) -> ConversionResult {
        let start = Instant::now();
        self.logger.log(&format!("開始轉換：{}", task.file_name));

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.try_convert(task)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ConvertError::Timeout(limit)),
            },
            None => self.try_convert(task).await,
        };
        let duration = duration_secs(start.elapsed());

        match outcome {
            Ok((input_kb, output_kb)) => {
                self.logger.log(&format!(
                    "成功：{}（{:.2}KB -> {:.2}KB），耗時 {:.2} 秒",
                    task.file_name, input_kb, output_kb, duration
                ));
                ConversionResult::success(task, input_kb, output_kb, duration)
            }
            Err(e) => {
                self.logger.log(&format!(
                    "失敗：{}，耗時 {:.2} 秒 - {}",
                    task.file_name, duration, e
                ));
                ConversionResult::failure(&task.file_name, e.to_string(), duration)
            }
        }
    }

    async fn try_convert(&self, task: &ConversionTask) -> Result<(f64, f64), ConvertError> {
        let bytes = tokio::fs::read(&task.input_path)
            .await
            .map_err(|source| ConvertError::Read { path: task.input_path.clone(), source })?;
        let input_kb = bytes_to_kb(bytes.len() as u64);
        log::debug!("讀取 {}，大小 {} 位元組", task.input_path.display(), bytes.len());

        // 此 future 被丟棄（逾時或取消）時通知阻塞中的引擎呼叫中止
        let cancel = CancellationToken::new();
        let _abandon = cancel.clone().drop_guard();

        let engine = Arc::clone(&self.engine);
        let logger = Arc::clone(&self.logger);
        let source = DocumentSource { file_name: task.file_name.clone(), bytes };
        let pdf = tokio::task::spawn_blocking(move || {
            export_with_engine(engine.as_ref(), logger.as_ref(), source, &cancel)
        })
        .await
        .map_err(|e| ConvertError::Task(e.to_string()))??;

        let written = write_atomically(&task.output_path, &pdf).await?;
        Ok((input_kb, bytes_to_kb(written)))
    }
}

/// 先寫入輸出目錄中的暫存檔，完整寫入後才改名為最終檔名，
/// 中途失敗或被取消時暫存檔會被刪除，不留下不完整的 PDF
async fn write_atomically(output_path: &Path, pdf: &[u8]) -> Result<u64, ConvertError> {
    let write_error = |source: io::Error| ConvertError::Write { path: output_path.to_path_buf(), source };
    let folder = output_path.parent().unwrap_or_else(|| Path::new("."));
    let partial = tempfile::Builder::new()
        .prefix(".office_to_pdf-")
        .suffix(".part")
        .tempfile_in(folder)
        .map_err(write_error)?;

    tokio::fs::write(partial.path(), pdf).await.map_err(write_error)?;
    let written = tokio::fs::metadata(partial.path()).await.map_err(write_error)?.len();
    partial.persist(output_path).map_err(|e| write_error(e.error))?;
    Ok(written)
}

fn export_with_engine(
    engine: &dyn ConversionEngine,
    logger: &dyn RunLogger,
    source: DocumentSource,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, EngineError> {
    let file_name = source.file_name.clone();
    let document = engine.load(source)?;
    let mut guard = OpenDocument { document, file_name: &file_name, logger };
    guard.document.export_pdf(cancel)
}

// 離開作用域時一定呼叫 close，失敗只記錄警告
struct OpenDocument<'a> {
    document: Box<dyn EngineDocument>,
    file_name: &'a str,
    logger: &'a dyn RunLogger,
}

impl Drop for OpenDocument<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.document.close() {
            let warning = ConvertError::Cleanup(e);
            log::warn!("{}：{}", self.file_name, warning);
            self.logger.log(&format!("警告：{} {}", self.file_name, warning));
        }
    }
}
