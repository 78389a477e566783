use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use crate::models::conversion::{ConversionResult, ConversionTask};
use crate::service::converter::ConversionAdapter;
use crate::utils::logger::RunLogger;
use crate::utils::utils::create_progress_bar;

/// 將清單切成連續的批次，除最後一批外每批恰好 `size` 個
pub fn partition<T>(items: &[T], size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(size.get()).collect()
}

/// 批次排程：每批內並行轉換，全部完成後等待固定時間再處理下一批
pub struct BatchScheduler {
    adapter: Arc<ConversionAdapter>,
    logger: Arc<dyn RunLogger>,
    max_concurrent: NonZeroUsize,
    pause: Duration,
    no_progress: bool,
}

impl BatchScheduler {
    pub fn new(
        adapter: Arc<ConversionAdapter>,
        logger: Arc<dyn RunLogger>,
        max_concurrent: NonZeroUsize,
        pause: Duration,
    ) -> Self {
        BatchScheduler { adapter, logger, max_concurrent, pause, no_progress: false }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.no_progress = !show;
        self
    }

    pub fn max_concurrent(&self) -> NonZeroUsize {
        self.max_concurrent
    }

    /// 依批次順序、批內原始順序返回每個檔案的結果。
    /// 取消（丟棄此 future）時，當前批次已派發的工作會隨 JoinSet 一起中止。
    pub async fn run(&self, tasks: &[ConversionTask]) -> Vec<ConversionResult> {
        let chunks = partition(tasks, self.max_concurrent);
        let total_chunks = chunks.len();
        let progress = create_progress_bar(tasks.len() as u64, self.no_progress);
        let mut results = Vec::with_capacity(tasks.len());

        for (i, chunk) in chunks.iter().enumerate() {
            self.logger.log(&format!("處理第 {}/{} 批（{} 個檔案）", i + 1, total_chunks, chunk.len()));

            let mut set = JoinSet::new();
            for (index, task) in chunk.iter().cloned().enumerate() {
                let adapter = Arc::clone(&self.adapter);
                set.spawn(async move { (index, adapter.convert(&task).await) });
            }

            let mut slots: Vec<Option<ConversionResult>> = (0..chunk.len()).map(|_| None).collect();
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok((index, result)) => {
                        progress.file_done(&result.file_name, result.success);
                        slots[index] = Some(result);
                    }
                    Err(e) => log::error!("轉換工作異常結束：{}", e),
                }
            }

            for (slot, task) in slots.into_iter().zip(chunk.iter()) {
                results.push(slot.unwrap_or_else(|| {
                    self.logger.log(&format!("失敗：{} - 轉換工作異常結束", task.file_name));
                    ConversionResult::failure(&task.file_name, "轉換工作異常結束", 0.0)
                }));
            }

            if i + 1 < total_chunks {
                self.logger.log(&format!("等待 {:.1} 秒後處理下一批...", self.pause.as_secs_f64()));
                tokio::time::sleep(self.pause).await;
            }
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        progress.finish(succeeded, results.len() - succeeded);
        results
    }
}
