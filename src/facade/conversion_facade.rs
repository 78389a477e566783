use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use log::info;
use crate::config::config::{normalize_extension, Mode};
use crate::config::ports::AppConfig;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{ConversionOutput, ConversionResult, ConversionTask, RunOutcome};
use crate::models::file::FileCollectInput;
use crate::models::report::BatchSummary;
use crate::service::converter::ConversionAdapter;
use crate::service::file::FileService;
use crate::service::report::ReportService;
use crate::service::scheduler::BatchScheduler;
use crate::service::traits::i_engine::ConversionEngine;
use crate::service::traits::i_service::{FileServiceTrait, ReportServiceTrait};
use crate::utils::logger::RunLogger;
use crate::utils::utils::format_file_size;

const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

pub struct ConversionFacade {
    config: AppConfig,
    logger: Arc<dyn RunLogger>,
    file_service: Box<dyn FileServiceTrait>,
    report_service: Box<dyn ReportServiceTrait>,
    adapter: Arc<ConversionAdapter>,
    scheduler: BatchScheduler,
}

impl ConversionFacade {
    pub fn new(
        config: AppConfig,
        engine: Arc<dyn ConversionEngine>,
        logger: Arc<dyn RunLogger>,
        file_service: Box<dyn FileServiceTrait>,
        report_service: Box<dyn ReportServiceTrait>,
    ) -> Self {
        let adapter = Arc::new(
            ConversionAdapter::new(engine, Arc::clone(&logger)).with_timeout(config.task_timeout),
        );
        let scheduler = BatchScheduler::new(
            Arc::clone(&adapter),
            Arc::clone(&logger),
            config.max_concurrent,
            config.batch_pause,
        )
        .with_progress(!config.no_progress);
        ConversionFacade {
            config,
            logger,
            file_service,
            report_service,
            adapter,
            scheduler,
        }
    }

    /// 以預設的檔案服務與報告服務建立
    pub fn with_default_services(
        config: AppConfig,
        engine: Arc<dyn ConversionEngine>,
        logger: Arc<dyn RunLogger>,
    ) -> Self {
        let file_service = Box::new(FileService::new(Arc::clone(&logger)));
        let report_service = Box::new(ReportService::new(
            Arc::clone(&logger),
            config.output.clone(),
            config.log_file.clone(),
        ));
        ConversionFacade::new(config, engine, logger, file_service, report_service)
    }

    /// 找出待轉換檔案；輸入目錄不存在等錯誤只記錄，返回空清單
    pub fn discover(&self, extensions: &[String]) -> Vec<ConversionTask> {
        let input = FileCollectInput {
            input_folder: self.config.input.clone(),
            output_folder: self.config.output.clone(),
            extensions: extensions.iter().map(|e| normalize_extension(e)).collect(),
        };
        match self.file_service.collect_files(input) {
            Ok(output) => output.pending,
            Err(e) => {
                self.logger.log(&format!("掃描檔案時發生錯誤：{}", e));
                Vec::new()
            }
        }
    }

    pub async fn run_batch(&self) -> RunOutcome {
        self.run_batch_until(shutdown_signal()).await
    }

    /// 整個目錄的批次轉換，`shutdown` 完成時放棄尚未結束的批次
    pub async fn run_batch_until<F>(&self, shutdown: F) -> RunOutcome
    where
        F: Future<Output = ()>,
    {
        let start = Instant::now();
        self.logger.log("開始批次轉換...");
        if let Err(e) = tokio::fs::create_dir_all(&self.config.output).await {
            return self.fail(&format!("無法建立輸出目錄 {}：{}", self.config.output.display(), e));
        }

        let extensions: Vec<String> = self.config.supported_extensions.iter().cloned().collect();
        let tasks = self.discover(&extensions);
        if tasks.is_empty() {
            self.logger.log("沒有需要轉換的檔案，全部已處理完成！");
            return RunOutcome::NothingToConvert;
        }

        self.logger.log("待轉換檔案：");
        for (index, task) in tasks.iter().enumerate() {
            self.logger.log(&format!("{}. {}", index + 1, task.file_name));
        }
        self.logger.log(&format!("開始轉換 {} 個檔案...", tasks.len()));
        self.logger.log(&format!("每批同時處理 {} 個檔案", self.scheduler.max_concurrent()));

        tokio::pin!(shutdown);
        let results = tokio::select! {
            biased;
            _ = &mut shutdown => return self.cancelled(),
            results = self.scheduler.run(&tasks) => results,
        };

        self.logger.log(&format!("總處理時間：{:.2} 秒", start.elapsed().as_secs_f64()));
        RunOutcome::Completed(self.report_service.generate_report(&results))
    }

    pub async fn run_filtered(&self, extensions: &[String]) -> Vec<RunOutcome> {
        self.run_filtered_until(extensions, shutdown_signal()).await
    }

    /// 依給定順序逐一轉換各副檔名的檔案，每個副檔名各自產生報告
    pub async fn run_filtered_until<F>(&self, extensions: &[String], shutdown: F) -> Vec<RunOutcome>
    where
        F: Future<Output = ()>,
    {
        self.logger.log(&format!("開始指定副檔名轉換：{}", extensions.join(", ")));
        if let Err(e) = tokio::fs::create_dir_all(&self.config.output).await {
            return vec![self.fail(&format!("無法建立輸出目錄 {}：{}", self.config.output.display(), e))];
        }

        let tasks = self.discover(extensions);
        let groups: Vec<(String, Vec<ConversionTask>)> = extensions
            .iter()
            .map(|ext| {
                let ext = normalize_extension(ext);
                let group = tasks
                    .iter()
                    .filter(|task| extension_of(&task.file_name) == ext)
                    .cloned()
                    .collect();
                (ext, group)
            })
            .collect();
        for (ext, group) in &groups {
            self.logger.log(&format!("找到 {} 個 {} 檔案", group.len(), ext.to_uppercase()));
        }

        tokio::pin!(shutdown);
        let mut outcomes = Vec::with_capacity(groups.len());
        for (ext, group) in &groups {
            if group.is_empty() {
                outcomes.push(RunOutcome::NothingToConvert);
                continue;
            }
            self.logger.log(&format!("轉換 {} 檔案...", ext.to_uppercase()));
            let results = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    outcomes.push(self.cancelled());
                    return outcomes;
                }
                results = self.scheduler.run(group) => results,
            };
            outcomes.push(RunOutcome::Completed(self.report_service.generate_report(&results)));
        }
        outcomes
    }

    /// 單一文件轉換，輸出至 `<output>/<檔名>.pdf`
    pub async fn convert_single(&self, input_file: &Path) -> ConversionResult {
        let task = ConversionTask::for_file(input_file, &self.config.output);
        if let Err(e) = tokio::fs::create_dir_all(&self.config.output).await {
            let message = format!("無法建立輸出目錄 {}：{}", self.config.output.display(), e);
            self.logger.log(&format!("失敗：{} - {}", task.file_name, message));
            return ConversionResult::failure(&task.file_name, message, 0.0);
        }

        let result = self.adapter.convert(&task).await;
        if result.success {
            self.logger.log(&format!("輸出：{}", task.output_path.display()));
            if let Ok(meta) = tokio::fs::metadata(&task.output_path).await {
                self.logger.log(&format!("檔案大小：{}", format_file_size(meta.len())));
            }
        }
        result
    }

    fn fail(&self, message: &str) -> RunOutcome {
        self.logger.log(&format!("批次轉換失敗：{}", message));
        RunOutcome::Failed(message.to_string())
    }

    fn cancelled(&self) -> RunOutcome {
        self.logger.log("批次轉換已取消，未完成的轉換已中止");
        RunOutcome::Cancelled
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn execute_conversion(&self) -> io::Result<ConversionOutput> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let output_path = self.config.output.display().to_string();

        let outcomes = match self.config.mode {
            Mode::Batch => {
                info!("開始批次轉換，輸入目錄：{}，輸出目錄：{}", self.config.input.display(), output_path);
                vec![runtime.block_on(self.run_batch())]
            }
            Mode::Filtered => {
                info!("開始指定副檔名轉換：{:?}", self.config.only_extensions);
                runtime.block_on(self.run_filtered(&self.config.only_extensions))
            }
            Mode::Single => {
                info!("開始單檔轉換：{}", self.config.input.display());
                let result = runtime.block_on(self.convert_single(&self.config.input));
                let summary = BatchSummary::from_results(std::slice::from_ref(&result));
                vec![RunOutcome::Completed(summary)]
            }
        };

        // 被放棄的引擎呼叫仍在阻塞執行緒池中；給它們短暫時間觀察取消後即返回，不等待到結束
        runtime.shutdown_timeout(SHUTDOWN_GRACE);
        Ok(ConversionOutput { output_path, outcomes })
    }
}

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| normalize_extension(&ext.to_string_lossy()))
        .unwrap_or_default()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("無法監聽 Ctrl-C：{}", e);
        std::future::pending::<()>().await;
    }
}
