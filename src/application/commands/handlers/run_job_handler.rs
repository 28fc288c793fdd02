//! Run Job Handler - 批量文件处理编排

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::commands::dispatch_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{JobStoragePort, TaskSchedulerPort};
use crate::application::settings::DispatchSettings;
use crate::domain::engine::{select_engine, EngineChoice, EngineId};
use crate::domain::job::{
    build_command, new_file_id, new_job_id, sanitize_filename, JobReport, Task, TaskResult,
    WorkerArgs,
};
use crate::domain::Metrics;

/// 客户端未提供可用文件名时的兜底名称
const FALLBACK_FILENAME: &str = "upload.bin";

/// RunJob Handler - 每个文件一个任务，按文件大小自动选择引擎
pub struct RunJobHandler {
    settings: Arc<DispatchSettings>,
    storage: Arc<dyn JobStoragePort>,
    scheduler: Arc<dyn TaskSchedulerPort>,
}

impl RunJobHandler {
    pub fn new(
        settings: Arc<DispatchSettings>,
        storage: Arc<dyn JobStoragePort>,
        scheduler: Arc<dyn TaskSchedulerPort>,
    ) -> Self {
        Self {
            settings,
            storage,
            scheduler,
        }
    }

    pub async fn handle(&self, cmd: RunJob) -> Result<JobReport, ApplicationError> {
        let files: Vec<UploadedFile> = cmd
            .files
            .into_iter()
            .filter(|f| !f.filename.is_empty())
            .collect();
        if files.is_empty() {
            return Err(ApplicationError::validation("No files uploaded"));
        }

        // 先确定每个文件的引擎，再统一检查 worker 是否存在，缺失时不落盘也不执行
        let engines: Vec<EngineId> = files
            .iter()
            .map(|f| select_engine(cmd.engine, f.size()))
            .collect();
        let missing = self.settings.binaries.missing(engines.iter().copied());
        if !missing.is_empty() {
            let message = format!(
                "Executables not found in {}: {}",
                self.settings.binaries.install_dir.display(),
                missing.join(", ")
            );
            tracing::error!(missing = ?missing, "Worker executables missing");
            return Err(ApplicationError::configuration(message));
        }

        let mut logs = Vec::new();
        let (parallelism, note) = self.settings.resolve_parallelism(cmd.threads, cmd.procs);
        if let Some(note) = note {
            tracing::info!("{}", note);
            logs.push(note);
        }

        let job_id = new_job_id();
        tracing::info!(
            job_id = %job_id,
            engine = %cmd.engine,
            threads = parallelism.threads,
            procs = parallelism.procs,
            files = files.len(),
            "Job start"
        );
        logs.push(format!(
            "Job Start: Engine={}, Threads={}, Procs={}",
            cmd.engine, parallelism.threads, parallelism.procs
        ));

        let mut tasks = Vec::with_capacity(files.len());
        let mut filenames: HashMap<String, (String, EngineId, String)> = HashMap::new();

        for (file, engine) in files.iter().zip(engines) {
            let original_name =
                sanitize_filename(&file.filename).unwrap_or_else(|| FALLBACK_FILENAME.to_string());
            let mut file_id = new_file_id(&job_id);
            while filenames.contains_key(&file_id) {
                file_id = new_file_id(&job_id);
            }

            let input = self
                .storage
                .save_upload(&format!("{}_{}", file_id, original_name), &file.data)
                .await?;

            if cmd.engine == EngineChoice::Auto {
                let message = format!(
                    "File '{}' ({} bytes) -> Auto-selected Engine: {}",
                    original_name,
                    file.size(),
                    engine
                );
                tracing::info!(job_id = %job_id, file = %original_name, size = file.size(), engine = %engine, "Engine auto-selected");
                logs.push(message);
            }

            let output_name = format!("{}_{}_{}_{}", file_id, engine, cmd.mode, original_name);
            let args = WorkerArgs {
                input,
                output: self.storage.output_path(&output_name),
                mode: cmd.mode,
                key: cmd.key.clone(),
                chunk: cmd.chunk,
            };
            let command = build_command(
                &self.settings.binaries,
                engine,
                &args,
                parallelism.procs,
                Some(parallelism.threads),
            );

            filenames.insert(
                file_id.clone(),
                (original_name.clone(), engine, output_name.clone()),
            );
            tasks.push(Task {
                id: file_id,
                display_name: original_name,
                engine,
                command,
                output_name,
            });
        }

        let task_ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        let outcomes = self
            .scheduler
            .run_all(tasks, self.settings.max_parallel)
            .await;

        let mut results = Vec::with_capacity(task_ids.len());
        for (task_id, outcome) in outcomes.into_completion_order() {
            let Some((filename, engine, output_name)) = filenames.remove(&task_id) else {
                tracing::warn!(task_id = %task_id, "Scheduler returned unknown task id");
                continue;
            };

            if let Err(e) = self.storage.save_task_log(&task_id, &outcome.output).await {
                tracing::warn!(task_id = %task_id, error = %e, "Failed to save task log");
            }

            let result = if outcome.is_success() {
                let metrics = Metrics::parse(&outcome.output);
                tracing::info!(
                    job_id = %job_id,
                    task_id = %task_id,
                    engine = %engine,
                    elapsed_secs = metrics.elapsed_secs,
                    throughput_mbps = metrics.throughput_mbps,
                    "Task succeeded"
                );
                TaskResult::success(
                    &task_id,
                    filename,
                    engine,
                    metrics,
                    self.settings.download_url(&output_name),
                )
            } else {
                tracing::warn!(
                    job_id = %job_id,
                    task_id = %task_id,
                    exit_code = outcome.exit_code,
                    "Task failed"
                );
                let details = if outcome.output.is_empty() {
                    "Crash/Unknown error".to_string()
                } else {
                    outcome.output
                };
                TaskResult::error(&task_id, filename, details)
            };
            results.push(result);
        }

        // 调度器保证全覆盖；这里兜底，确保没有任务被静默丢弃
        for task_id in task_ids {
            if let Some((filename, _, _)) = filenames.remove(&task_id) {
                tracing::error!(task_id = %task_id, "Task produced no result");
                results.push(TaskResult::error(task_id, filename, "Task produced no result"));
            }
        }

        tracing::info!(
            job_id = %job_id,
            succeeded = results.iter().filter(|r| r.is_success()).count(),
            total = results.len(),
            "Job finished"
        );

        Ok(JobReport {
            job_id,
            results,
            logs,
        })
    }
}
