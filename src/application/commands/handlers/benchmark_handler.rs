//! Benchmark Handler - 四种引擎配置对比编排

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::commands::dispatch_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{JobStoragePort, TaskSchedulerPort};
use crate::application::settings::DispatchSettings;
use crate::domain::engine::{BenchmarkLabel, EngineId};
use crate::domain::job::{
    build_command, new_job_id, sanitize_filename, sort_canonical, BenchmarkEntry,
    BenchmarkReport, Parallelism, Task, WorkerArgs,
};

/// Benchmark Handler
///
/// 输入只落盘一次，四个任务各自写独立的输出文件；
/// 结果收集完成后统一按 Serial -> OpenMP -> MPI -> Hybrid 排序
pub struct BenchmarkHandler {
    settings: Arc<DispatchSettings>,
    storage: Arc<dyn JobStoragePort>,
    scheduler: Arc<dyn TaskSchedulerPort>,
}

impl BenchmarkHandler {
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

    pub async fn handle(&self, cmd: RunBenchmark) -> Result<BenchmarkReport, ApplicationError> {
        if cmd.file.filename.is_empty() {
            return Err(ApplicationError::validation("No file"));
        }

        let missing = self.settings.binaries.missing(EngineId::ALL);
        if !missing.is_empty() {
            let message = format!(
                "Executables not found in {}: {}",
                self.settings.binaries.install_dir.display(),
                missing.join(", ")
            );
            tracing::error!(missing = ?missing, "Worker executables missing");
            return Err(ApplicationError::configuration(message));
        }

        let (parallelism, _) = self.settings.resolve_parallelism(cmd.threads, cmd.procs);
        let job_id = new_job_id();

        tracing::info!(
            job_id = %job_id,
            threads = parallelism.threads,
            procs = parallelism.procs,
            detected_cpus = self.settings.detected_cpus,
            "Benchmark start"
        );
        let logs = vec![format!(
            "Benchmark Start: Threads={}, Procs={} (Detected CPUs={})",
            parallelism.threads, parallelism.procs, self.settings.detected_cpus
        )];

        let name = sanitize_filename(&cmd.file.filename).unwrap_or_else(|| "upload.bin".to_string());
        let input = self
            .storage
            .save_upload(&format!("{}_{}", job_id, name), &cmd.file.data)
            .await?;

        let mut labels: HashMap<String, BenchmarkLabel> = HashMap::new();
        let tasks: Vec<Task> = BenchmarkLabel::CANONICAL
            .iter()
            .map(|&label| {
                let task = self.build_task(&job_id, label, &input, &cmd, parallelism);
                labels.insert(task.id.clone(), label);
                task
            })
            .collect();

        let outcomes = self
            .scheduler
            .run_all(tasks, self.settings.max_parallel)
            .await;

        let mut results = Vec::with_capacity(BenchmarkLabel::CANONICAL.len());
        for (task_id, outcome) in outcomes.into_completion_order() {
            let Some(label) = labels.remove(&task_id) else {
                tracing::warn!(task_id = %task_id, "Scheduler returned unknown task id");
                continue;
            };

            if let Err(e) = self.storage.save_task_log(&task_id, &outcome.output).await {
                tracing::warn!(task_id = %task_id, error = %e, "Failed to save task log");
            }

            let entry = BenchmarkEntry::from_exit(label, outcome.exit_code, &outcome.output);
            tracing::info!(
                job_id = %job_id,
                label = %label,
                exit_code = outcome.exit_code,
                elapsed_secs = entry.time,
                throughput_mbps = entry.throughput,
                "Benchmark entry finished"
            );
            results.push(entry);
        }

        for (task_id, label) in labels {
            tracing::error!(task_id = %task_id, label = %label, "Task produced no result");
            results.push(BenchmarkEntry {
                label,
                time: 0.0,
                throughput: 0.0,
                error: Some("Task produced no result".to_string()),
            });
        }

        sort_canonical(&mut results);

        Ok(BenchmarkReport {
            job_id,
            results,
            logs,
        })
    }

    fn build_task(
        &self,
        job_id: &str,
        label: BenchmarkLabel,
        input: &std::path::Path,
        cmd: &RunBenchmark,
        parallelism: Parallelism,
    ) -> Task {
        let output_name = format!("{}_{}.out", job_id, label.output_suffix());
        let args = WorkerArgs {
            input: input.to_path_buf(),
            output: self.storage.output_path(&output_name),
            mode: cmd.mode,
            key: cmd.key.clone(),
            chunk: cmd.chunk,
        };
        // MPI 只给进程数，Hybrid 同时给进程数与线程数
        let threads = match label {
            BenchmarkLabel::Serial | BenchmarkLabel::Mpi => None,
            BenchmarkLabel::OpenMp | BenchmarkLabel::Hybrid => Some(parallelism.threads),
        };
        let engine = label.engine();

        Task {
            id: format!("{}_{}", job_id, label.output_suffix()),
            display_name: label.to_string(),
            engine,
            command: build_command(
                &self.settings.binaries,
                engine,
                &args,
                parallelism.procs,
                threads,
            ),
            output_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::test_support::{
        touch_binaries, FakeScheduler, MemoryStorage,
    };
    use crate::application::ports::ExecutionOutcome;
    use crate::application::settings::test_support::settings;
    use crate::domain::engine::CipherMode;
    use tempfile::tempdir;

    fn command() -> RunBenchmark {
        RunBenchmark {
            file: UploadedFile::new("data.log", vec![7u8; 2048]),
            mode: CipherMode::Enc,
            key: "3".to_string(),
            chunk: 1048576,
            threads: Some(2),
            procs: Some(3),
        }
    }

    #[tokio::test]
    async fn test_results_are_in_canonical_order() {
        let dir = tempdir().unwrap();
        touch_binaries(dir.path());
        let storage = Arc::new(MemoryStorage::default());
        // FakeScheduler 以提交的逆序完成任务
        let scheduler = Arc::new(FakeScheduler::new(|task| {
            ExecutionOutcome::new(0, format!("{} Time(s)=1.0 Throughput(MB/s)=2.0", task.display_name))
        }));
        let handler = BenchmarkHandler::new(
            Arc::new(settings(dir.path().to_path_buf())),
            storage.clone(),
            scheduler.clone(),
        );

        let report = handler.handle(command()).await.unwrap();

        let labels: Vec<_> = report.results.iter().map(|e| e.label).collect();
        assert_eq!(labels, BenchmarkLabel::CANONICAL.to_vec());
        assert!(report.results.iter().all(|e| e.error.is_none()));
        assert_eq!(
            report.logs,
            vec!["Benchmark Start: Threads=2, Procs=3 (Detected CPUs=8)".to_string()]
        );

        // 输入只保存一次，每个任务一份日志
        assert_eq!(storage.uploads().len(), 1);
        assert_eq!(storage.logs().len(), 4);
    }

    #[tokio::test]
    async fn test_task_command_lines() {
        let dir = tempdir().unwrap();
        touch_binaries(dir.path());
        let scheduler = Arc::new(FakeScheduler::new(|_| ExecutionOutcome::new(0, "")));
        let handler = BenchmarkHandler::new(
            Arc::new(settings(dir.path().to_path_buf())),
            Arc::new(MemoryStorage::default()),
            scheduler.clone(),
        );

        handler.handle(command()).await.unwrap();

        let submitted = scheduler.submitted();
        assert_eq!(submitted.len(), 4);
        let by_label: HashMap<String, Task> = submitted
            .into_iter()
            .map(|t| (t.display_name.clone(), t))
            .collect();

        let serial = &by_label["Serial"].command;
        assert!(serial[0].ends_with("encrypt_serial"));
        assert!(!serial.contains(&"--threads".to_string()));

        let omp = &by_label["OpenMP"].command;
        assert_eq!(&omp[omp.len() - 2..], &["--threads", "2"]);

        let mpi = &by_label["MPI"].command;
        assert_eq!(&mpi[..3], &["mpiexec", "-n", "3"]);
        assert!(!mpi.contains(&"--threads".to_string()));

        let hybrid = &by_label["Hybrid"].command;
        assert_eq!(&hybrid[..3], &["mpiexec", "-n", "3"]);
        assert_eq!(&hybrid[hybrid.len() - 2..], &["--threads", "2"]);

        // 输出文件互不相同
        let mut outputs: Vec<_> = by_label.values().map(|t| t.output_name.clone()).collect();
        outputs.sort();
        outputs.dedup();
        assert_eq!(outputs.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_distributed_entry_is_kept() {
        let dir = tempdir().unwrap();
        touch_binaries(dir.path());
        let scheduler = Arc::new(FakeScheduler::new(|task| {
            if task.display_name == "MPI" {
                ExecutionOutcome::new(1, "mpiexec: rank 0 aborted")
            } else {
                ExecutionOutcome::new(0, "Time(s)=0.5 Throughput(MB/s)=4.0")
            }
        }));
        let handler = BenchmarkHandler::new(
            Arc::new(settings(dir.path().to_path_buf())),
            Arc::new(MemoryStorage::default()),
            scheduler,
        );

        let report = handler.handle(command()).await.unwrap();

        assert_eq!(report.results.len(), 4);
        let mpi = &report.results[2];
        assert_eq!(mpi.label, BenchmarkLabel::Mpi);
        assert_eq!(mpi.time, 0.0);
        assert_eq!(mpi.throughput, 0.0);
        assert_eq!(mpi.error.as_deref(), Some("Exit Code 1"));

        for entry in [&report.results[0], &report.results[1], &report.results[3]] {
            assert!(entry.error.is_none());
            assert_eq!(entry.time, 0.5);
            assert_eq!(entry.throughput, 4.0);
        }
    }

    #[tokio::test]
    async fn test_missing_openmp_binary_is_configuration_error() {
        let dir = tempdir().unwrap();
        touch_binaries(dir.path());
        std::fs::remove_file(dir.path().join("encrypt_openmp")).unwrap();
        let scheduler = Arc::new(FakeScheduler::new(|_| ExecutionOutcome::new(0, "")));
        let handler = BenchmarkHandler::new(
            Arc::new(settings(dir.path().to_path_buf())),
            Arc::new(MemoryStorage::default()),
            scheduler.clone(),
        );

        let err = handler.handle(command()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ConfigurationError(_)));
        assert!(scheduler.submitted().is_empty());
    }
}
