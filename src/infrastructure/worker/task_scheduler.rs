//! Bounded Task Scheduler - 有界并发任务调度
//!
//! 实现 TaskSchedulerPort trait

use async_trait::async_trait;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::application::ports::{
    ExecutionOutcome, TaskOutcomes, TaskSchedulerPort, WorkerInvokerPort, SYNTHETIC_EXIT_CODE,
};
use crate::domain::job::Task;

/// 有界并发调度器
///
/// 每个任务一个 tokio task，通过 semaphore 限制同时运行的 worker 进程数；
/// permit 在整个进程执行期间持有
pub struct BoundedTaskScheduler {
    invoker: Arc<dyn WorkerInvokerPort>,
}

impl BoundedTaskScheduler {
    pub fn new(invoker: Arc<dyn WorkerInvokerPort>) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl TaskSchedulerPort for BoundedTaskScheduler {
    async fn run_all(&self, tasks: Vec<Task>, max_parallel: usize) -> TaskOutcomes {
        let width = max_parallel.max(1);
        let total = tasks.len();
        let semaphore = Arc::new(Semaphore::new(width));

        tracing::info!(tasks = total, max_parallel = width, "Scheduling tasks");

        let mut running = FuturesUnordered::new();
        for task in tasks {
            let task_id = task.id.clone();
            let semaphore = semaphore.clone();
            let invoker = self.invoker.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        tracing::error!(task_id = %task.id, "Failed to acquire semaphore permit");
                        return ExecutionOutcome::new(SYNTHETIC_EXIT_CODE, "Scheduler closed");
                    }
                };

                tracing::debug!(
                    task_id = %task.id,
                    name = %task.display_name,
                    engine = %task.engine,
                    "Task admitted"
                );
                invoker.invoke(&task.command).await.into_execution()
            });

            running.push(async move { (task_id, handle.await) });
        }

        let mut outcomes = TaskOutcomes::default();
        while let Some((task_id, joined)) = running.next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    // panic 或被取消的任务同样要留下一条记录
                    tracing::error!(task_id = %task_id, error = %e, "Task execution failed");
                    ExecutionOutcome::new(
                        SYNTHETIC_EXIT_CODE,
                        format!("Task execution failed: {}", e),
                    )
                }
            };

            tracing::info!(
                task_id = %task_id,
                exit_code = outcome.exit_code,
                completed = outcomes.len() + 1,
                total = total,
                "Task completed"
            );
            outcomes.record(task_id, outcome);
        }

        outcomes
    }
}
