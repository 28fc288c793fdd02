//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod job_storage;
mod task_scheduler;
mod worker_invoker;

pub use job_storage::{JobStoragePort, StorageError};
pub use task_scheduler::{TaskOutcomes, TaskSchedulerPort, DEFAULT_MAX_PARALLEL};
pub use worker_invoker::{ExecutionOutcome, Outcome, WorkerInvokerPort, SYNTHETIC_EXIT_CODE};
