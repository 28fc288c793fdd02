//! Worker Layer - 外部 worker 进程执行
//!
//! 实现 ProcessWorkerInvoker 与 BoundedTaskScheduler

mod process_invoker;
mod task_scheduler;

pub use process_invoker::ProcessWorkerInvoker;
pub use task_scheduler::BoundedTaskScheduler;
