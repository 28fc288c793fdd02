//! Job Context - 作业限界上下文
//!
//! 职责:
//! - Task 构造（命令行）
//! - 产物命名
//! - 任务结果、作业报告、Benchmark 报告

mod naming;
mod report;
mod task;

pub use naming::{new_file_id, new_job_id, sanitize_filename};
pub use report::{
    sort_canonical, BenchmarkEntry, BenchmarkReport, JobReport, TaskResult, TaskStatus,
};
pub use task::{build_command, EngineBinaries, Parallelism, Task, WorkerArgs};
