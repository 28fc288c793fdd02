//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod benchmark_handler;
mod run_job_handler;

pub use benchmark_handler::*;
pub use run_job_handler::*;
