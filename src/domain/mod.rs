//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Engine Context: 执行引擎与选择策略
//! - Job Context: 任务、结果与报告

pub mod engine;
pub mod job;

// 共享的性能指标解析
mod metrics;

pub use metrics::Metrics;
