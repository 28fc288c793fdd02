//! Engine Context - 执行引擎限界上下文
//!
//! 职责:
//! - 引擎标识与选择策略
//! - 加密模式
//! - Benchmark 对比项及其规范顺序

mod errors;
mod selector;
mod value_objects;

pub use errors::EngineError;
pub use selector::{select_engine, DISTRIBUTED_MEMORY_THRESHOLD, SHARED_MEMORY_THRESHOLD};
pub use value_objects::{BenchmarkLabel, CipherMode, EngineChoice, EngineId};
