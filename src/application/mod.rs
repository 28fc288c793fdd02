//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（WorkerInvoker、TaskScheduler、JobStorage）
//! - commands: 作业与 Benchmark 命令及处理器
//! - settings: 启动时解析的只读调度配置
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod settings;

// Re-exports
pub use commands::{
    handlers::{BenchmarkHandler, RunJobHandler},
    RunBenchmark, RunJob, UploadedFile,
};

pub use error::ApplicationError;

pub use ports::{
    // Job storage
    JobStoragePort,
    StorageError,
    // Task scheduler
    TaskOutcomes,
    TaskSchedulerPort,
    DEFAULT_MAX_PARALLEL,
    // Worker invoker
    ExecutionOutcome,
    Outcome,
    WorkerInvokerPort,
    SYNTHETIC_EXIT_CODE,
};

pub use settings::DispatchSettings;
