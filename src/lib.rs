//! CryptBench - 加解密 worker 调度与对比服务
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Engine Context: 引擎标识、自动选择规则
//! - Job Context: 任务构造、结果与报告
//! - Metrics: worker 输出中的耗时与吞吐量解析
//!
//! 应用层 (application/):
//! - Ports: 端口定义（WorkerInvoker, TaskScheduler, JobStorage）
//! - Commands: RunJob / RunBenchmark 编排
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Worker: 子进程调用与有界并发调度
//! - Adapters: 文件系统存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
