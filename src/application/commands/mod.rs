//! 应用层 - 命令
//!
//! 作业与 Benchmark 两类写操作

mod dispatch_commands;

pub mod handlers;

pub use dispatch_commands::*;
