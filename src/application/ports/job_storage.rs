//! Job Storage Port - 出站端口
//!
//! 定义上传文件、输出产物与任务日志的存储抽象

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::IoError(err.to_string())
    }
}

/// Job Storage Port - 出站端口
///
/// 所有文件名由调用方保证唯一，实现方不做加锁
#[async_trait]
pub trait JobStoragePort: Send + Sync {
    /// 保存上传文件，返回落盘路径
    async fn save_upload(&self, stored_name: &str, data: &[u8]) -> Result<PathBuf, StorageError>;

    /// 输出产物路径（由 worker 写入）
    fn output_path(&self, output_name: &str) -> PathBuf;

    /// 保存任务的原始输出日志
    async fn save_task_log(&self, task_id: &str, output: &str) -> Result<PathBuf, StorageError>;

    /// 解析可下载的输出产物路径，拒绝目录穿越
    async fn resolve_output(&self, output_name: &str) -> Result<PathBuf, StorageError>;
}
