//! 应用层错误定义
//!
//! 统一的命令错误类型。单个任务的失败不在这里体现，
//! 只有导致整个请求失败的情况才会返回 ApplicationError。

use thiserror::Error;

use crate::domain::engine::EngineError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 请求参数错误（没有文件、模式或引擎无法识别等）
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 服务配置错误（worker 可执行文件缺失），不会执行任何任务
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<crate::application::ports::StorageError> for ApplicationError {
    fn from(err: crate::application::ports::StorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<EngineError> for ApplicationError {
    fn from(err: EngineError) -> Self {
        Self::ValidationError(err.to_string())
    }
}
