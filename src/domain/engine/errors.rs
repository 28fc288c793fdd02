//! Engine Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("未知的引擎: {0}")]
    UnknownEngine(String),

    #[error("未知的模式: {0}")]
    UnknownMode(String),
}
