//! Worker Invoker Port - 外部 worker 进程调用抽象
//!
//! 具体实现在 infrastructure/worker 层

use async_trait::async_trait;
use std::time::Duration;

/// 启动失败或超时时使用的合成退出码
pub const SYNTHETIC_EXIT_CODE: i32 = -1;

/// worker 进程的执行结果（统一形态）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub exit_code: i32,
    /// stdout + stderr
    pub output: String,
}

impl ExecutionOutcome {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// 单次调用的原始结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 进程正常结束（包括非零退出码）
    Exited { code: i32, output: String },
    /// 进程无法启动
    LaunchFailed(String),
    /// 超过截止时间，进程已被终止
    TimedOut { after: Duration },
}

impl Outcome {
    pub fn into_execution(self) -> ExecutionOutcome {
        match self {
            Outcome::Exited { code, output } => ExecutionOutcome::new(code, output),
            Outcome::LaunchFailed(message) => ExecutionOutcome::new(SYNTHETIC_EXIT_CODE, message),
            Outcome::TimedOut { after } => ExecutionOutcome::new(
                SYNTHETIC_EXIT_CODE,
                format!("Worker timed out after {}s and was killed", after.as_secs()),
            ),
        }
    }
}

/// Worker Invoker Port
///
/// 执行一条命令行并收集输出；任何失败都体现在返回值里，不会返回错误
#[async_trait]
pub trait WorkerInvokerPort: Send + Sync {
    async fn invoke(&self, command: &[String]) -> Outcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_failed_maps_to_synthetic_code() {
        let outcome = Outcome::LaunchFailed("No such file or directory".to_string()).into_execution();
        assert_eq!(outcome.exit_code, -1);
        assert_eq!(outcome.output, "No such file or directory");
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_timed_out_maps_to_synthetic_code() {
        let outcome = Outcome::TimedOut {
            after: Duration::from_secs(3),
        }
        .into_execution();
        assert_eq!(outcome.exit_code, -1);
        assert!(outcome.output.starts_with("Worker timed out after 3s"));
    }
}
