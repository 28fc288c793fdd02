//! Process Worker Invoker - 以子进程方式执行 worker
//!
//! 实现 WorkerInvokerPort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::application::ports::{Outcome, WorkerInvokerPort};

/// 子进程 worker 调用器
///
/// 工作目录固定为 worker 安装目录，worker 依赖的共享库与其同目录
pub struct ProcessWorkerInvoker {
    working_dir: PathBuf,
    /// 单任务截止时间，None 表示不限时
    timeout: Option<Duration>,
}

impl ProcessWorkerInvoker {
    pub fn new(working_dir: impl AsRef<Path>, timeout: Option<Duration>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            timeout,
        }
    }
}

#[async_trait]
impl WorkerInvokerPort for ProcessWorkerInvoker {
    async fn invoke(&self, command: &[String]) -> Outcome {
        let Some((program, args)) = command.split_first() else {
            return Outcome::LaunchFailed("Empty command line".to_string());
        };

        let child = Command::new(program)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // 超时后 future 被丢弃，子进程随之被 kill
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(program = %program, error = %e, "Failed to launch worker");
                return Outcome::LaunchFailed(format!("Failed to launch {}: {}", program, e));
            }
        };

        tracing::debug!(program = %program, pid = ?child.id(), "Worker launched");

        let wait = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(program = %program, timeout_secs = limit.as_secs(), "Worker timed out");
                    return Outcome::TimedOut { after: limit };
                }
            },
            None => wait.await,
        };

        match output {
            Ok(output) => {
                let mut text = decode_lossy(&output.stdout);
                text.push_str(&decode_lossy(&output.stderr));

                let code = match output.status.code() {
                    Some(code) => code,
                    None => {
                        // 被信号终止，没有退出码
                        if !text.is_empty() && !text.ends_with('\n') {
                            text.push('\n');
                        }
                        text.push_str(&format!("Worker terminated: {}", output.status));
                        -1
                    }
                };

                Outcome::Exited { code, output: text }
            }
            Err(e) => {
                tracing::warn!(program = %program, error = %e, "Failed to wait for worker");
                Outcome::LaunchFailed(format!("Failed to wait for {}: {}", program, e))
            }
        }
    }
}

/// 按 UTF-8 解码，无法解码的字节直接丢弃
fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}
