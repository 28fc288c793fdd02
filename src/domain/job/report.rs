//! Job Context - 结果与报告

use serde::Serialize;

use crate::domain::engine::{BenchmarkLabel, EngineId};
use crate::domain::metrics::Metrics;

/// 单个任务的执行结果
///
/// 每个 Task 恰好产生一个 TaskResult
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    pub task_id: String,
    pub filename: String,
    #[serde(flatten)]
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    Success {
        engine: EngineId,
        time: f64,
        throughput: f64,
        #[serde(rename = "downloadUrl")]
        download_url: String,
    },
    Error {
        details: String,
    },
}

impl TaskResult {
    pub fn success(
        task_id: impl Into<String>,
        filename: impl Into<String>,
        engine: EngineId,
        metrics: Metrics,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            filename: filename.into(),
            status: TaskStatus::Success {
                engine,
                time: metrics.elapsed_secs,
                throughput: metrics.throughput_mbps,
                download_url: download_url.into(),
            },
        }
    }

    pub fn error(
        task_id: impl Into<String>,
        filename: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            filename: filename.into(),
            status: TaskStatus::Error {
                details: details.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, TaskStatus::Success { .. })
    }
}

/// 批量任务报告
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job_id: String,
    /// 按完成顺序排列，不保证与提交顺序一致
    pub results: Vec<TaskResult>,
    /// 面向用户的过程日志
    pub logs: Vec<String>,
}

/// Benchmark 单项结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkEntry {
    pub label: BenchmarkLabel,
    pub time: f64,
    pub throughput: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BenchmarkEntry {
    pub fn from_exit(label: BenchmarkLabel, exit_code: i32, output: &str) -> Self {
        if exit_code == 0 {
            let metrics = Metrics::parse(output);
            Self {
                label,
                time: metrics.elapsed_secs,
                throughput: metrics.throughput_mbps,
                error: None,
            }
        } else {
            Self {
                label,
                time: 0.0,
                throughput: 0.0,
                error: Some(format!("Exit Code {}", exit_code)),
            }
        }
    }
}

/// 按规范顺序排序 benchmark 结果
pub fn sort_canonical(entries: &mut [BenchmarkEntry]) {
    entries.sort_by_key(|e| e.label);
}

/// Benchmark 报告
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub job_id: String,
    /// 固定为 Serial -> OpenMP -> MPI -> Hybrid
    pub results: Vec<BenchmarkEntry>,
    pub logs: Vec<String>,
}
