//! Task Scheduler Port - 有界并发任务调度
//!
//! 定义批量任务扇出/扇入的抽象接口，具体实现在 infrastructure/worker 层

use async_trait::async_trait;
use std::collections::HashMap;

use super::worker_invoker::ExecutionOutcome;
use crate::domain::job::Task;

/// 默认并发宽度
pub const DEFAULT_MAX_PARALLEL: usize = 4;

/// 一批任务的执行结果
///
/// 覆盖全部提交的 task id，同时记录完成顺序（仅用于进度与展示）
#[derive(Debug, Default)]
pub struct TaskOutcomes {
    outcomes: HashMap<String, ExecutionOutcome>,
    completion_order: Vec<String>,
}

impl TaskOutcomes {
    /// 记录一个完成的任务；同一 id 只记录第一次
    pub fn record(&mut self, task_id: String, outcome: ExecutionOutcome) {
        if self.outcomes.contains_key(&task_id) {
            return;
        }
        self.completion_order.push(task_id.clone());
        self.outcomes.insert(task_id, outcome);
    }

    pub fn get(&self, task_id: &str) -> Option<&ExecutionOutcome> {
        self.outcomes.get(task_id)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn completion_order(&self) -> &[String] {
        &self.completion_order
    }

    /// 以完成顺序取出所有结果
    pub fn into_completion_order(mut self) -> Vec<(String, ExecutionOutcome)> {
        self.completion_order
            .into_iter()
            .filter_map(|id| self.outcomes.remove(&id).map(|outcome| (id, outcome)))
            .collect()
    }

    pub fn into_map(self) -> HashMap<String, ExecutionOutcome> {
        self.outcomes
    }
}

/// Task Scheduler Port
///
/// 以不超过 `max_parallel` 的并发执行全部任务。
/// 返回值必须覆盖每一个输入任务，执行过程中 panic 的任务也要有一条错误记录。
#[async_trait]
pub trait TaskSchedulerPort: Send + Sync {
    async fn run_all(&self, tasks: Vec<Task>, max_parallel: usize) -> TaskOutcomes;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_first_and_completion_order() {
        let mut outcomes = TaskOutcomes::default();
        outcomes.record("b".to_string(), ExecutionOutcome::new(0, "b"));
        outcomes.record("a".to_string(), ExecutionOutcome::new(1, "a"));
        outcomes.record("b".to_string(), ExecutionOutcome::new(2, "dup"));

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes.completion_order(), &["b".to_string(), "a".to_string()]);
        assert_eq!(outcomes.get("b").unwrap().exit_code, 0);

        let ordered = outcomes.into_completion_order();
        assert_eq!(ordered[0].0, "b");
        assert_eq!(ordered[1].1.exit_code, 1);
    }
}
