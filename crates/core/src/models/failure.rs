use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{Granularity, Task};

/// 失败发生的阶段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum FailureStage {
    /// 从任务源拉取到期任务失败
    Fetch { granularity: Granularity },
    /// 单个任务的工作单元执行失败
    Execution { task_id: i64, source_id: String },
}

/// 失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 返回了错误
    Error,
    /// 执行过程中发生 panic
    Panicked,
}

/// 发送给可观测性出口的失败记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailure {
    pub tick: u64,
    pub stage: FailureStage,
    pub kind: FailureKind,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl DispatchFailure {
    pub fn fetch(
        tick: u64,
        granularity: Granularity,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tick,
            stage: FailureStage::Fetch { granularity },
            kind,
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }

    pub fn execution(tick: u64, task: &Task, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            tick,
            stage: FailureStage::Execution {
                task_id: task.id,
                source_id: task.source_id.clone(),
            },
            kind,
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }

    /// 失败关联的任务 ID，拉取失败时为 `None`
    pub fn task_id(&self) -> Option<i64> {
        match &self.stage {
            FailureStage::Execution { task_id, .. } => Some(*task_id),
            FailureStage::Fetch { .. } => None,
        }
    }
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stage {
            FailureStage::Fetch { granularity } => write!(
                f,
                "tick {} 拉取 {} 粒度任务失败: {}",
                self.tick, granularity, self.message
            ),
            FailureStage::Execution { task_id, source_id } => write!(
                f,
                "tick {} 任务 {} (r/{}) 执行失败 ({:?}): {}",
                self.tick, task_id, source_id, self.kind, self.message
            ),
        }
    }
}
