use async_trait::async_trait;

use crate::{
    models::{Granularity, Task},
    SchedulerResult,
};

/// 任务源接口
///
/// 返回指定粒度下当前到期的任务。底层存储由实现方负责同步，
/// 调度核心不加锁。
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// 拉取到期任务
    async fn fetch_due_tasks(&self, granularity: Granularity) -> SchedulerResult<Vec<Task>>;
}
