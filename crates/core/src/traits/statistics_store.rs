use async_trait::async_trait;

use crate::{models::SubredditSnapshot, SchedulerResult};

/// 统计快照存储接口
#[async_trait]
pub trait StatisticsStore: Send + Sync {
    async fn record_snapshot(&self, snapshot: &SubredditSnapshot) -> SchedulerResult<()>;
}
