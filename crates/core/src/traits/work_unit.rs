use async_trait::async_trait;

use crate::{
    models::{OrderingMode, RecencyWindow, WorkOutcome},
    SchedulerResult,
};

/// 工作单元接口
///
/// 每个到期任务触发一次。实现必须是幂等的：当执行时间超过调度周期时，
/// 同一任务的多次执行可能重叠。超时控制也由实现自己负责。
#[async_trait]
pub trait WorkUnit: Send + Sync {
    async fn run(
        &self,
        source_id: &str,
        recency_window: RecencyWindow,
        ordering_mode: OrderingMode,
    ) -> SchedulerResult<WorkOutcome>;
}
