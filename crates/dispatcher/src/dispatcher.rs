use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use redditminer_core::{
    models::{DispatchFailure, FailureKind, Task, Tick},
    traits::{FailureSink, WorkUnit},
};
use redditminer_infrastructure::{MetricsCollector, StructuredLogger};

/// 任务分发器
///
/// 把一批到期任务展开为每个任务一次独立执行。执行之间互不共享状态，
/// 任意一次执行返回错误或 panic 都只会在该执行的边界被捕获并转为一条
/// [`DispatchFailure`]，不会影响同批次的其他执行，也不会重试。
///
/// 分发本身只负责 spawn，从不等待执行结束。所有执行都登记在
/// [`TaskTracker`] 中，停止时可以据此等待排空。
pub struct TaskDispatcher {
    work_unit: Arc<dyn WorkUnit>,
    failure_sink: Arc<dyn FailureSink>,
    metrics: Arc<MetricsCollector>,
    tracker: TaskTracker,
    permits: Option<Arc<Semaphore>>,
}

impl TaskDispatcher {
    /// `max_in_flight` 为 `None` 时不限制并发
    pub fn new(
        work_unit: Arc<dyn WorkUnit>,
        failure_sink: Arc<dyn FailureSink>,
        metrics: Arc<MetricsCollector>,
        max_in_flight: Option<usize>,
    ) -> Self {
        Self {
            work_unit,
            failure_sink,
            metrics,
            tracker: TaskTracker::new(),
            permits: max_in_flight.map(|limit| Arc::new(Semaphore::new(limit))),
        }
    }

    /// 为批次中的每个任务 spawn 一次执行，返回 spawn 的数量
    pub fn dispatch(&self, tick: &Tick, batch: Vec<Task>) -> usize {
        let mut spawned = 0;

        for task in batch {
            StructuredLogger::log_task_dispatched(tick.sequence, &task);

            let execution = Execution {
                tick: tick.sequence,
                work_unit: Arc::clone(&self.work_unit),
                failure_sink: Arc::clone(&self.failure_sink),
                metrics: Arc::clone(&self.metrics),
                permits: self.permits.clone(),
                tracker: self.tracker.clone(),
            };
            self.tracker.spawn(execution.run(task));
            spawned += 1;
        }

        if spawned > 0 {
            self.metrics.record_dispatched(spawned);
            self.metrics.update_in_flight(self.tracker.len());
        }
        spawned
    }

    /// 当前尚未结束的执行数（包括等待并发许可的执行）
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// 等待所有已 spawn 的执行结束
    ///
    /// 返回 `true` 表示全部结束，`false` 表示超时，超时后剩余执行继续在后台运行。
    /// 排空期间仍允许 spawn，新执行同样会被等待。
    pub async fn drain(&self, timeout: Option<Duration>) -> bool {
        self.tracker.close();
        debug!(in_flight = self.tracker.len(), "等待进行中的执行结束");

        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.tracker.wait())
                .await
                .is_ok(),
            None => {
                self.tracker.wait().await;
                true
            }
        }
    }
}

struct Execution {
    tick: u64,
    work_unit: Arc<dyn WorkUnit>,
    failure_sink: Arc<dyn FailureSink>,
    metrics: Arc<MetricsCollector>,
    permits: Option<Arc<Semaphore>>,
    tracker: TaskTracker,
}

impl Execution {
    async fn run(self, task: Task) {
        let _permit = match &self.permits {
            Some(permits) => match Arc::clone(permits).acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(e) => {
                    warn!(task.id = task.id, error = %e, "获取并发许可失败，放弃本次执行");
                    return;
                }
            },
            None => None,
        };

        let started = Instant::now();
        let outcome = AssertUnwindSafe(self.work_unit.run(
            &task.source_id,
            task.recency_window,
            task.ordering_mode,
        ))
        .catch_unwind()
        .await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(Ok(result)) => {
                self.metrics.record_work_unit(true, elapsed.as_secs_f64());
                StructuredLogger::log_task_completed(
                    self.tick,
                    &task,
                    result.items_collected,
                    elapsed.as_millis() as u64,
                );
            }
            Ok(Err(e)) => {
                self.metrics.record_work_unit(false, elapsed.as_secs_f64());
                self.failure_sink.on_failure(DispatchFailure::execution(
                    self.tick,
                    &task,
                    FailureKind::Error,
                    e.to_string(),
                ));
            }
            Err(panic) => {
                self.metrics.record_work_unit_panic();
                self.failure_sink.on_failure(DispatchFailure::execution(
                    self.tick,
                    &task,
                    FailureKind::Panicked,
                    panic_message(panic.as_ref()),
                ));
            }
        }

        // 本执行此时仍计入 tracker
        self.metrics
            .update_in_flight(self.tracker.len().saturating_sub(1));
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_extracts_str_and_string() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        assert_eq!(panic_message(payload.as_ref()), "kaboom");

        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
