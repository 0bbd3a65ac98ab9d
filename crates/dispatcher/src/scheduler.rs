use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use redditminer_core::{
    config::SchedulerConfig,
    models::{DispatchFailure, FailureKind, Granularity, Tick},
    traits::{FailureSink, TaskSource},
    SchedulerError, SchedulerResult,
};
use redditminer_infrastructure::{MetricsCollector, StructuredLogger};

use crate::completion::{DrainPolicy, StopCompletion};
use crate::dispatcher::{panic_message, TaskDispatcher};

/// 调度器运行参数，构造时确定，不支持热更新
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// 相邻两次 tick 的间隔，必须大于 0
    pub tick_interval: Duration,
    /// 每次 tick 向任务源请求的粒度，与间隔相互独立
    pub granularity: Granularity,
    pub drain: DrainPolicy,
}

impl SchedulerOptions {
    pub fn from_config(config: &SchedulerConfig) -> Self {
        let drain = if config.drain_on_stop {
            DrainPolicy::Wait {
                timeout: config.drain_timeout(),
            }
        } else {
            DrainPolicy::Skip
        };

        Self {
            tick_interval: config.tick_interval(),
            granularity: config.granularity,
            drain,
        }
    }
}

/// 固定节拍调度器
///
/// 启动后第一次 tick 在一个间隔之后触发，错过的 tick 直接跳过，节拍始终对齐
/// 启动时刻。每次 tick 先拉取到期任务，成功则整批交给 [`TaskDispatcher`]，
/// 失败则记录并上报，本轮不分发，定时器继续运行。
pub struct TickScheduler {
    task_source: Arc<dyn TaskSource>,
    dispatcher: Arc<TaskDispatcher>,
    failure_sink: Arc<dyn FailureSink>,
    metrics: Arc<MetricsCollector>,
    options: SchedulerOptions,
    cancel: CancellationToken,
    started: AtomicBool,
    loop_exited: Arc<watch::Sender<bool>>,
}

impl TickScheduler {
    pub fn new(
        task_source: Arc<dyn TaskSource>,
        dispatcher: Arc<TaskDispatcher>,
        failure_sink: Arc<dyn FailureSink>,
        metrics: Arc<MetricsCollector>,
        options: SchedulerOptions,
    ) -> Self {
        let (loop_exited, _) = watch::channel(false);

        Self {
            task_source,
            dispatcher,
            failure_sink,
            metrics,
            options,
            cancel: CancellationToken::new(),
            started: AtomicBool::new(false),
            loop_exited: Arc::new(loop_exited),
        }
    }

    /// 在当前 tokio 运行时上启动调度循环并立即返回
    ///
    /// 每个调度器只能启动一次，已停止的调度器也不能再次启动。
    pub fn start(&self) -> SchedulerResult<()> {
        if self.options.tick_interval.is_zero() {
            return Err(SchedulerError::Configuration(
                "调度间隔必须大于0".to_string(),
            ));
        }
        if self.cancel.is_cancelled() {
            return Err(SchedulerError::InvalidLifecycleState {
                expected: "idle",
                actual: "stopped",
            });
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(SchedulerError::AlreadyStarted);
        }

        let tick_loop = TickLoop {
            task_source: Arc::clone(&self.task_source),
            dispatcher: Arc::clone(&self.dispatcher),
            failure_sink: Arc::clone(&self.failure_sink),
            metrics: Arc::clone(&self.metrics),
            granularity: self.options.granularity,
        };
        let first_tick = Instant::now() + self.options.tick_interval;

        tokio::spawn(tick_loop.run(
            first_tick,
            self.options.tick_interval,
            self.cancel.clone(),
            LoopExitGuard(Arc::clone(&self.loop_exited)),
        ));

        info!(
            interval_seconds = self.options.tick_interval.as_secs(),
            granularity = %self.options.granularity,
            "调度器已启动"
        );
        StructuredLogger::log_lifecycle("tick_scheduler", "running");
        Ok(())
    }

    /// 取消之后的所有 tick，正在执行的 tick 会跑完
    ///
    /// 可以重复调用，每次都返回一个新的完成句柄。
    pub fn stop(&self) -> StopCompletion {
        self.cancel.cancel();
        if !self.started.load(Ordering::SeqCst) {
            // 从未启动，没有循环需要等待
            self.loop_exited.send_replace(true);
        }

        StopCompletion::new(
            self.loop_exited.subscribe(),
            Arc::clone(&self.dispatcher),
            self.options.drain,
        )
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::SeqCst) && !*self.loop_exited.borrow()
    }
}

/// 循环任务结束（包括 panic）时标记已退出
struct LoopExitGuard(Arc<watch::Sender<bool>>);

impl Drop for LoopExitGuard {
    fn drop(&mut self) {
        self.0.send_replace(true);
        StructuredLogger::log_lifecycle("tick_scheduler", "timer_stopped");
    }
}

struct TickLoop {
    task_source: Arc<dyn TaskSource>,
    dispatcher: Arc<TaskDispatcher>,
    failure_sink: Arc<dyn FailureSink>,
    metrics: Arc<MetricsCollector>,
    granularity: Granularity,
}

impl TickLoop {
    async fn run(
        self,
        first_tick: Instant,
        period: Duration,
        cancel: CancellationToken,
        _exit: LoopExitGuard,
    ) {
        let mut interval = interval_at(first_tick, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sequence = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(ticks = sequence, "收到停止请求，调度循环退出");
                    break;
                }
                _ = interval.tick() => {
                    sequence += 1;
                    self.run_tick(Tick::new(sequence)).await;
                }
            }
        }
    }

    async fn run_tick(&self, tick: Tick) {
        let started = std::time::Instant::now();
        StructuredLogger::log_tick_fired(tick.sequence, self.granularity);

        let fetched = AssertUnwindSafe(self.task_source.fetch_due_tasks(self.granularity))
            .catch_unwind()
            .await;

        match fetched {
            Ok(Ok(tasks)) => {
                StructuredLogger::log_tasks_fetched(tick.sequence, self.granularity, &tasks);
                self.dispatcher.dispatch(&tick, tasks);
            }
            Ok(Err(e)) => {
                warn!(
                    tick = tick.sequence,
                    granularity = %self.granularity,
                    error = %e,
                    "拉取到期任务失败，本轮不分发"
                );
                self.metrics.record_fetch_failure();
                self.failure_sink.on_failure(DispatchFailure::fetch(
                    tick.sequence,
                    self.granularity,
                    FailureKind::Error,
                    e.to_string(),
                ));
            }
            Err(panic) => {
                // 任务源 panic 只影响本轮，定时器继续运行
                let error = SchedulerError::Internal(format!(
                    "任务源 panic: {}",
                    panic_message(panic.as_ref())
                ));
                StructuredLogger::log_system_error("tick_scheduler", "fetch_due_tasks", &error);
                self.metrics.record_fetch_failure();
                self.failure_sink.on_failure(DispatchFailure::fetch(
                    tick.sequence,
                    self.granularity,
                    FailureKind::Panicked,
                    error.to_string(),
                ));
            }
        }

        self.metrics.record_tick(started.elapsed().as_secs_f64());
    }
}
