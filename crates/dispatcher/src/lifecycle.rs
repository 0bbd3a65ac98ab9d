use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use redditminer_core::{SchedulerError, SchedulerResult};
use redditminer_infrastructure::StructuredLogger;

use crate::completion::StopReport;
use crate::scheduler::TickScheduler;

/// 生命周期状态
///
/// `Idle → Running → StopRequested → Stopped`，只能前进。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Idle,
    Running,
    StopRequested,
    Stopped,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Running => "running",
            LifecycleState::StopRequested => "stop_requested",
            LifecycleState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 触发关闭的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Interrupt => f.write_str("interrupt"),
            ShutdownReason::Terminate => f.write_str("terminate"),
        }
    }
}

/// 生命周期控制器
///
/// 启动调度器，把关闭事件转成一次停止请求，然后阻塞在停止完成句柄上，
/// 保证进程不会在调度器收尾前退出。不包含任何业务逻辑。
pub struct LifecycleController {
    scheduler: Arc<TickScheduler>,
    state: watch::Sender<LifecycleState>,
}

impl LifecycleController {
    pub fn new(scheduler: Arc<TickScheduler>) -> Self {
        let (state, _) = watch::channel(LifecycleState::Idle);
        Self { scheduler, state }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// `Idle → Running`
    pub fn start(&self) -> SchedulerResult<()> {
        self.expect_state(LifecycleState::Idle)?;
        self.scheduler.start()?;
        self.transition(LifecycleState::Running);
        Ok(())
    }

    /// 运行直到 `shutdown` 完成，然后停止调度器并等待收尾
    ///
    /// 处于 `Idle` 时会先启动调度器。`shutdown` 只会被等待一次，之后到达的
    /// 信号不再有任何效果。
    pub async fn run_until<F>(&self, shutdown: F) -> SchedulerResult<StopReport>
    where
        F: Future<Output = ShutdownReason>,
    {
        if self.state() == LifecycleState::Idle {
            self.start()?;
        }
        self.expect_state(LifecycleState::Running)?;

        let reason = shutdown.await;
        info!(reason = %reason, "收到关闭信号，开始停止调度器");
        Ok(self.shutdown().await)
    }

    /// `Running → StopRequested → Stopped`
    async fn shutdown(&self) -> StopReport {
        self.transition(LifecycleState::StopRequested);

        let report = self.scheduler.stop().wait().await;

        if report.drained {
            info!("所有进行中的执行已结束");
        } else {
            info!(
                in_flight = report.in_flight_remaining,
                "仍有执行未结束，不再等待"
            );
        }

        self.transition(LifecycleState::Stopped);
        report
    }

    fn expect_state(&self, expected: LifecycleState) -> SchedulerResult<()> {
        let actual = self.state();
        if actual != expected {
            return Err(SchedulerError::InvalidLifecycleState {
                expected: expected.as_str(),
                actual: actual.as_str(),
            });
        }
        Ok(())
    }

    fn transition(&self, next: LifecycleState) {
        self.state.send_replace(next);
        StructuredLogger::log_lifecycle("lifecycle_controller", next.as_str());
    }
}
