use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::dispatcher::TaskDispatcher;

/// 停止后如何处理仍在进行中的执行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainPolicy {
    /// 只等定时器退出，进行中的执行留在后台
    Skip,
    /// 等待进行中的执行结束，`timeout` 为 `None` 时无限等待
    Wait { timeout: Option<Duration> },
}

/// 停止结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopReport {
    /// 返回时是否已没有进行中的执行
    pub drained: bool,
    pub in_flight_remaining: usize,
}

/// `TickScheduler::stop` 返回的一次性完成句柄
///
/// - [`StopCompletion::timer_stopped`] 在调度循环退出后返回。正在执行的 tick
///   会先跑完（包括它的分发），之后不会再有新的 tick。
/// - [`StopCompletion::wait`] 在此基础上按 [`DrainPolicy`] 等待进行中的执行。
pub struct StopCompletion {
    loop_exited: watch::Receiver<bool>,
    dispatcher: Arc<TaskDispatcher>,
    drain: DrainPolicy,
}

impl StopCompletion {
    pub(crate) fn new(
        loop_exited: watch::Receiver<bool>,
        dispatcher: Arc<TaskDispatcher>,
        drain: DrainPolicy,
    ) -> Self {
        Self {
            loop_exited,
            dispatcher,
            drain,
        }
    }

    /// 等待调度循环退出
    pub async fn timer_stopped(&self) {
        let mut loop_exited = self.loop_exited.clone();
        // 发送端被丢弃同样说明循环已经不在了
        let _ = loop_exited.wait_for(|exited| *exited).await;
    }

    pub async fn wait(self) -> StopReport {
        self.timer_stopped().await;

        let drained = match self.drain {
            DrainPolicy::Skip => self.dispatcher.in_flight() == 0,
            DrainPolicy::Wait { timeout } => self.dispatcher.drain(timeout).await,
        };

        StopReport {
            drained,
            in_flight_remaining: self.dispatcher.in_flight(),
        }
    }
}
