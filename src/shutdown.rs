use redditminer_dispatcher::ShutdownReason;
use tracing::info;

/// 进程终止信号
///
/// 在启动阶段一次性注册 SIGINT 与 SIGTERM，避免调度器启动后、开始等待前到达的
/// 信号被默认处理器直接杀掉进程。[`ShutdownSignal::recv`] 消耗自身，只会触发一次。
pub struct ShutdownSignal {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    /// 注册信号处理器，必须在 tokio 运行时内调用
    #[cfg(unix)]
    pub fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// 等待第一个终止信号
    #[cfg(unix)]
    pub async fn recv(mut self) -> ShutdownReason {
        let reason = tokio::select! {
            _ = self.interrupt.recv() => ShutdownReason::Interrupt,
            _ = self.terminate.recv() => ShutdownReason::Terminate,
        };
        info!("收到 {reason} 信号");
        reason
    }

    #[cfg(not(unix))]
    pub async fn recv(self) -> ShutdownReason {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("监听Ctrl+C失败: {e}");
        }
        info!("收到 Ctrl+C 信号");
        ShutdownReason::Interrupt
    }
}
