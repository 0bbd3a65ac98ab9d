//! 调度与分发引擎
//!
//! - [`TickScheduler`]: 固定节拍拉取到期任务
//! - [`TaskDispatcher`]: 每个任务一次独立执行，失败隔离
//! - [`StopCompletion`]: 停止后的一次性完成句柄
//! - [`LifecycleController`]: 启动、关闭信号与停止收尾

pub mod completion;
pub mod dispatcher;
pub mod lifecycle;
pub mod scheduler;

pub use completion::{DrainPolicy, StopCompletion, StopReport};
pub use dispatcher::TaskDispatcher;
pub use lifecycle::{LifecycleController, LifecycleState, ShutdownReason};
pub use scheduler::{SchedulerOptions, TickScheduler};
