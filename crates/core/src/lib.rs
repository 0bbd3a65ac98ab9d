//! Redditminer 核心类型
//!
//! 定义调度核心与外部协作者之间的窄接口（任务源、工作单元、失败出口）、
//! 数据模型、统一错误类型以及配置模型。

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use errors::*;
pub use models::{
    DispatchFailure, FailureKind, FailureStage, Granularity, OrderingMode, RecencyWindow,
    SubredditSnapshot, Task, Tick, WorkOutcome,
};
pub use traits::{FailureSink, StatisticsStore, TaskSource, WorkUnit};

/// 统一的Result类型
pub type SchedulerResult<T> = std::result::Result<T, SchedulerError>;
