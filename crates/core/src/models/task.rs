use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SchedulerError;

/// 监控任务
///
/// 表示一个 subreddit 订阅。调度核心只读取任务的字段来构造一次工作单元调用，
/// 在一次 tick 内任务是不可变快照。
///
/// # 字段说明
///
/// - `id`: 任务的唯一标识符
/// - `source_id`: 内容源标识（subreddit 名称）
/// - `recency_window`: 只统计该时间窗口内创建的帖子
/// - `ordering_mode`: 列表排序方式
/// - `granularity`: 轮询粒度，决定任务在哪个调度档位被选中
///
/// # 使用示例
///
/// ```rust
/// use redditminer_core::models::{Granularity, OrderingMode, RecencyWindow, Task};
///
/// let task = Task::new("rust", RecencyWindow::Day, OrderingMode::Top, Granularity::Hour);
/// assert_eq!(task.source_id, "rust");
/// assert_eq!(task.granularity, Granularity::Hour);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub source_id: String,
    pub recency_window: RecencyWindow,
    pub ordering_mode: OrderingMode,
    pub granularity: Granularity,
}

impl Task {
    /// 创建新任务，`id` 由持久层生成
    pub fn new(
        source_id: impl Into<String>,
        recency_window: RecencyWindow,
        ordering_mode: OrderingMode,
        granularity: Granularity,
    ) -> Self {
        Self {
            id: 0,
            source_id: source_id.into(),
            recency_window,
            ordering_mode,
            granularity,
        }
    }
}

/// 轮询粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Week,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
        }
    }
}

/// 帖子时间窗口，取值与内容源的 `t` 参数一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecencyWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl RecencyWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecencyWindow::Hour => "hour",
            RecencyWindow::Day => "day",
            RecencyWindow::Week => "week",
            RecencyWindow::Month => "month",
            RecencyWindow::Year => "year",
            RecencyWindow::All => "all",
        }
    }
}

/// 列表排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingMode {
    Hot,
    New,
    Top,
    Rising,
}

impl OrderingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingMode::Hot => "hot",
            OrderingMode::New => "new",
            OrderingMode::Top => "top",
            OrderingMode::Rising => "rising",
        }
    }
}

impl FromStr for Granularity {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" | "hourly" => Ok(Granularity::Hour),
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            other => Err(SchedulerError::InvalidTaskParams(format!(
                "未知的轮询粒度: {other}"
            ))),
        }
    }
}

impl FromStr for RecencyWindow {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(RecencyWindow::Hour),
            "day" => Ok(RecencyWindow::Day),
            "week" => Ok(RecencyWindow::Week),
            "month" => Ok(RecencyWindow::Month),
            "year" => Ok(RecencyWindow::Year),
            "all" => Ok(RecencyWindow::All),
            other => Err(SchedulerError::InvalidTaskParams(format!(
                "未知的时间窗口: {other}"
            ))),
        }
    }
}

impl FromStr for OrderingMode {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(OrderingMode::Hot),
            "new" => Ok(OrderingMode::New),
            "top" => Ok(OrderingMode::Top),
            "rising" => Ok(OrderingMode::Rising),
            other => Err(SchedulerError::InvalidTaskParams(format!(
                "未知的排序方式: {other}"
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RecencyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrderingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
