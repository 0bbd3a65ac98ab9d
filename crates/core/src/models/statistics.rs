use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{OrderingMode, RecencyWindow};

/// 一次采集得到的 subreddit 统计快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubredditSnapshot {
    pub source_id: String,
    pub recency_window: RecencyWindow,
    pub ordering_mode: OrderingMode,
    pub post_count: i64,
    pub total_score: i64,
    pub total_comments: i64,
    pub captured_at: DateTime<Utc>,
}

/// 工作单元的执行结果，调度核心只记录日志后丢弃
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOutcome {
    pub items_collected: u64,
}
