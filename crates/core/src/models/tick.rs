use chrono::{DateTime, Utc};

/// 一次定时器触发
///
/// 只携带序号和触发时间，由调度循环产生并在同一轮内消费。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// 从 1 开始递增
    pub sequence: u64,
    pub fired_at: DateTime<Utc>,
}

impl Tick {
    pub fn new(sequence: u64) -> Self {
        Self {
            sequence,
            fired_at: Utc::now(),
        }
    }
}
