use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::Granularity;

/// 调度器配置
///
/// `tick_interval_seconds` 与 `granularity` 相互独立：前者决定定时器多久触发一次，
/// 后者决定每次触发时向任务源请求哪个粒度的任务。两者都在构造时确定，不支持热更新。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub tick_interval_seconds: u64,
    pub granularity: Granularity,
    /// 同时执行的工作单元上限，`None` 表示不限制
    pub max_in_flight: Option<usize>,
    /// 停止时是否等待已派发的工作单元完成
    pub drain_on_stop: bool,
    /// 等待的上限，`None` 表示一直等待；`drain_on_stop` 为 false 时忽略
    pub drain_timeout_seconds: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_seconds: 60,
            granularity: Granularity::Hour,
            max_in_flight: None,
            drain_on_stop: true,
            drain_timeout_seconds: Some(30),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_interval_seconds == 0 {
            return Err(anyhow::anyhow!("调度间隔必须大于0"));
        }

        if self.max_in_flight == Some(0) {
            return Err(anyhow::anyhow!("最大并发执行数必须大于0"));
        }

        if self.drain_timeout_seconds == Some(0) {
            return Err(anyhow::anyhow!("排空超时时间必须大于0"));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_seconds)
    }

    pub fn drain_timeout(&self) -> Option<Duration> {
        self.drain_timeout_seconds.map(Duration::from_secs)
    }
}
