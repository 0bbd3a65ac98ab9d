use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redditminer_core::{
    config::RedditConfig,
    models::{OrderingMode, RecencyWindow, WorkOutcome},
    traits::{StatisticsStore, WorkUnit},
    SchedulerError, SchedulerResult,
};
use tracing::{debug, instrument};

use super::listing::{summarize_listing, Listing};

/// 基于公共 JSON 列表接口的工作单元
///
/// 每次调用拉取一页列表，汇总后写入一条统计快照。同一任务重复执行只会多写一条快照，
/// 因此允许重叠执行。
pub struct RedditListingScraper {
    client: reqwest::Client,
    base_url: String,
    listing_limit: u32,
    store: Arc<dyn StatisticsStore>,
}

impl RedditListingScraper {
    pub fn new(config: &RedditConfig, store: Arc<dyn StatisticsStore>) -> SchedulerResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| SchedulerError::Network(format!("创建HTTP客户端失败: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            listing_limit: config.listing_limit,
            store,
        })
    }

    pub fn listing_url(
        &self,
        source_id: &str,
        recency_window: RecencyWindow,
        ordering_mode: OrderingMode,
    ) -> String {
        format!(
            "{}/r/{}/{}.json?t={}&limit={}",
            self.base_url, source_id, ordering_mode, recency_window, self.listing_limit
        )
    }

    fn validate_source_id(source_id: &str) -> SchedulerResult<()> {
        let valid = !source_id.is_empty()
            && source_id.len() <= 21
            && source_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(())
        } else {
            Err(SchedulerError::InvalidTaskParams(format!(
                "无效的subreddit名称: {source_id:?}"
            )))
        }
    }
}

#[async_trait]
impl WorkUnit for RedditListingScraper {
    #[instrument(skip(self), fields(source = %source_id, window = %recency_window, order = %ordering_mode))]
    async fn run(
        &self,
        source_id: &str,
        recency_window: RecencyWindow,
        ordering_mode: OrderingMode,
    ) -> SchedulerResult<WorkOutcome> {
        Self::validate_source_id(source_id)?;

        let url = self.listing_url(source_id, recency_window, ordering_mode);
        debug!("请求列表: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SchedulerError::Network(format!("请求 {url} 失败: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SchedulerError::WorkUnit(format!(
                "r/{source_id} 返回非成功状态码: {status}"
            )));
        }

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| SchedulerError::Serialization(format!("解析 r/{source_id} 列表失败: {e}")))?;

        let snapshot = summarize_listing(source_id, recency_window, ordering_mode, &listing);
        self.store.record_snapshot(&snapshot).await?;

        Ok(WorkOutcome {
            items_collected: snapshot.post_count as u64,
        })
    }
}
