//! 列表接口响应中调度用到的最小子集

use chrono::Utc;
use redditminer_core::models::{OrderingMode, RecencyWindow, SubredditSnapshot};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingChild {
    pub data: Post,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: i64,
}

/// 把一页列表汇总为统计快照
pub fn summarize_listing(
    source_id: &str,
    recency_window: RecencyWindow,
    ordering_mode: OrderingMode,
    listing: &Listing,
) -> SubredditSnapshot {
    let posts = &listing.data.children;
    SubredditSnapshot {
        source_id: source_id.to_string(),
        recency_window,
        ordering_mode,
        post_count: posts.len() as i64,
        total_score: posts
            .iter()
            .fold(0i64, |acc, c| acc.saturating_add(c.data.score)),
        total_comments: posts
            .iter()
            .fold(0i64, |acc, c| acc.saturating_add(c.data.num_comments)),
        captured_at: Utc::now(),
    }
}
