use async_trait::async_trait;
use redditminer_core::{models::SubredditSnapshot, traits::StatisticsStore, SchedulerResult};
use sqlx::PgPool;
use tracing::{debug, instrument};

/// 将采集快照写入 `subreddit_statistics`
pub struct PostgresStatisticsStore {
    pool: PgPool,
}

impl PostgresStatisticsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatisticsStore for PostgresStatisticsStore {
    #[instrument(skip(self, snapshot), fields(source = %snapshot.source_id))]
    async fn record_snapshot(&self, snapshot: &SubredditSnapshot) -> SchedulerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subreddit_statistics
                (subreddit_name, posts_created_within_past, order_by,
                 post_count, total_score, total_comments, captured_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&snapshot.source_id)
        .bind(snapshot.recency_window.as_str())
        .bind(snapshot.ordering_mode.as_str())
        .bind(snapshot.post_count)
        .bind(snapshot.total_score)
        .bind(snapshot.total_comments)
        .bind(snapshot.captured_at)
        .execute(&self.pool)
        .await?;

        debug!("已记录 r/{} 的统计快照", snapshot.source_id);
        Ok(())
    }
}
