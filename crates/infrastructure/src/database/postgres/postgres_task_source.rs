use std::time::Instant;

use async_trait::async_trait;
use redditminer_core::{
    models::{Granularity, Task},
    traits::TaskSource,
    SchedulerError, SchedulerResult,
};
use sqlx::{PgPool, Row};
use tracing::{debug, instrument, warn};

/// 基于 PostgreSQL 的任务源
///
/// 连接池由调用方创建并共享，连接的并发控制交给 sqlx。
pub struct PostgresTaskSource {
    pool: PgPool,
}

impl PostgresTaskSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_task(row: &sqlx::postgres::PgRow) -> SchedulerResult<Task> {
        let recency_window: String = row.try_get("posts_created_within_past")?;
        let ordering_mode: String = row.try_get("order_by")?;
        let granularity: String = row.try_get("interval")?;

        Ok(Task {
            id: row.try_get("id")?,
            source_id: row.try_get("subreddit_name")?,
            recency_window: recency_window.parse()?,
            ordering_mode: ordering_mode.parse()?,
            granularity: granularity.parse()?,
        })
    }
}

#[async_trait]
impl TaskSource for PostgresTaskSource {
    #[instrument(skip(self), fields(granularity = %granularity))]
    async fn fetch_due_tasks(&self, granularity: Granularity) -> SchedulerResult<Vec<Task>> {
        let start = Instant::now();
        let rows = sqlx::query(
            r#"
            SELECT id, subreddit_name, posts_created_within_past, order_by, interval
            FROM tasks
            WHERE interval = $1
            ORDER BY id
            "#,
        )
        .bind(granularity.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SchedulerError::TaskSource(format!("查询到期任务失败: {e}")))?;

        // 单行数据异常只跳过该行，不影响同批其他任务
        let tasks: Vec<Task> = rows
            .iter()
            .filter_map(|row| match Self::row_to_task(row) {
                Ok(task) => Some(task),
                Err(e) => {
                    warn!("跳过无法解析的任务记录: {}", e);
                    None
                }
            })
            .collect();

        debug!(
            "查询到 {} 个 {} 粒度任务，耗时 {:?}",
            tasks.len(),
            granularity,
            start.elapsed()
        );
        Ok(tasks)
    }
}
