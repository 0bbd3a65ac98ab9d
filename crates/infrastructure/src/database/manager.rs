use std::time::Duration;

use redditminer_core::{config::DatabaseConfig, SchedulerResult};
use sqlx::PgPool;
use tracing::info;

/// 数据库连接池管理器
///
/// 连接池在启动时创建一次，克隆后交给任务源与统计存储共享。
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 创建连接池并做一次连通性检查
    ///
    /// 任一步失败都直接返回错误，调用方应当放弃启动。
    pub async fn connect(config: &DatabaseConfig) -> SchedulerResult<Self> {
        info!("连接数据库: {}", mask_database_url(&config.url));

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await?;

        let manager = Self { pool };
        manager.health_check().await?;

        info!("数据库连接成功");
        Ok(manager)
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 检查数据库连接健康状态
    pub async fn health_check(&self) -> SchedulerResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// 关闭数据库连接池
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// 屏蔽数据库URL中的密码
pub fn mask_database_url(url: &str) -> String {
    let authority_start = url.find("://").map(|pos| pos + 3).unwrap_or(0);
    let rest = &url[authority_start..];
    if let Some(at_pos) = rest.find('@') {
        if let Some(colon_pos) = rest[..at_pos].find(':') {
            let mut masked = url.to_string();
            masked.replace_range(
                authority_start + colon_pos + 1..authority_start + at_pos,
                "***",
            );
            return masked;
        }
    }
    url.to_string()
}
