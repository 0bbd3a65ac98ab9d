use std::sync::Arc;

use anyhow::{Context, Result};
use redditminer_core::{config::AppConfig, traits::FailureSink};
use redditminer_dispatcher::{
    LifecycleController, SchedulerOptions, StopReport, TaskDispatcher, TickScheduler,
};
use redditminer_infrastructure::{
    DatabaseManager, LoggingFailureSink, MetricsCollector,
    PostgresStatisticsStore, PostgresTaskSource, RedditListingScraper,
};
use tracing::info;

use crate::shutdown::ShutdownSignal;

/// 主应用程序
///
/// 负责组装所有组件：配置只在这里读取一次，之后以 `Arc` 的形式交给各组件。
pub struct Application {
    database: DatabaseManager,
    controller: LifecycleController,
}

impl Application {
    /// 创建新的应用实例
    ///
    /// 数据库不可达、HTTP 客户端创建失败都会直接返回错误，此时调度器尚未启动。
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let database = DatabaseManager::connect(&config.database)
            .await
            .context("连接数据库失败")?;
        info!(
            interval_seconds = config.scheduler.tick_interval_seconds,
            "数据库就绪，开始组装调度器"
        );

        // 创建指标收集器
        let metrics = Arc::new(MetricsCollector::new().context("创建指标收集器失败")?);

        let task_source = Arc::new(PostgresTaskSource::new(database.pool().clone()));
        let statistics_store = Arc::new(PostgresStatisticsStore::new(database.pool().clone()));
        let work_unit = Arc::new(
            RedditListingScraper::new(&config.reddit, statistics_store)
                .context("创建列表采集器失败")?,
        );
        let failure_sink: Arc<dyn FailureSink> = Arc::new(LoggingFailureSink::new());

        let dispatcher = Arc::new(TaskDispatcher::new(
            work_unit,
            Arc::clone(&failure_sink),
            Arc::clone(&metrics),
            config.scheduler.max_in_flight,
        ));
        let scheduler = Arc::new(TickScheduler::new(
            task_source,
            dispatcher,
            failure_sink,
            metrics,
            SchedulerOptions::from_config(&config.scheduler),
        ));

        Ok(Self {
            database,
            controller: LifecycleController::new(scheduler),
        })
    }

    /// 运行直到收到终止信号，停止收尾后关闭数据库连接池
    pub async fn run(&self, shutdown: ShutdownSignal) -> Result<StopReport> {
        let report = self
            .controller
            .run_until(shutdown.recv())
            .await
            .context("调度器运行失败")?;

        self.database.close().await;
        Ok(report)
    }
}
