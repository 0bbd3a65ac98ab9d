//! 配置管理
//!
//! 配置在启动时加载一次（默认值 → TOML 文件 → 环境变量），验证后以显式对象的形式
//! 传入各组件构造函数，不使用全局状态，也不支持热重载。
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use redditminer_core::config::AppConfig;
//!
//! let config = AppConfig::load(Some("config/redditminer.toml")).unwrap();
//! println!("调度间隔: {}秒", config.scheduler.tick_interval_seconds);
//! ```

pub mod models;

pub use models::{
    AppConfig, DatabaseConfig, LogFormat, ObservabilityConfig, RedditConfig, SchedulerConfig,
};

#[cfg(test)]
mod tests;
