pub mod app_config;
pub mod database;
pub mod observability;
pub mod reddit;
pub mod scheduler;

// Re-export main types for easier imports
pub use app_config::AppConfig;
pub use database::DatabaseConfig;
pub use observability::{LogFormat, ObservabilityConfig};
pub use reddit::RedditConfig;
pub use scheduler::SchedulerConfig;
