pub mod manager;
pub mod postgres;

pub use manager::{mask_database_url, DatabaseManager};
pub use postgres::{PostgresStatisticsStore, PostgresTaskSource};
