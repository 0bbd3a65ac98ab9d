pub mod postgres_statistics_store;
pub mod postgres_task_source;

pub use postgres_statistics_store::*;
pub use postgres_task_source::*;
