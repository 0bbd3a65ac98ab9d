//! 外部协作者的具体实现：PostgreSQL 任务源与统计存储、Reddit 列表采集，
//! 以及日志与指标。

pub mod database;
pub mod observability;
pub mod reddit;

pub use database::*;
pub use observability::*;
pub use reddit::*;
