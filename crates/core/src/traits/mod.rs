pub mod failure_sink;
pub mod statistics_store;
pub mod task_source;
pub mod work_unit;

pub use failure_sink::*;
pub use statistics_store::*;
pub use task_source::*;
pub use work_unit::*;
