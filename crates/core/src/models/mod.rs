pub mod failure;
pub mod statistics;
pub mod task;
pub mod tick;

pub use failure::*;
pub use statistics::*;
pub use task::*;
pub use tick::*;
