//! # Redditminer Testing Utils
//!
//! In-memory fakes for the scheduler's external collaborators and builders
//! for test data. Fakes are virtual-time friendly: every delay goes through
//! `tokio::time`, so tests can run with `start_paused = true`.
//!
//! ## Usage
//!
//! ```toml
//! [dev-dependencies]
//! redditminer-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod mocks;

// Re-export commonly used items
pub use builders::*;
pub use mocks::*;
