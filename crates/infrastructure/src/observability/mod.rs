//! Observability module
//!
//! - Metrics collection and Prometheus export
//! - Structured logging
//! - The default failure sink

pub mod failure_sink;
pub mod metrics_collector;
pub mod structured_logger;
pub mod telemetry_setup;

// Re-export main types for convenience
pub use failure_sink::LoggingFailureSink;
pub use metrics_collector::MetricsCollector;
pub use structured_logger::StructuredLogger;
pub use telemetry_setup::init_metrics;
