//! Structured logging utilities
//!
//! Keeps the event names and field shapes of the scheduler's log output in
//! one place so downstream log queries stay stable.

use redditminer_core::models::{DispatchFailure, FailureKind, FailureStage, Granularity, Task};
use tracing::{debug, error, info, warn};

/// Structured logging utilities
pub struct StructuredLogger;

impl StructuredLogger {
    /// Log a timer firing
    pub fn log_tick_fired(tick: u64, granularity: Granularity) {
        debug!(
            event = "tick_fired",
            tick.sequence = tick,
            tick.granularity = %granularity,
            "Tick fired"
        );
    }

    /// Log the due tasks returned for one tick
    pub fn log_tasks_fetched(tick: u64, granularity: Granularity, tasks: &[Task]) {
        info!(
            event = "tasks_fetched",
            tick.sequence = tick,
            tick.granularity = %granularity,
            tasks.count = tasks.len(),
            tasks.sources = ?tasks.iter().map(|t| t.source_id.as_str()).collect::<Vec<_>>(),
            "Due tasks fetched"
        );
    }

    /// Log one spawned work unit
    pub fn log_task_dispatched(tick: u64, task: &Task) {
        debug!(
            event = "task_dispatched",
            tick.sequence = tick,
            task.id = task.id,
            task.source = %task.source_id,
            task.window = %task.recency_window,
            task.order = %task.ordering_mode,
            "Work unit spawned"
        );
    }

    /// Log a work unit completion
    pub fn log_task_completed(tick: u64, task: &Task, items_collected: u64, duration_ms: u64) {
        info!(
            event = "task_completed",
            tick.sequence = tick,
            task.id = task.id,
            task.source = %task.source_id,
            task.items = items_collected,
            task.duration_ms = duration_ms,
            "Work unit completed"
        );
    }

    /// Log a failure record produced by the scheduler or the dispatcher
    pub fn log_dispatch_failure(failure: &DispatchFailure) {
        match (&failure.stage, failure.kind) {
            (FailureStage::Fetch { granularity }, _) => {
                warn!(
                    event = "fetch_failed",
                    tick.sequence = failure.tick,
                    tick.granularity = %granularity,
                    error = %failure.message,
                    "Fetching due tasks failed, skipping dispatch for this tick"
                );
            }
            (FailureStage::Execution { task_id, source_id }, FailureKind::Error) => {
                error!(
                    event = "task_failed",
                    tick.sequence = failure.tick,
                    task.id = task_id,
                    task.source = %source_id,
                    error = %failure.message,
                    "Work unit failed"
                );
            }
            (FailureStage::Execution { task_id, source_id }, FailureKind::Panicked) => {
                error!(
                    event = "task_panicked",
                    tick.sequence = failure.tick,
                    task.id = task_id,
                    task.source = %source_id,
                    panic = %failure.message,
                    "Work unit panicked"
                );
            }
        }
    }

    /// Log scheduler lifecycle changes
    pub fn log_lifecycle(component: &str, state: &str) {
        info!(
            event = "lifecycle",
            component = component,
            state = state,
            "Lifecycle state changed"
        );
    }

    /// Log an unexpected internal error
    pub fn log_system_error(component: &str, operation: &str, error: &dyn std::error::Error) {
        error!(
            event = "system_error",
            component = component,
            operation = operation,
            error = %error,
            "System error occurred"
        );
    }
}
