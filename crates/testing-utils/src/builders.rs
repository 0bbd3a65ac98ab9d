//! Test data builders

use redditminer_core::models::{Granularity, OrderingMode, RecencyWindow, Task};

/// Builder for creating test Task entities
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self {
            task: Task {
                id: 1,
                source_id: "rust".to_string(),
                recency_window: RecencyWindow::Day,
                ordering_mode: OrderingMode::Top,
                granularity: Granularity::Hour,
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.task.id = id;
        self
    }

    pub fn with_source(mut self, source_id: &str) -> Self {
        self.task.source_id = source_id.to_string();
        self
    }

    pub fn with_recency_window(mut self, recency_window: RecencyWindow) -> Self {
        self.task.recency_window = recency_window;
        self
    }

    pub fn with_ordering_mode(mut self, ordering_mode: OrderingMode) -> Self {
        self.task.ordering_mode = ordering_mode;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.task.granularity = granularity;
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` tasks with ids `1..=count` and sources `sub1`, `sub2`, ...
pub fn numbered_tasks(count: usize) -> Vec<Task> {
    (1..=count)
        .map(|i| {
            TaskBuilder::new()
                .with_id(i as i64)
                .with_source(&format!("sub{i}"))
                .build()
        })
        .collect()
}
