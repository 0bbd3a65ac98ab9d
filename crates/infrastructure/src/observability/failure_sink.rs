use redditminer_core::{models::DispatchFailure, traits::FailureSink};

use super::StructuredLogger;

/// 默认失败出口：写入结构化日志
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingFailureSink;

impl LoggingFailureSink {
    pub fn new() -> Self {
        Self
    }
}

impl FailureSink for LoggingFailureSink {
    fn on_failure(&self, failure: DispatchFailure) {
        StructuredLogger::log_dispatch_failure(&failure);
    }
}
