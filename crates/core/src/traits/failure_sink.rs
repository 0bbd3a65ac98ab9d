use crate::models::DispatchFailure;

/// 失败记录出口
///
/// 尽力而为，不得阻塞调度。
pub trait FailureSink: Send + Sync {
    fn on_failure(&self, failure: DispatchFailure);
}
