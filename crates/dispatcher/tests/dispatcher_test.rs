use std::sync::Arc;
use std::time::Duration;

use redditminer_core::models::{FailureKind, Tick};
use redditminer_dispatcher::TaskDispatcher;
use redditminer_infrastructure::MetricsCollector;
use redditminer_testing_utils::{numbered_tasks, RecordingFailureSink, RecordingWorkUnit};
use tokio::time::sleep;

fn create_dispatcher(
    work_unit: &RecordingWorkUnit,
    sink: &RecordingFailureSink,
    max_in_flight: Option<usize>,
) -> TaskDispatcher {
    TaskDispatcher::new(
        Arc::new(work_unit.clone()),
        Arc::new(sink.clone()),
        Arc::new(MetricsCollector::new().unwrap()),
        max_in_flight,
    )
}

#[tokio::test(start_paused = true)]
async fn test_one_execution_per_task() {
    let work_unit = RecordingWorkUnit::new();
    let sink = RecordingFailureSink::new();
    let dispatcher = create_dispatcher(&work_unit, &sink, None);

    let spawned = dispatcher.dispatch(&Tick::new(1), numbered_tasks(5));
    assert_eq!(spawned, 5);
    assert!(dispatcher.drain(None).await);

    assert_eq!(work_unit.call_count(), 5);
    assert_eq!(work_unit.successes().len(), 5);
    assert_eq!(sink.count(), 0);
    assert_eq!(dispatcher.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_empty_batch_spawns_nothing() {
    let work_unit = RecordingWorkUnit::new();
    let sink = RecordingFailureSink::new();
    let dispatcher = create_dispatcher(&work_unit, &sink, None);

    assert_eq!(dispatcher.dispatch(&Tick::new(1), Vec::new()), 0);
    assert_eq!(dispatcher.in_flight(), 0);
    assert_eq!(work_unit.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_does_not_wait_for_executions() {
    let work_unit = RecordingWorkUnit::new().with_delay(Duration::from_secs(60));
    let sink = RecordingFailureSink::new();
    let dispatcher = create_dispatcher(&work_unit, &sink, None);

    let spawned = dispatcher.dispatch(&Tick::new(1), numbered_tasks(3));
    assert_eq!(spawned, 3);
    assert_eq!(dispatcher.in_flight(), 3);
    assert!(work_unit.successes().is_empty());

    sleep(Duration::from_secs(61)).await;
    assert_eq!(work_unit.successes().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_execution_is_isolated() {
    let work_unit = RecordingWorkUnit::new().panic_for("sub2");
    let sink = RecordingFailureSink::new();
    let dispatcher = create_dispatcher(&work_unit, &sink, None);

    dispatcher.dispatch(&Tick::new(4), numbered_tasks(5));
    assert!(dispatcher.drain(None).await);

    assert_eq!(work_unit.successes().len(), 4);
    let failures = sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Panicked);
    assert_eq!(failures[0].task_id(), Some(2));
    assert_eq!(failures[0].tick, 4);
    assert!(failures[0].message.contains("sub2"));
}

#[tokio::test(start_paused = true)]
async fn test_failing_execution_is_isolated() {
    let work_unit = RecordingWorkUnit::new().fail_for("sub3", "malformed listing");
    let sink = RecordingFailureSink::new();
    let dispatcher = create_dispatcher(&work_unit, &sink, None);

    dispatcher.dispatch(&Tick::new(1), numbered_tasks(4));
    assert!(dispatcher.drain(None).await);

    assert_eq!(work_unit.successes().len(), 3);
    let failures = sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Error);
    assert_eq!(failures[0].task_id(), Some(3));
    assert!(failures[0].message.contains("malformed listing"));
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_cap_is_respected() {
    let work_unit = RecordingWorkUnit::new().with_delay(Duration::from_secs(5));
    let sink = RecordingFailureSink::new();
    let dispatcher = create_dispatcher(&work_unit, &sink, Some(2));

    // 分发立即返回，多余的执行在许可上排队
    assert_eq!(dispatcher.dispatch(&Tick::new(1), numbered_tasks(6)), 6);
    assert_eq!(dispatcher.in_flight(), 6);

    assert!(dispatcher.drain(None).await);
    assert_eq!(work_unit.call_count(), 6);
    assert_eq!(work_unit.max_in_flight(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_fan_out_runs_everything_at_once() {
    let work_unit = RecordingWorkUnit::new().with_delay(Duration::from_secs(5));
    let sink = RecordingFailureSink::new();
    let dispatcher = create_dispatcher(&work_unit, &sink, None);

    dispatcher.dispatch(&Tick::new(1), numbered_tasks(8));
    assert!(dispatcher.drain(None).await);
    assert_eq!(work_unit.max_in_flight(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_drain_timeout_leaves_work_running() {
    let work_unit = RecordingWorkUnit::new().with_delay(Duration::from_secs(100));
    let sink = RecordingFailureSink::new();
    let dispatcher = create_dispatcher(&work_unit, &sink, None);

    dispatcher.dispatch(&Tick::new(1), numbered_tasks(3));
    assert!(!dispatcher.drain(Some(Duration::from_secs(5))).await);
    assert_eq!(dispatcher.in_flight(), 3);

    // 超时不会中止执行
    sleep(Duration::from_secs(100)).await;
    assert_eq!(work_unit.successes().len(), 3);
    assert_eq!(dispatcher.in_flight(), 0);
}
