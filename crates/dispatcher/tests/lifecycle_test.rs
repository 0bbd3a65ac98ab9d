use std::sync::Arc;
use std::time::Duration;

use redditminer_core::models::Granularity;
use redditminer_core::SchedulerError;
use redditminer_dispatcher::{
    DrainPolicy, LifecycleController, LifecycleState, SchedulerOptions, ShutdownReason,
    TaskDispatcher, TickScheduler,
};
use redditminer_infrastructure::MetricsCollector;
use redditminer_testing_utils::{
    MockTaskSource, RecordingFailureSink, RecordingWorkUnit, TaskBuilder,
};
use tokio::sync::oneshot;
use tokio::time::sleep;

fn create_controller(
    source: &MockTaskSource,
    work_unit: &RecordingWorkUnit,
    drain: DrainPolicy,
) -> LifecycleController {
    let sink = RecordingFailureSink::new();
    let metrics = Arc::new(MetricsCollector::new().unwrap());
    let dispatcher = Arc::new(TaskDispatcher::new(
        Arc::new(work_unit.clone()),
        Arc::new(sink.clone()),
        Arc::clone(&metrics),
        None,
    ));
    let scheduler = Arc::new(TickScheduler::new(
        Arc::new(source.clone()),
        dispatcher,
        Arc::new(sink),
        metrics,
        SchedulerOptions {
            tick_interval: Duration::from_secs(10),
            granularity: Granularity::Day,
            drain,
        },
    ));
    LifecycleController::new(scheduler)
}

#[tokio::test(start_paused = true)]
async fn test_state_transitions_through_shutdown() {
    let source = MockTaskSource::new();
    let work_unit = RecordingWorkUnit::new();
    let controller = Arc::new(create_controller(
        &source,
        &work_unit,
        DrainPolicy::Wait { timeout: None },
    ));
    assert_eq!(controller.state(), LifecycleState::Idle);

    let mut states = controller.subscribe();
    let (signal_tx, signal_rx) = oneshot::channel::<ShutdownReason>();
    let runner = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            controller
                .run_until(async move { signal_rx.await.unwrap_or(ShutdownReason::Interrupt) })
                .await
        })
    };

    states.changed().await.unwrap();
    assert_eq!(*states.borrow_and_update(), LifecycleState::Running);

    sleep(Duration::from_secs(25)).await;
    signal_tx.send(ShutdownReason::Terminate).unwrap();

    let report = runner.await.unwrap().unwrap();
    assert!(report.drained);
    assert_eq!(controller.state(), LifecycleState::Stopped);
    assert_eq!(source.fetch_count(), 2);
    assert!(source
        .fetch_granularities()
        .iter()
        .all(|g| *g == Granularity::Day));
}

#[tokio::test(start_paused = true)]
async fn test_run_until_waits_for_in_flight_work() {
    let source = MockTaskSource::new();
    source.push_tasks(vec![TaskBuilder::new().build()]);
    let work_unit = RecordingWorkUnit::new().with_delay(Duration::from_secs(40));
    let controller = create_controller(&source, &work_unit, DrainPolicy::Wait { timeout: None });

    let report = controller
        .run_until(async {
            sleep(Duration::from_secs(15)).await;
            ShutdownReason::Interrupt
        })
        .await
        .unwrap();

    assert!(report.drained);
    assert_eq!(work_unit.successes().len(), 1);
    assert_eq!(controller.state(), LifecycleState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_drain_timeout_bounds_shutdown() {
    let source = MockTaskSource::new();
    source.push_tasks(vec![TaskBuilder::new().build()]);
    let work_unit = RecordingWorkUnit::new().with_delay(Duration::from_secs(600));
    let controller = create_controller(
        &source,
        &work_unit,
        DrainPolicy::Wait {
            timeout: Some(Duration::from_secs(30)),
        },
    );

    let started = tokio::time::Instant::now();
    let report = controller
        .run_until(async {
            sleep(Duration::from_secs(15)).await;
            ShutdownReason::Terminate
        })
        .await
        .unwrap();

    assert!(!report.drained);
    assert_eq!(report.in_flight_remaining, 1);
    assert_eq!(started.elapsed(), Duration::from_secs(45));
    assert_eq!(controller.state(), LifecycleState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_skip_drain_returns_after_timer_stops() {
    let source = MockTaskSource::new();
    source.push_tasks(vec![TaskBuilder::new().build()]);
    let work_unit = RecordingWorkUnit::new().with_delay(Duration::from_secs(600));
    let controller = create_controller(&source, &work_unit, DrainPolicy::Skip);

    let report = controller
        .run_until(async {
            sleep(Duration::from_secs(15)).await;
            ShutdownReason::Interrupt
        })
        .await
        .unwrap();

    assert!(!report.drained);
    assert_eq!(report.in_flight_remaining, 1);
    assert!(work_unit.successes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cannot_restart_after_stop() {
    let source = MockTaskSource::new();
    let work_unit = RecordingWorkUnit::new();
    let controller = create_controller(&source, &work_unit, DrainPolicy::Skip);

    controller.start().unwrap();
    assert_eq!(controller.state(), LifecycleState::Running);
    assert!(matches!(
        controller.start().unwrap_err(),
        SchedulerError::InvalidLifecycleState { .. }
    ));

    controller
        .run_until(async { ShutdownReason::Interrupt })
        .await
        .unwrap();
    assert_eq!(controller.state(), LifecycleState::Stopped);

    let err = controller
        .run_until(async { ShutdownReason::Interrupt })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SchedulerError::InvalidLifecycleState {
            expected: "running",
            actual: "stopped"
        }
    ));
}
