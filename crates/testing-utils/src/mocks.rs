//! In-memory fakes for the collaborator traits

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use redditminer_core::{
    models::{
        DispatchFailure, Granularity, OrderingMode, RecencyWindow, SubredditSnapshot, Task,
        WorkOutcome,
    },
    traits::{FailureSink, StatisticsStore, TaskSource, WorkUnit},
    SchedulerError, SchedulerResult,
};
use tokio::time::Instant;

enum ScriptedFetch {
    Tasks(Vec<Task>),
    Fail(String),
    Panic,
}

/// Scripted task source
///
/// Responses are consumed in push order; once the script runs out the
/// default batch (empty unless set) is returned on every call.
#[derive(Clone)]
pub struct MockTaskSource {
    script: Arc<Mutex<VecDeque<ScriptedFetch>>>,
    default_batch: Arc<Mutex<Vec<Task>>>,
    fetch_delay: Option<Duration>,
    calls: Arc<Mutex<Vec<(Granularity, Instant)>>>,
}

impl MockTaskSource {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            default_batch: Arc::new(Mutex::new(Vec::new())),
            fetch_delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every fetch sleeps this long (virtual time) before answering
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn with_default_batch(self, tasks: Vec<Task>) -> Self {
        *self.default_batch.lock().unwrap() = tasks;
        self
    }

    pub fn push_tasks(&self, tasks: Vec<Task>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedFetch::Tasks(tasks));
    }

    pub fn push_failure(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedFetch::Fail(message.to_string()));
    }

    /// The matching fetch panics instead of answering
    pub fn push_panic(&self) {
        self.script.lock().unwrap().push_back(ScriptedFetch::Panic);
    }

    pub fn fetch_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn fetch_granularities(&self) -> Vec<Granularity> {
        self.calls.lock().unwrap().iter().map(|(g, _)| *g).collect()
    }

    pub fn fetch_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

impl Default for MockTaskSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskSource for MockTaskSource {
    async fn fetch_due_tasks(&self, granularity: Granularity) -> SchedulerResult<Vec<Task>> {
        self.calls
            .lock()
            .unwrap()
            .push((granularity, Instant::now()));

        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(ScriptedFetch::Tasks(tasks)) => Ok(tasks),
            Some(ScriptedFetch::Fail(message)) => Err(SchedulerError::TaskSource(message)),
            Some(ScriptedFetch::Panic) => panic!("task source blew up"),
            None => Ok(self.default_batch.lock().unwrap().clone()),
        }
    }
}

/// One recorded work unit call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnitCall {
    pub source_id: String,
    pub recency_window: RecencyWindow,
    pub ordering_mode: OrderingMode,
}

#[derive(Debug, Clone)]
enum Behavior {
    Fail(String),
    Panic,
}

/// Work unit fake that records calls and outcomes
///
/// Sources can be configured to fail or panic; all others succeed after the
/// optional delay.
#[derive(Clone)]
pub struct RecordingWorkUnit {
    delay: Option<Duration>,
    behaviors: Arc<Mutex<HashMap<String, Behavior>>>,
    calls: Arc<Mutex<Vec<WorkUnitCall>>>,
    successes: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl RecordingWorkUnit {
    pub fn new() -> Self {
        Self {
            delay: None,
            behaviors: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            successes: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every execution sleeps this long (virtual time) before finishing
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_for(self, source_id: &str, message: &str) -> Self {
        self.behaviors
            .lock()
            .unwrap()
            .insert(source_id.to_string(), Behavior::Fail(message.to_string()));
        self
    }

    pub fn panic_for(self, source_id: &str) -> Self {
        self.behaviors
            .lock()
            .unwrap()
            .insert(source_id.to_string(), Behavior::Panic);
        self
    }

    pub fn calls(&self) -> Vec<WorkUnitCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously running executions observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for RecordingWorkUnit {
    fn default() -> Self {
        Self::new()
    }
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl WorkUnit for RecordingWorkUnit {
    async fn run(
        &self,
        source_id: &str,
        recency_window: RecencyWindow,
        ordering_mode: OrderingMode,
    ) -> SchedulerResult<WorkOutcome> {
        self.calls.lock().unwrap().push(WorkUnitCall {
            source_id: source_id.to_string(),
            recency_window,
            ordering_mode,
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let behavior = self.behaviors.lock().unwrap().get(source_id).cloned();
        match behavior {
            Some(Behavior::Fail(message)) => Err(SchedulerError::WorkUnit(message)),
            Some(Behavior::Panic) => panic!("work unit for {source_id} blew up"),
            None => {
                self.successes.lock().unwrap().push(source_id.to_string());
                Ok(WorkOutcome { items_collected: 1 })
            }
        }
    }
}

/// Failure sink that keeps every record
#[derive(Clone, Default)]
pub struct RecordingFailureSink {
    failures: Arc<Mutex<Vec<DispatchFailure>>>,
}

impl RecordingFailureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<DispatchFailure> {
        self.failures.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.failures.lock().unwrap().len()
    }
}

impl FailureSink for RecordingFailureSink {
    fn on_failure(&self, failure: DispatchFailure) {
        self.failures.lock().unwrap().push(failure);
    }
}

/// Statistics store that keeps snapshots in memory
#[derive(Clone, Default)]
pub struct RecordingStatisticsStore {
    snapshots: Arc<Mutex<Vec<SubredditSnapshot>>>,
}

impl RecordingStatisticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<SubredditSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatisticsStore for RecordingStatisticsStore {
    async fn record_snapshot(&self, snapshot: &SubredditSnapshot) -> SchedulerResult<()> {
        self.snapshots.lock().unwrap().push(snapshot.clone());
        Ok(())
    }
}
