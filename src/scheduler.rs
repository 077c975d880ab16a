//! Refresh scheduling: the cycle itself, the overlap guard, and the timer.
//!
//! A refresh cycle fetches all four sources concurrently on the async
//! runtime and reports back through a channel. The UI thread never awaits
//! anything; it drains finished cycles with [`Scheduler::try_complete`].
//!
//! ```text
//!            trigger (Initial | Timer | Manual)
//!                         │
//!          ┌──────────────┴───────────────┐
//!          ▼                              ▼
//!        Idle ──── spawn cycle ────▶ Refreshing
//!          ▲                              │  trigger: Skip → dropped
//!          │                              │           Queue → pending (max 1)
//!          └──── outcome received ◀───────┘
//!                (pending? spawn again)
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::source::{
    AlertPayload, CollectionStatusPayload, DashboardSource, HealthPayload, QualityPayload,
};

/// Whether a refresh cycle is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// What to do with a trigger that arrives while a cycle is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Drop the trigger.
    #[default]
    Skip,
    /// Remember one trigger and run it as soon as the current cycle settles.
    Queue,
}

/// Why a cycle was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Initial,
    Timer,
    Manual,
}

/// Result of asking the scheduler for a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResult {
    Started,
    Skipped,
    Queued,
}

/// The settled results of one refresh cycle, one per source.
#[derive(Debug)]
pub struct CycleOutcome {
    pub trigger: Trigger,
    pub health: Result<HealthPayload, FetchError>,
    pub quality: Result<QualityPayload, FetchError>,
    pub collection_status: Result<Vec<CollectionStatusPayload>, FetchError>,
    pub alerts: Result<Vec<AlertPayload>, FetchError>,
    pub elapsed: Duration,
}

impl CycleOutcome {
    /// Outcome for a cycle whose task died before reporting.
    fn aborted(trigger: Trigger, reason: &str, elapsed: Duration) -> Self {
        let err = || FetchError::Aborted(reason.to_string());
        Self {
            trigger,
            health: Err(err()),
            quality: Err(err()),
            collection_status: Err(err()),
            alerts: Err(err()),
            elapsed,
        }
    }

    /// Number of sources that failed in this cycle.
    pub fn failure_count(&self) -> usize {
        [
            self.health.is_err(),
            self.quality.is_err(),
            self.collection_status.is_err(),
            self.alerts.is_err(),
        ]
        .iter()
        .filter(|failed| **failed)
        .count()
    }
}

/// Run one refresh cycle: fetch all four sources concurrently.
///
/// Never fails as a whole; every source settles to its own `Result`.
pub async fn refresh_cycle(source: &dyn DashboardSource, trigger: Trigger) -> CycleOutcome {
    let started = Instant::now();

    let (health, quality, collection_status, alerts) = tokio::join!(
        source.fetch_health(),
        source.fetch_quality(),
        source.fetch_collection_status(),
        source.fetch_alerts(),
    );

    CycleOutcome {
        trigger,
        health,
        quality,
        collection_status,
        alerts,
        elapsed: started.elapsed(),
    }
}

/// Counters for scheduler activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub started: u64,
    pub completed: u64,
    pub skipped: u64,
    pub queued: u64,
}

/// Dispatches refresh cycles onto the runtime and enforces the overlap guard.
pub struct Scheduler {
    source: Arc<dyn DashboardSource>,
    runtime: Handle,
    policy: OverlapPolicy,
    state: RefreshState,
    pending: Option<Trigger>,
    tx: mpsc::UnboundedSender<CycleOutcome>,
    rx: mpsc::UnboundedReceiver<CycleOutcome>,
    stats: SchedulerStats,
}

impl Scheduler {
    /// Create a scheduler that spawns cycles on `runtime`.
    pub fn new(source: Arc<dyn DashboardSource>, runtime: Handle, policy: OverlapPolicy) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            runtime,
            policy,
            state: RefreshState::Idle,
            pending: None,
            tx,
            rx,
            stats: SchedulerStats::default(),
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Returns a description of the underlying source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Request a refresh cycle.
    pub fn trigger(&mut self, trigger: Trigger) -> TriggerResult {
        match (self.state, self.policy) {
            (RefreshState::Idle, _) => {
                self.spawn_cycle(trigger);
                TriggerResult::Started
            }
            (RefreshState::Refreshing, OverlapPolicy::Skip) => {
                self.stats.skipped += 1;
                debug!(trigger = ?trigger, "refresh in progress, trigger skipped");
                TriggerResult::Skipped
            }
            (RefreshState::Refreshing, OverlapPolicy::Queue) => {
                self.stats.queued += 1;
                self.pending.get_or_insert(trigger);
                debug!(trigger = ?trigger, "refresh in progress, trigger queued");
                TriggerResult::Queued
            }
        }
    }

    /// Take a finished cycle without blocking, if one is ready.
    pub fn try_complete(&mut self) -> Option<CycleOutcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.settle();
        Some(outcome)
    }

    /// Wait for the next finished cycle.
    ///
    /// Used by headless callers and tests; the TUI uses [`Self::try_complete`].
    pub async fn next_outcome(&mut self) -> Option<CycleOutcome> {
        if self.state == RefreshState::Idle {
            return None;
        }
        let outcome = self.rx.recv().await?;
        self.settle();
        Some(outcome)
    }

    fn settle(&mut self) {
        self.state = RefreshState::Idle;
        self.stats.completed += 1;
        if let Some(trigger) = self.pending.take() {
            self.spawn_cycle(trigger);
        }
    }

    fn spawn_cycle(&mut self, trigger: Trigger) {
        self.state = RefreshState::Refreshing;
        self.stats.started += 1;
        info!(trigger = ?trigger, source = self.source.description(), "refresh cycle started");

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let outcome = run_cycle_task(source, trigger).await;

            // The receiver lives as long as the scheduler
            let _ = tx.send(outcome);
        });
    }
}

/// Run [`refresh_cycle`] in its own task on the current runtime.
///
/// A panic inside a fetch settles as an aborted outcome in which every
/// source failed. Must be called from within a tokio runtime.
pub async fn run_cycle_task(source: Arc<dyn DashboardSource>, trigger: Trigger) -> CycleOutcome {
    let started = Instant::now();
    let cycle = tokio::spawn(async move { refresh_cycle(source.as_ref(), trigger).await });

    match cycle.await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "refresh cycle task failed");
            CycleOutcome::aborted(trigger, &e.to_string(), started.elapsed())
        }
    }
}

/// Periodic timer driving refresh cycles.
///
/// Armed once; after that it reports due exactly once per interval. If the
/// caller falls behind by more than an interval, missed ticks collapse into
/// one and the schedule restarts from the current time.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Start the schedule; the first tick is one interval after `now`.
    /// Arming an armed timer does nothing.
    pub fn arm(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Returns true if a tick is due at `now`, advancing the schedule.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let next = due + self.interval;
        self.next_due = Some(if next <= now { now + self.interval } else { next });
        true
    }

    /// Time left until the next tick.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::{Barrier, Semaphore};

    use crate::source::{sample, SampleSource};

    /// Health fetches block until the test releases them.
    #[derive(Debug)]
    struct GatedSource {
        gate: Semaphore,
        health_calls: AtomicUsize,
    }

    impl GatedSource {
        fn new() -> Self {
            Self {
                gate: Semaphore::new(0),
                health_calls: AtomicUsize::new(0),
            }
        }

        fn release(&self, cycles: usize) {
            self.gate.add_permits(cycles);
        }

        fn health_calls(&self) -> usize {
            self.health_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DashboardSource for GatedSource {
        async fn fetch_health(&self) -> Result<HealthPayload, FetchError> {
            self.health_calls.fetch_add(1, Ordering::SeqCst);
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| FetchError::Aborted(e.to_string()))?;
            permit.forget();
            Ok(sample::health())
        }

        async fn fetch_quality(&self) -> Result<QualityPayload, FetchError> {
            Ok(sample::quality())
        }

        async fn fetch_collection_status(
            &self,
        ) -> Result<Vec<CollectionStatusPayload>, FetchError> {
            Ok(sample::collection_status())
        }

        async fn fetch_alerts(&self) -> Result<Vec<AlertPayload>, FetchError> {
            Ok(sample::alerts())
        }

        fn description(&self) -> &str {
            "gated"
        }
    }

    /// Quality always fails; every fetch takes `delay`.
    #[derive(Debug)]
    struct SlowFlakySource {
        delay: Duration,
    }

    #[async_trait]
    impl DashboardSource for SlowFlakySource {
        async fn fetch_health(&self) -> Result<HealthPayload, FetchError> {
            tokio::time::sleep(self.delay).await;
            Ok(sample::health())
        }

        async fn fetch_quality(&self) -> Result<QualityPayload, FetchError> {
            tokio::time::sleep(self.delay).await;
            Err(FetchError::Http("quality returned status 503".to_string()))
        }

        async fn fetch_collection_status(
            &self,
        ) -> Result<Vec<CollectionStatusPayload>, FetchError> {
            tokio::time::sleep(self.delay).await;
            Ok(sample::collection_status())
        }

        async fn fetch_alerts(&self) -> Result<Vec<AlertPayload>, FetchError> {
            tokio::time::sleep(self.delay).await;
            Ok(Vec::new())
        }

        fn description(&self) -> &str {
            "slow"
        }
    }

    /// Each fetch completes only once all four are waiting.
    #[derive(Debug)]
    struct BarrierSource {
        barrier: Barrier,
    }

    #[async_trait]
    impl DashboardSource for BarrierSource {
        async fn fetch_health(&self) -> Result<HealthPayload, FetchError> {
            self.barrier.wait().await;
            Ok(sample::health())
        }

        async fn fetch_quality(&self) -> Result<QualityPayload, FetchError> {
            self.barrier.wait().await;
            Ok(sample::quality())
        }

        async fn fetch_collection_status(
            &self,
        ) -> Result<Vec<CollectionStatusPayload>, FetchError> {
            self.barrier.wait().await;
            Ok(sample::collection_status())
        }

        async fn fetch_alerts(&self) -> Result<Vec<AlertPayload>, FetchError> {
            self.barrier.wait().await;
            Ok(sample::alerts())
        }

        fn description(&self) -> &str {
            "barrier"
        }
    }

    #[derive(Debug)]
    struct PanickingSource;

    #[async_trait]
    impl DashboardSource for PanickingSource {
        async fn fetch_health(&self) -> Result<HealthPayload, FetchError> {
            panic!("backend client bug");
        }

        async fn fetch_quality(&self) -> Result<QualityPayload, FetchError> {
            Ok(sample::quality())
        }

        async fn fetch_collection_status(
            &self,
        ) -> Result<Vec<CollectionStatusPayload>, FetchError> {
            Ok(Vec::new())
        }

        async fn fetch_alerts(&self) -> Result<Vec<AlertPayload>, FetchError> {
            Ok(Vec::new())
        }

        fn description(&self) -> &str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn test_refresh_cycle_collects_all_sources() {
        let outcome = refresh_cycle(&SampleSource::new(), Trigger::Manual).await;
        assert_eq!(outcome.trigger, Trigger::Manual);
        assert_eq!(outcome.failure_count(), 0);
        assert_eq!(outcome.health.unwrap().overall_score, 85.5);
    }

    #[tokio::test]
    async fn test_one_failing_source_does_not_fail_the_cycle() {
        let source = SlowFlakySource {
            delay: Duration::from_millis(1),
        };
        let outcome = refresh_cycle(&source, Trigger::Timer).await;

        assert_eq!(outcome.failure_count(), 1);
        assert!(outcome.quality.is_err());
        assert!(outcome.health.is_ok());
        assert!(outcome.collection_status.is_ok());
        assert!(outcome.alerts.is_ok());
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        // Every fetch waits for the other three, so sequential awaiting
        // would never get past the first one
        let source = BarrierSource {
            barrier: Barrier::new(4),
        };
        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            refresh_cycle(&source, Trigger::Timer),
        )
        .await
        .expect("fetches were not awaited concurrently");

        assert_eq!(outcome.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_cycle_task_turns_panic_into_aborted_outcome() {
        let outcome = run_cycle_task(Arc::new(PanickingSource), Trigger::Manual).await;

        assert_eq!(outcome.trigger, Trigger::Manual);
        assert_eq!(outcome.failure_count(), 4);
        assert!(matches!(outcome.quality, Err(FetchError::Aborted(_))));
        assert!(matches!(outcome.alerts, Err(FetchError::Aborted(_))));
    }

    #[tokio::test]
    async fn test_cycle_task_passes_through_normal_outcome() {
        let outcome = run_cycle_task(Arc::new(SampleSource::new()), Trigger::Initial).await;
        assert_eq!(outcome.failure_count(), 0);
        assert_eq!(outcome.alerts.unwrap().len(), sample::alerts().len());
    }

    #[tokio::test]
    async fn test_idle_scheduler_starts_cycle() {
        let mut scheduler = Scheduler::new(
            Arc::new(SampleSource::new()),
            Handle::current(),
            OverlapPolicy::Skip,
        );
        assert_eq!(scheduler.state(), RefreshState::Idle);
        assert!(scheduler.next_outcome().await.is_none());

        assert_eq!(scheduler.trigger(Trigger::Initial), TriggerResult::Started);
        assert_eq!(scheduler.state(), RefreshState::Refreshing);

        let outcome = scheduler.next_outcome().await.unwrap();
        assert_eq!(outcome.trigger, Trigger::Initial);
        assert_eq!(outcome.failure_count(), 0);
        assert_eq!(scheduler.state(), RefreshState::Idle);
        assert_eq!(scheduler.stats().completed, 1);
        assert_eq!(scheduler.source_description(), "sample data");
    }

    #[tokio::test]
    async fn test_overlapping_trigger_is_skipped() {
        let source = Arc::new(GatedSource::new());
        let mut scheduler = Scheduler::new(source.clone(), Handle::current(), OverlapPolicy::Skip);

        assert_eq!(scheduler.trigger(Trigger::Initial), TriggerResult::Started);
        assert_eq!(scheduler.trigger(Trigger::Timer), TriggerResult::Skipped);
        assert_eq!(scheduler.trigger(Trigger::Manual), TriggerResult::Skipped);
        assert!(scheduler.try_complete().is_none());
        assert_eq!(scheduler.state(), RefreshState::Refreshing);

        source.release(1);
        let outcome = scheduler.next_outcome().await.unwrap();
        assert_eq!(outcome.trigger, Trigger::Initial);
        assert_eq!(scheduler.state(), RefreshState::Idle);

        assert_eq!(source.health_calls(), 1);
        let stats = scheduler.stats();
        assert_eq!(stats.started, 1);
        assert_eq!(stats.skipped, 2);
    }

    #[tokio::test]
    async fn test_overlapping_trigger_is_queued_once() {
        let source = Arc::new(GatedSource::new());
        let mut scheduler = Scheduler::new(source.clone(), Handle::current(), OverlapPolicy::Queue);

        assert_eq!(scheduler.trigger(Trigger::Initial), TriggerResult::Started);
        assert_eq!(scheduler.trigger(Trigger::Manual), TriggerResult::Queued);
        assert_eq!(scheduler.trigger(Trigger::Timer), TriggerResult::Queued);

        source.release(2);

        let first = scheduler.next_outcome().await.unwrap();
        assert_eq!(first.trigger, Trigger::Initial);
        // The queued trigger starts as soon as the first cycle settles
        assert_eq!(scheduler.state(), RefreshState::Refreshing);

        let second = scheduler.next_outcome().await.unwrap();
        assert_eq!(second.trigger, Trigger::Manual);
        assert_eq!(scheduler.state(), RefreshState::Idle);

        assert_eq!(source.health_calls(), 2);
        assert_eq!(scheduler.stats().started, 2);
        assert!(scheduler.next_outcome().await.is_none());
    }

    #[tokio::test]
    async fn test_panicking_cycle_still_settles() {
        let mut scheduler = Scheduler::new(
            Arc::new(PanickingSource),
            Handle::current(),
            OverlapPolicy::Skip,
        );

        scheduler.trigger(Trigger::Initial);
        let outcome = scheduler.next_outcome().await.unwrap();

        assert_eq!(outcome.failure_count(), 4);
        assert!(matches!(outcome.health, Err(FetchError::Aborted(_))));
        assert_eq!(scheduler.state(), RefreshState::Idle);

        // The scheduler keeps working after a failed cycle
        assert_eq!(scheduler.trigger(Trigger::Timer), TriggerResult::Started);
    }

    #[test]
    fn test_timer_not_due_before_arming() {
        let mut timer = RefreshTimer::new(Duration::from_secs(30));
        assert!(!timer.is_armed());
        assert!(!timer.poll_due(Instant::now() + Duration::from_secs(100)));
    }

    #[test]
    fn test_timer_fires_once_per_interval() {
        let t0 = Instant::now();
        let mut timer = RefreshTimer::new(Duration::from_secs(30));
        timer.arm(t0);

        assert!(!timer.poll_due(t0));
        assert!(!timer.poll_due(t0 + Duration::from_secs(29)));
        assert!(timer.poll_due(t0 + Duration::from_secs(30)));
        assert!(!timer.poll_due(t0 + Duration::from_secs(31)));
        assert!(timer.poll_due(t0 + Duration::from_secs(60)));
        assert_eq!(
            timer.time_until_due(t0 + Duration::from_secs(70)),
            Some(Duration::from_secs(20))
        );
    }

    #[test]
    fn test_timer_collapses_missed_ticks() {
        let t0 = Instant::now();
        let mut timer = RefreshTimer::new(Duration::from_secs(30));
        timer.arm(t0);

        assert!(timer.poll_due(t0 + Duration::from_secs(200)));
        assert!(!timer.poll_due(t0 + Duration::from_secs(229)));
        assert!(timer.poll_due(t0 + Duration::from_secs(230)));
    }

    #[test]
    fn test_timer_arm_is_idempotent() {
        let t0 = Instant::now();
        let mut timer = RefreshTimer::new(Duration::from_secs(10));
        timer.arm(t0);
        timer.arm(t0 + Duration::from_secs(5));
        assert!(timer.poll_due(t0 + Duration::from_secs(10)));
    }
}
