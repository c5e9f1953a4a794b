//! Periodic tick scheduling.
//!
//! The engine owns at most one schedule at a time. Deliveries identify the
//! schedule that produced them so that a tick queued by a cancelled schedule
//! can be told apart from a live one.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Identifies one periodic schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(u64);

impl ScheduleHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Source of periodic tick deliveries.
pub trait Scheduler {
    /// Starts a schedule firing every `period`, first firing one period from now.
    fn schedule(&mut self, period: Duration) -> ScheduleHandle;

    /// Stops a schedule. Unknown or already cancelled handles are ignored.
    fn cancel(&mut self, handle: ScheduleHandle);
}

// ============================================================================
// TokioScheduler
// ============================================================================

/// Scheduler driving each schedule from a `tokio::time::interval` task.
///
/// Every firing sends the schedule's handle on the channel returned by
/// [`TokioScheduler::new`]; the owner feeds it back to the engine.
#[derive(Debug)]
pub struct TokioScheduler {
    next_id: u64,
    tasks: HashMap<ScheduleHandle, JoinHandle<()>>,
    tick_tx: mpsc::UnboundedSender<ScheduleHandle>,
}

impl TokioScheduler {
    /// Creates a scheduler and the receiver its deliveries arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScheduleHandle>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            tasks: HashMap::new(),
            tick_tx,
        };
        (scheduler, tick_rx)
    }

    /// Number of schedules currently running.
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, period: Duration) -> ScheduleHandle {
        self.next_id += 1;
        let handle = ScheduleHandle(self.next_id);
        let tx = self.tick_tx.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        debug!("Tick schedule {} started ({:?})", handle.0, period);
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            debug!("Tick schedule {} cancelled", handle.0);
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

// ============================================================================
// ManualScheduler
// ============================================================================

/// Virtual clock for tests: records schedules without firing anything.
///
/// Tests drive time by calling `TimerEngine::on_scheduled_tick` with
/// [`ManualScheduler::active_handle`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    active: Vec<(ScheduleHandle, Duration)>,
    schedule_calls: usize,
    cancel_calls: usize,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of schedules currently active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// The most recently started schedule that is still active.
    #[must_use]
    pub fn active_handle(&self) -> Option<ScheduleHandle> {
        self.active.last().map(|(handle, _)| *handle)
    }

    /// Period of the active schedule.
    #[must_use]
    pub fn active_period(&self) -> Option<Duration> {
        self.active.last().map(|(_, period)| *period)
    }

    #[must_use]
    pub fn is_active(&self, handle: ScheduleHandle) -> bool {
        self.active.iter().any(|(h, _)| *h == handle)
    }

    #[must_use]
    pub fn schedule_count(&self) -> usize {
        self.schedule_calls
    }

    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.cancel_calls
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, period: Duration) -> ScheduleHandle {
        self.next_id += 1;
        self.schedule_calls += 1;
        let handle = ScheduleHandle(self.next_id);
        self.active.push((handle, period));
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.cancel_calls += 1;
        self.active.retain(|(h, _)| *h != handle);
    }
}
