//! Timer engine for the Pomodoro clock.
//!
//! This module provides the countdown state machine:
//! - Session → Break / Long Break → Session transitions
//! - One tick schedule at most, owned while running
//! - Cue and notification signals on every transition
//! - Length adjustments gated on the stopped state

use std::time::Duration;

use tracing::{debug, info, warn};

use super::scheduler::{ScheduleHandle, Scheduler};
use crate::signal::SignalSink;
use crate::types::{adjusted_length, TimerConfig, TimerPhase, TimerSnapshot, TimerState};

/// Interval between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

// ============================================================================
// TickOutcome
// ============================================================================

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is stopped; nothing changed.
    Idle,
    /// One second was counted down.
    Counted {
        /// Remaining seconds after the decrement
        remaining_seconds: u32,
    },
    /// The countdown was exhausted and a new phase began.
    Transitioned {
        /// Phase that just ended
        from: TimerPhase,
        /// Phase that just began
        to: TimerPhase,
        /// Completed sessions after the transition
        completed_sessions: u32,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns the countdown state.
///
/// Every operation is infallible: requests that do not apply in the current
/// state are ignored, and signal failures are logged and dropped.
pub struct TimerEngine<S, K> {
    /// Current timer state
    state: TimerState,
    /// Tick source
    scheduler: S,
    /// Cue and notification sink
    signals: K,
    /// Schedule owned while running
    tick_handle: Option<ScheduleHandle>,
    /// Period requested from the scheduler
    tick_period: Duration,
}

impl<S: Scheduler, K: SignalSink> TimerEngine<S, K> {
    /// Creates a stopped engine at the start of a session.
    ///
    /// Lengths outside 1-60 minutes are clamped into range.
    pub fn new(config: TimerConfig, scheduler: S, signals: K) -> Self {
        let clamped = config.clamped();
        if clamped != config {
            warn!("Timer lengths clamped to 1-60 minutes: {:?}", clamped);
        }
        Self {
            state: TimerState::new(clamped),
            scheduler,
            signals,
            tick_handle: None,
            tick_period: TICK_PERIOD,
        }
    }

    /// Overrides the tick period.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Adds `delta` minutes to the session length.
    ///
    /// Returns false, leaving everything untouched, while running or when the
    /// result would leave 1-60.
    pub fn adjust_session_length(&mut self, delta: i32) -> bool {
        self.adjust_length(TimerPhase::Session, delta)
    }

    /// Adds `delta` minutes to the break length. Same rules as the session length.
    pub fn adjust_break_length(&mut self, delta: i32) -> bool {
        self.adjust_length(TimerPhase::Break, delta)
    }

    fn adjust_length(&mut self, phase: TimerPhase, delta: i32) -> bool {
        if self.state.is_running {
            debug!("Ignoring {} length change while running", phase.as_str());
            return false;
        }

        let config = &mut self.state.config;
        let slot = match phase {
            TimerPhase::Session => &mut config.session_minutes,
            TimerPhase::Break => &mut config.break_minutes,
            TimerPhase::LongBreak => return false,
        };

        let Some(next) = adjusted_length(*slot, delta) else {
            debug!("Ignoring {} length {} {:+}", phase.as_str(), slot, delta);
            return false;
        };
        *slot = next;
        debug!("{} length set to {} minutes", phase.display_name(), next);

        if self.state.phase == phase {
            self.state.resync_remaining();
        }
        true
    }

    // ------------------------------------------------------------------------
    // Run control
    // ------------------------------------------------------------------------

    /// Starts the countdown. No-op if already running.
    pub fn start(&mut self) {
        if self.state.is_running {
            debug!("Timer already running");
            return;
        }

        // A stale schedule would double the tick rate.
        self.cancel_schedule();
        self.state.is_running = true;
        self.tick_handle = Some(self.scheduler.schedule(self.tick_period));

        info!(
            "Timer started: {} {}",
            self.state.phase.display_name(),
            self.state.formatted_remaining()
        );
    }

    /// Pauses the countdown, keeping the remaining time. No-op if stopped.
    pub fn stop(&mut self) {
        if !self.state.is_running {
            debug!("Timer already stopped");
            return;
        }

        self.state.is_running = false;
        self.cancel_schedule();

        info!(
            "Timer paused: {} {}",
            self.state.phase.display_name(),
            self.state.formatted_remaining()
        );
    }

    /// Starts when stopped, stops when running.
    pub fn toggle_start_stop(&mut self) {
        if self.state.is_running {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Returns to a fresh 25/5 session whatever the current state.
    ///
    /// The long break settings are kept.
    pub fn reset(&mut self) {
        self.cancel_schedule();

        let defaults = TimerConfig::default();
        self.state.config.session_minutes = defaults.session_minutes;
        self.state.config.break_minutes = defaults.break_minutes;
        self.state.is_running = false;
        self.state.phase = TimerPhase::Session;
        self.state.completed_sessions = 0;
        self.state.resync_remaining();

        if let Err(e) = self.signals.stop_cue() {
            warn!("Failed to stop cue: {}", e);
        }

        info!("Timer reset");
    }

    fn cancel_schedule(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            self.scheduler.cancel(handle);
        }
    }

    // ------------------------------------------------------------------------
    // Countdown
    // ------------------------------------------------------------------------

    /// Handles a delivery from the scheduler.
    ///
    /// Deliveries from any schedule other than the active one are dropped.
    pub fn on_scheduled_tick(&mut self, handle: ScheduleHandle) -> TickOutcome {
        if self.tick_handle != Some(handle) {
            debug!("Dropping tick from inactive schedule {}", handle.id());
            return TickOutcome::Idle;
        }
        self.tick()
    }

    /// Advances the countdown by one second.
    ///
    /// The transition happens on the tick after the counter reached zero, so
    /// `00:00` stays visible for a full tick.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running {
            return TickOutcome::Idle;
        }

        if self.state.remaining_seconds > 0 {
            self.state.remaining_seconds -= 1;
            return TickOutcome::Counted {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        self.advance_phase()
    }

    fn advance_phase(&mut self) -> TickOutcome {
        let from = self.state.phase;
        let to = self.state.next_phase();

        if from == TimerPhase::Session {
            self.state.completed_sessions += 1;
        }
        self.state.phase = to;
        self.state.resync_remaining();

        info!(
            "{} finished, {} started (completed sessions: {})",
            from.display_name(),
            to.display_name(),
            self.state.completed_sessions
        );

        if let Err(e) = self.signals.play_cue() {
            warn!("Failed to play cue: {}", e);
        }
        if let Err(e) = self
            .signals
            .notify(&format!("{} started!", to.display_name()))
        {
            warn!("Failed to send notification: {}", e);
        }

        TickOutcome::Transitioned {
            from,
            to,
            completed_sessions: self.state.completed_sessions,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the view model for the current state.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&self.state)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &TimerConfig {
        &self.state.config
    }

    /// Returns true while the countdown is advancing.
    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn signals(&self) -> &K {
        &self.signals
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scheduler::ManualScheduler;
    use crate::signal::{MockSignalSink, SignalCall};

    type TestEngine = TimerEngine<ManualScheduler, MockSignalSink>;

    fn create_engine() -> TestEngine {
        create_engine_with_config(TimerConfig::default())
    }

    fn create_engine_with_config(config: TimerConfig) -> TestEngine {
        TimerEngine::new(config, ManualScheduler::new(), MockSignalSink::new())
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    mod construction_tests {
        use super::*;

        #[test]
        fn test_new_engine() {
            let engine = create_engine();
            let state = engine.state();

            assert_eq!(state.phase, TimerPhase::Session);
            assert_eq!(state.remaining_seconds, 25 * 60);
            assert!(!state.is_running);
            assert_eq!(state.completed_sessions, 0);
            assert_eq!(engine.scheduler().active_count(), 0);
        }

        #[test]
        fn test_new_engine_with_config() {
            let engine = create_engine_with_config(TimerConfig::default().with_session_minutes(50));
            assert_eq!(engine.state().remaining_seconds, 50 * 60);
            assert_eq!(engine.config().session_minutes, 50);
        }

        #[test]
        fn test_new_engine_clamps_out_of_range_lengths() {
            let engine = create_engine_with_config(
                TimerConfig::default()
                    .with_session_minutes(u32::MAX)
                    .with_break_minutes(0),
            );
            assert_eq!(engine.config().session_minutes, 60);
            assert_eq!(engine.config().break_minutes, 1);
            assert_eq!(engine.state().remaining_seconds, 3600);
        }
    }

    // ------------------------------------------------------------------------
    // Adjustments
    // ------------------------------------------------------------------------

    mod adjust_tests {
        use super::*;

        #[test]
        fn test_adjust_session_updates_remaining() {
            let mut engine = create_engine();

            assert!(engine.adjust_session_length(1));
            assert_eq!(engine.config().session_minutes, 26);
            assert_eq!(engine.state().remaining_seconds, 26 * 60);

            assert!(engine.adjust_session_length(-1));
            assert!(engine.adjust_session_length(-1));
            assert_eq!(engine.state().remaining_seconds, 24 * 60);
        }

        #[test]
        fn test_adjust_break_leaves_session_countdown() {
            let mut engine = create_engine();

            assert!(engine.adjust_break_length(1));
            assert_eq!(engine.config().break_minutes, 6);
            assert_eq!(engine.state().remaining_seconds, 25 * 60);
        }

        #[test]
        fn test_adjust_break_during_break_updates_remaining() {
            let mut engine = create_engine();
            engine.get_state_mut().phase = TimerPhase::Break;
            engine.get_state_mut().resync_remaining();

            assert!(engine.adjust_break_length(-1));
            assert_eq!(engine.state().remaining_seconds, 4 * 60);
        }

        #[test]
        fn test_adjust_rejected_at_bounds() {
            let mut engine = create_engine_with_config(
                TimerConfig::default()
                    .with_session_minutes(60)
                    .with_break_minutes(1),
            );

            assert!(!engine.adjust_session_length(1));
            assert!(!engine.adjust_break_length(-1));
            assert_eq!(engine.config().session_minutes, 60);
            assert_eq!(engine.config().break_minutes, 1);
        }

        #[test]
        fn test_adjust_never_leaves_range() {
            let mut engine = create_engine();
            for _ in 0..100 {
                engine.adjust_session_length(1);
                engine.adjust_break_length(-1);
            }
            assert_eq!(engine.config().session_minutes, 60);
            assert_eq!(engine.config().break_minutes, 1);
            assert_eq!(engine.state().remaining_seconds, 3600);
        }

        #[test]
        fn test_adjust_rejected_while_running() {
            let mut engine = create_engine();
            engine.start();
            engine.tick();
            let before = engine.state().clone();

            assert!(!engine.adjust_session_length(1));
            assert!(!engine.adjust_break_length(-1));
            assert_eq!(engine.state(), &before);
        }

        #[test]
        fn test_adjust_after_pause_recomputes_current_phase() {
            let mut engine = create_engine();
            engine.start();
            engine.tick();
            engine.tick();
            engine.stop();
            assert_eq!(engine.state().remaining_seconds, 1498);

            assert!(engine.adjust_session_length(1));
            assert_eq!(engine.state().remaining_seconds, 26 * 60);
        }
    }

    // ------------------------------------------------------------------------
    // Run control
    // ------------------------------------------------------------------------

    mod run_control_tests {
        use super::*;

        #[test]
        fn test_start_schedules_one_tick() {
            let mut engine = create_engine();
            engine.start();

            assert!(engine.is_running());
            assert_eq!(engine.scheduler().active_count(), 1);
            assert_eq!(engine.scheduler().active_period(), Some(TICK_PERIOD));
        }

        #[test]
        fn test_start_twice_does_not_double_schedule() {
            let mut engine = create_engine();
            engine.start();
            engine.start();

            assert_eq!(engine.scheduler().active_count(), 1);
            assert_eq!(engine.scheduler().schedule_count(), 1);
        }

        #[test]
        fn test_stop_preserves_remaining() {
            let mut engine = create_engine();
            engine.start();
            for _ in 0..10 {
                engine.tick();
            }
            engine.stop();

            assert!(!engine.is_running());
            assert_eq!(engine.state().remaining_seconds, 1490);
            assert_eq!(engine.scheduler().active_count(), 0);

            engine.start();
            engine.tick();
            assert_eq!(engine.state().remaining_seconds, 1489);
        }

        #[test]
        fn test_stop_when_stopped_is_noop() {
            let mut engine = create_engine();
            let before = engine.state().clone();

            engine.stop();
            engine.stop();

            assert_eq!(engine.state(), &before);
            assert_eq!(engine.scheduler().cancel_count(), 0);
        }

        #[test]
        fn test_toggle_twice_restores_running_flag() {
            let mut engine = create_engine();
            engine.toggle_start_stop();
            assert!(engine.is_running());
            engine.tick();
            engine.toggle_start_stop();

            assert!(!engine.is_running());
            assert_eq!(engine.state().remaining_seconds, 1499);
            assert_eq!(engine.scheduler().active_count(), 0);
        }

        #[test]
        fn test_custom_tick_period() {
            let mut engine = create_engine().with_tick_period(Duration::from_millis(10));
            engine.start();
            assert_eq!(
                engine.scheduler().active_period(),
                Some(Duration::from_millis(10))
            );
        }

        #[test]
        fn test_reset_restores_defaults() {
            let mut engine = create_engine();
            engine.adjust_session_length(5);
            engine.adjust_break_length(5);
            engine.start();
            engine.get_state_mut().phase = TimerPhase::LongBreak;
            engine.get_state_mut().completed_sessions = 7;
            engine.get_state_mut().remaining_seconds = 42;

            engine.reset();

            let state = engine.state();
            assert_eq!(state.phase, TimerPhase::Session);
            assert_eq!(state.config.session_minutes, 25);
            assert_eq!(state.config.break_minutes, 5);
            assert_eq!(state.remaining_seconds, 1500);
            assert_eq!(state.completed_sessions, 0);
            assert!(!state.is_running);
            assert_eq!(engine.scheduler().active_count(), 0);
            assert_eq!(engine.signals().stop_count(), 1);
        }

        #[test]
        fn test_reset_ignores_configured_lengths() {
            let mut engine = create_engine_with_config(
                TimerConfig::default()
                    .with_session_minutes(50)
                    .with_break_minutes(10)
                    .with_long_break_minutes(30),
            );
            assert_eq!(engine.state().remaining_seconds, 3000);

            engine.reset();

            let state = engine.state();
            assert_eq!(state.config.session_minutes, 25);
            assert_eq!(state.config.break_minutes, 5);
            assert_eq!(state.config.long_break_minutes, 30);
            assert_eq!(state.remaining_seconds, 1500);
        }

        #[test]
        fn test_reset_when_stopped_still_rewinds_cue() {
            let mut engine = create_engine();
            engine.reset();
            engine.reset();
            assert_eq!(engine.signals().stop_count(), 2);
            assert_eq!(engine.state().remaining_seconds, 1500);
        }
    }

    // ------------------------------------------------------------------------
    // Ticks and transitions
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_when_stopped_is_idle() {
            let mut engine = create_engine();
            assert_eq!(engine.tick(), TickOutcome::Idle);
            assert_eq!(engine.state().remaining_seconds, 1500);
        }

        #[test]
        fn test_tick_counts_down() {
            let mut engine = create_engine();
            engine.start();
            assert_eq!(
                engine.tick(),
                TickOutcome::Counted {
                    remaining_seconds: 1499
                }
            );
        }

        #[test]
        fn test_zero_is_shown_for_a_full_tick() {
            let mut engine = create_engine();
            engine.start();
            engine.get_state_mut().remaining_seconds = 1;

            assert_eq!(
                engine.tick(),
                TickOutcome::Counted {
                    remaining_seconds: 0
                }
            );
            assert_eq!(engine.state().phase, TimerPhase::Session);
            assert_eq!(engine.state().formatted_remaining(), "00:00");
            assert_eq!(engine.signals().cue_count(), 0);

            let outcome = engine.tick();
            assert_eq!(
                outcome,
                TickOutcome::Transitioned {
                    from: TimerPhase::Session,
                    to: TimerPhase::Break,
                    completed_sessions: 1,
                }
            );
            assert_eq!(engine.state().remaining_seconds, 5 * 60);
        }

        #[test]
        fn test_transition_from_zero_resets_to_full_duration() {
            let mut engine = create_engine();
            engine.start();
            engine.get_state_mut().remaining_seconds = 0;

            engine.tick();

            let state = engine.state();
            assert_eq!(state.phase, TimerPhase::Break);
            assert_eq!(state.remaining_seconds, 300);
            assert!(state.is_running);
        }

        #[test]
        fn test_transition_emits_cue_then_notification() {
            let mut engine = create_engine();
            engine.start();
            engine.get_state_mut().remaining_seconds = 0;
            engine.tick();

            assert_eq!(
                engine.signals().calls(),
                vec![
                    SignalCall::PlayCue,
                    SignalCall::Notify("Break started!".to_string())
                ]
            );
        }

        #[test]
        fn test_break_returns_to_session() {
            let mut engine = create_engine();
            engine.start();
            engine.get_state_mut().phase = TimerPhase::Break;
            engine.get_state_mut().remaining_seconds = 0;

            engine.tick();

            assert_eq!(engine.state().phase, TimerPhase::Session);
            assert_eq!(engine.state().remaining_seconds, 1500);
            assert_eq!(engine.state().completed_sessions, 0);
            assert_eq!(engine.signals().notifications(), vec!["Session started!"]);
        }

        #[test]
        fn test_long_break_after_fourth_session() {
            let mut engine = create_engine();
            engine.start();
            engine.get_state_mut().completed_sessions = 3;
            engine.get_state_mut().remaining_seconds = 0;

            engine.tick();

            let state = engine.state();
            assert_eq!(state.phase, TimerPhase::LongBreak);
            assert_eq!(state.completed_sessions, 4);
            assert_eq!(state.remaining_seconds, 15 * 60);
            assert_eq!(
                engine.signals().notifications(),
                vec!["Long Break started!"]
            );
        }

        #[test]
        fn test_long_break_at_multiples_of_cycle() {
            let mut engine = create_engine();
            engine.start();

            for count in [4, 8, 12] {
                engine.get_state_mut().completed_sessions = count - 1;
                engine.get_state_mut().phase = TimerPhase::Session;
                engine.get_state_mut().remaining_seconds = 0;

                engine.tick();

                assert_eq!(
                    engine.state().phase,
                    TimerPhase::LongBreak,
                    "Expected LongBreak after session {}",
                    count
                );
            }
        }

        #[test]
        fn test_short_break_at_non_multiples_of_cycle() {
            let mut engine = create_engine();
            engine.start();

            for count in [1, 2, 3, 5, 6, 7] {
                engine.get_state_mut().completed_sessions = count - 1;
                engine.get_state_mut().phase = TimerPhase::Session;
                engine.get_state_mut().remaining_seconds = 0;

                engine.tick();

                assert_eq!(
                    engine.state().phase,
                    TimerPhase::Break,
                    "Expected Break after session {}",
                    count
                );
            }
        }

        #[test]
        fn test_disabled_long_breaks_alternate_two_phases() {
            let mut engine =
                create_engine_with_config(TimerConfig::default().with_sessions_before_long_break(0));
            engine.start();

            for _ in 0..10 {
                engine.get_state_mut().remaining_seconds = 0;
                engine.tick();
                assert_ne!(engine.state().phase, TimerPhase::LongBreak);
            }
            assert_eq!(engine.state().completed_sessions, 5);
        }

        #[test]
        fn test_long_break_returns_to_session() {
            let mut engine = create_engine();
            engine.start();
            engine.get_state_mut().phase = TimerPhase::LongBreak;
            engine.get_state_mut().remaining_seconds = 0;

            engine.tick();
            assert_eq!(engine.state().phase, TimerPhase::Session);
        }

        #[test]
        fn test_signal_failures_do_not_affect_state() {
            let mut engine = TimerEngine::new(
                TimerConfig::default(),
                ManualScheduler::new(),
                MockSignalSink::failing(),
            );
            engine.start();
            engine.get_state_mut().remaining_seconds = 0;

            let outcome = engine.tick();

            assert!(matches!(outcome, TickOutcome::Transitioned { .. }));
            assert_eq!(engine.state().phase, TimerPhase::Break);
            assert!(engine.is_running());

            engine.reset();
            assert_eq!(engine.state().remaining_seconds, 1500);
        }

        #[test]
        fn test_progress_follows_ticks() {
            let mut engine = create_engine_with_config(TimerConfig::default().with_session_minutes(1));
            engine.start();
            for _ in 0..30 {
                engine.tick();
            }
            assert!((engine.snapshot().progress - 0.5).abs() < 1e-9);
        }
    }

    // ------------------------------------------------------------------------
    // Scheduler deliveries
    // ------------------------------------------------------------------------

    mod delivery_tests {
        use super::*;

        #[test]
        fn test_active_schedule_ticks() {
            let mut engine = create_engine();
            engine.start();
            let handle = engine.scheduler().active_handle().unwrap();

            let outcome = engine.on_scheduled_tick(handle);
            assert_eq!(
                outcome,
                TickOutcome::Counted {
                    remaining_seconds: 1499
                }
            );
        }

        #[test]
        fn test_stale_schedule_is_dropped() {
            let mut engine = create_engine();
            engine.start();
            let stale = engine.scheduler().active_handle().unwrap();
            engine.stop();
            engine.start();

            assert_eq!(engine.on_scheduled_tick(stale), TickOutcome::Idle);
            assert_eq!(engine.state().remaining_seconds, 1500);

            let live = engine.scheduler().active_handle().unwrap();
            assert_ne!(live, stale);
            engine.on_scheduled_tick(live);
            assert_eq!(engine.state().remaining_seconds, 1499);
        }

        #[test]
        fn test_delivery_after_reset_is_dropped() {
            let mut engine = create_engine();
            engine.start();
            let handle = engine.scheduler().active_handle().unwrap();
            engine.reset();

            assert_eq!(engine.on_scheduled_tick(handle), TickOutcome::Idle);
        }
    }
}
