//! Core data types for the Pomodoro clock.
//!
//! This module defines the data structures used for:
//! - Phase identification and display names
//! - Timer configuration with range validation
//! - Countdown state, progress and `MM:SS` formatting
//! - A serializable snapshot consumed by the view

use serde::{Deserialize, Serialize};

/// Lower bound for the adjustable session and break lengths.
pub const MIN_LENGTH_MINUTES: u32 = 1;

/// Upper bound for the adjustable session and break lengths.
pub const MAX_LENGTH_MINUTES: u32 = 60;

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current countdown mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Focus interval
    #[default]
    Session,
    /// Short rest
    Break,
    /// Extended rest after a full cycle of sessions
    LongBreak,
}

impl TimerPhase {
    /// Returns the machine-readable name of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Session => "session",
            TimerPhase::Break => "break",
            TimerPhase::LongBreak => "long_break",
        }
    }

    /// Returns the label shown to the user.
    pub fn display_name(&self) -> &'static str {
        match self {
            TimerPhase::Session => "Session",
            TimerPhase::Break => "Break",
            TimerPhase::LongBreak => "Long Break",
        }
    }
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Configuration for the Pomodoro clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Session duration in minutes (1-60)
    pub session_minutes: u32,
    /// Short break duration in minutes (1-60)
    pub break_minutes: u32,
    /// Long break duration in minutes (1-60), fixed at runtime
    pub long_break_minutes: u32,
    /// Sessions per long break; 0 disables long breaks
    pub sessions_before_long_break: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            session_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
            sessions_before_long_break: 4,
        }
    }
}

impl TimerConfig {
    /// Creates a new configuration with the specified session duration.
    pub fn with_session_minutes(mut self, minutes: u32) -> Self {
        self.session_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified break duration.
    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified cycle length.
    pub fn with_sessions_before_long_break(mut self, sessions: u32) -> Self {
        self.sessions_before_long_break = sessions;
        self
    }

    /// Returns true if long breaks take part in the cycle.
    pub fn long_breaks_enabled(&self) -> bool {
        self.sessions_before_long_break > 0
    }

    /// Returns the full duration of `phase` in seconds.
    pub fn duration_of(&self, phase: TimerPhase) -> u32 {
        let minutes = match phase {
            TimerPhase::Session => self.session_minutes,
            TimerPhase::Break => self.break_minutes,
            TimerPhase::LongBreak => self.long_break_minutes,
        };
        minutes.saturating_mul(60)
    }

    /// Returns a copy with every length forced into 1-60 minutes.
    pub fn clamped(self) -> Self {
        let clamp = |minutes: u32| minutes.clamp(MIN_LENGTH_MINUTES, MAX_LENGTH_MINUTES);
        Self {
            session_minutes: clamp(self.session_minutes),
            break_minutes: clamp(self.break_minutes),
            long_break_minutes: clamp(self.long_break_minutes),
            ..self
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        let range = MIN_LENGTH_MINUTES..=MAX_LENGTH_MINUTES;
        if !range.contains(&self.session_minutes) {
            return Err("session length must be between 1 and 60 minutes".to_string());
        }
        if !range.contains(&self.break_minutes) {
            return Err("break length must be between 1 and 60 minutes".to_string());
        }
        if !range.contains(&self.long_break_minutes) {
            return Err("long break length must be between 1 and 60 minutes".to_string());
        }
        Ok(())
    }
}

/// Applies `delta` to `current`, returning the new length only if it stays in range.
pub fn adjusted_length(current: u32, delta: i32) -> Option<u32> {
    let next = current.checked_add_signed(delta)?;
    (MIN_LENGTH_MINUTES..=MAX_LENGTH_MINUTES)
        .contains(&next)
        .then_some(next)
}

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current phase
    pub phase: TimerPhase,
    /// Remaining seconds in the current phase
    pub remaining_seconds: u32,
    /// Whether the countdown is advancing
    pub is_running: bool,
    /// Number of completed sessions since the last reset
    pub completed_sessions: u32,
    /// Active configuration
    pub config: TimerConfig,
}

impl TimerState {
    /// Creates a stopped state at the start of a session.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            phase: TimerPhase::Session,
            remaining_seconds: config.duration_of(TimerPhase::Session),
            is_running: false,
            completed_sessions: 0,
            config,
        }
    }

    /// Full duration of the current phase in seconds.
    pub fn phase_duration(&self) -> u32 {
        self.config.duration_of(self.phase)
    }

    /// Re-derives the countdown from the configured duration of the current phase.
    pub fn resync_remaining(&mut self) {
        self.remaining_seconds = self.phase_duration();
    }

    /// Returns the phase that follows the current one.
    ///
    /// Leaving a session counts it, so the long break lands after every
    /// `sessions_before_long_break`-th session.
    pub fn next_phase(&self) -> TimerPhase {
        match self.phase {
            TimerPhase::Session => {
                let n = self.config.sessions_before_long_break;
                if n > 0 && (self.completed_sessions + 1) % n == 0 {
                    TimerPhase::LongBreak
                } else {
                    TimerPhase::Break
                }
            }
            TimerPhase::Break | TimerPhase::LongBreak => TimerPhase::Session,
        }
    }

    /// Fraction of the current phase already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.phase_duration();
        if total == 0 {
            return 0.0;
        }
        (1.0 - f64::from(self.remaining_seconds) / f64::from(total)).clamp(0.0, 1.0)
    }

    /// Returns the countdown as `MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        format_time(self.remaining_seconds)
    }
}

/// Formats seconds as `MM:SS` with both fields zero-padded to two digits.
pub fn format_time(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Read model handed to the view after every engine operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub label: String,
    pub remaining_seconds: u32,
    pub time_left: String,
    pub is_running: bool,
    pub completed_sessions: u32,
    pub sessions_before_long_break: u32,
    pub progress: f64,
    pub session_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            phase: state.phase,
            label: state.phase.display_name().to_string(),
            remaining_seconds: state.remaining_seconds,
            time_left: state.formatted_remaining(),
            is_running: state.is_running,
            completed_sessions: state.completed_sessions,
            sessions_before_long_break: state.config.sessions_before_long_break,
            progress: state.progress(),
            session_minutes: state.config.session_minutes,
            break_minutes: state.config.break_minutes,
            long_break_minutes: state.config.long_break_minutes,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
