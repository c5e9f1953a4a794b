//! Pomodoro Clock Library
//!
//! This library provides the core functionality for the Pomodoro clock.
//! It includes:
//! - Timer engine with an injected tick scheduler
//! - Signal sink for transition cues and notifications
//! - Sound playback for the transition cue
//! - Desktop notifications
//! - Persisted light/dark theme preference
//! - CLI command parsing and display utilities
//! - Type definitions for configuration and state

pub mod app;
pub mod cli;
pub mod engine;
pub mod notification;
pub mod signal;
pub mod sound;
pub mod theme;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{format_time, TimerConfig, TimerPhase, TimerSnapshot, TimerState};

pub use engine::{
    ManualScheduler, ScheduleHandle, Scheduler, TickOutcome, TimerEngine, TokioScheduler,
    TICK_PERIOD,
};

pub use signal::{MockSignalSink, PlatformSignals, SignalError, SignalSink};

pub use sound::{
    try_create_player, CueSound, MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer,
};

pub use notification::{
    DesktopNotifier, MockNotifier, NotificationError, NotificationPermission, Notifier,
};

pub use theme::{Theme, ThemeError, ThemeStore};
