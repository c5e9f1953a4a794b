//! Timer engine module for the Pomodoro clock.
//!
//! - `timer`: countdown state machine and phase transitions
//! - `scheduler`: the periodic tick source injected into the engine

pub mod scheduler;
pub mod timer;

pub use scheduler::{ManualScheduler, ScheduleHandle, Scheduler, TokioScheduler};
pub use timer::{TickOutcome, TimerEngine, TICK_PERIOD};
