//! CLI module for the Pomodoro clock.
//!
//! - `commands`: Command definitions using clap derive
//! - `input`: Interactive key commands
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod input;

pub use commands::{Cli, Commands, RunArgs, ThemeArgs};
pub use display::{Display, Palette};
pub use input::{ViewCommand, HELP_TEXT};
