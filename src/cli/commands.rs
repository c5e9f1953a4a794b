//! Command definitions for the Pomodoro clock CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::TimerConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Clock - a terminal Pomodoro timer
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-clock",
    version,
    about = "Terminal Pomodoro clock",
    long_about = "A Pomodoro clock for the terminal.\n\
                  Alternates focus sessions and breaks, with a long break after every few sessions,\n\
                  and signals each transition with a sound and a desktop notification.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive clock
    Run(RunArgs),

    /// Show or change the stored light/dark theme
    Theme(ThemeArgs),

    /// Print a number of seconds as MM:SS
    Format {
        /// Seconds to format
        seconds: u32,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Session duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub session: u32,

    /// Short break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub break_length: u32,

    /// Long break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "15",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub long_break: u32,

    /// Sessions before a long break (0 disables long breaks)
    #[arg(
        short = 'n',
        long,
        default_value = "4",
        value_parser = clap::value_parser!(u32).range(0..=12)
    )]
    pub sessions_before_long_break: u32,

    /// Disable the transition sound
    #[arg(long)]
    pub no_sound: bool,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Audio file to play instead of the built-in tone
    #[arg(long, value_name = "PATH")]
    pub cue_file: Option<PathBuf>,

    /// Print the state as JSON lines instead of the text view
    #[arg(long)]
    pub json: bool,

    /// Tick period in milliseconds
    #[arg(
        long,
        hide = true,
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub tick_ms: u64,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            session: 25,
            break_length: 5,
            long_break: 15,
            sessions_before_long_break: 4,
            no_sound: false,
            no_notify: false,
            cue_file: None,
            json: false,
            tick_ms: 1000,
        }
    }
}

impl RunArgs {
    /// Builds the timer configuration from the arguments.
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::default()
            .with_session_minutes(self.session)
            .with_break_minutes(self.break_length)
            .with_long_break_minutes(self.long_break)
            .with_sessions_before_long_break(self.sessions_before_long_break)
    }
}

// ============================================================================
// Theme Command Arguments
// ============================================================================

/// Arguments for the theme command
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct ThemeArgs {
    /// Switch between light and dark
    #[arg(long)]
    pub toggle: bool,

    /// Use the dark theme
    #[arg(long)]
    pub dark: bool,

    /// Use the light theme
    #[arg(long)]
    pub light: bool,
}

// ============================================================================
// Tests
// ============================================================================
