//! Display utilities for the Pomodoro clock.
//!
//! This module renders the engine snapshot as:
//! - A full frame for interactive terminals
//! - A single status line for pipes and logs
//! - A JSON line for scripting

use crate::theme::Theme;
use crate::types::{TimerPhase, TimerSnapshot};

/// Number of cells in the progress bar.
const PROGRESS_WIDTH: usize = 30;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

// ============================================================================
// Palette
// ============================================================================

/// 24-bit colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: (u8, u8, u8),
    pub track: (u8, u8, u8),
    pub session: (u8, u8, u8),
    pub short_break: (u8, u8, u8),
    pub long_break: (u8, u8, u8),
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        let (text, track) = match theme {
            Theme::Light => ((0x25, 0x26, 0x3a), (0xdd, 0xd8, 0xf7)),
            Theme::Dark => ((0xfb, 0xfa, 0xff), (0x42, 0x3d, 0x5a)),
        };
        Self {
            text,
            track,
            session: (0x67, 0x53, 0xff),
            short_break: (0x2e, 0xb8, 0x72),
            long_break: (0xff, 0x90, 0x00),
        }
    }

    pub fn phase(&self, phase: TimerPhase) -> (u8, u8, u8) {
        match phase {
            TimerPhase::Session => self.session,
            TimerPhase::Break => self.short_break,
            TimerPhase::LongBreak => self.long_break,
        }
    }
}

fn fg((r, g, b): (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders the full interactive frame. `color` enables ANSI styling.
    pub fn render_frame(snapshot: &TimerSnapshot, theme: Theme, color: bool) -> String {
        let palette = Palette::for_theme(theme);
        let paint = |rgb: (u8, u8, u8), text: &str| -> String {
            if color {
                format!("{}{}{}", fg(rgb), text, RESET)
            } else {
                text.to_string()
            }
        };
        let phase_rgb = palette.phase(snapshot.phase);

        let mut lines = Vec::new();
        let label = snapshot.label.to_uppercase();
        lines.push(if color {
            format!("{}{}", BOLD, paint(phase_rgb, &label))
        } else {
            label
        });
        lines.push(paint(palette.text, &format!("  {}", snapshot.time_left)));

        let (done, rest) = Self::progress_cells(snapshot.progress);
        lines.push(format!(
            "  [{}{}] {:>3}%",
            paint(phase_rgb, &"#".repeat(done)),
            paint(palette.track, &"-".repeat(rest)),
            (snapshot.progress * 100.0).round() as u32
        ));

        if let Some(cycle) = Self::cycle_info(snapshot) {
            lines.push(paint(palette.text, &format!("  {}", cycle)));
        }

        let lock = if snapshot.is_running {
            "  (locked while running)"
        } else {
            ""
        };
        lines.push(paint(
            palette.text,
            &format!(
                "  Session {} min   Break {} min{}",
                snapshot.session_minutes, snapshot.break_minutes, lock
            ),
        ));
        lines.push(paint(
            palette.text,
            &format!(
                "  [{}]  [Reset]        theme: {}",
                Self::start_stop_label(snapshot.is_running),
                theme
            ),
        ));

        lines.join("\n")
    }

    /// Renders a one-line status summary.
    pub fn status_line(snapshot: &TimerSnapshot) -> String {
        let state = if snapshot.is_running {
            "running"
        } else {
            "paused"
        };
        match Self::cycle_info(snapshot) {
            Some(_) => format!(
                "{} {} [{}] {}/{}",
                snapshot.label,
                snapshot.time_left,
                state,
                snapshot.completed_sessions,
                snapshot.sessions_before_long_break
            ),
            None => format!("{} {} [{}]", snapshot.label, snapshot.time_left, state),
        }
    }

    /// Renders the snapshot as one JSON line.
    pub fn json_line(snapshot: &TimerSnapshot) -> serde_json::Result<String> {
        serde_json::to_string(snapshot)
    }

    /// "Completed Pomodoros: n / N", or None when long breaks are disabled.
    pub fn cycle_info(snapshot: &TimerSnapshot) -> Option<String> {
        (snapshot.sessions_before_long_break > 0).then(|| {
            format!(
                "Completed Pomodoros: {} / {}",
                snapshot.completed_sessions, snapshot.sessions_before_long_break
            )
        })
    }

    /// Label of the start/stop button.
    pub fn start_stop_label(is_running: bool) -> &'static str {
        if is_running {
            "Pause"
        } else {
            "Start"
        }
    }

    /// Splits the bar into (filled, empty) cells.
    fn progress_cells(progress: f64) -> (usize, usize) {
        let done = ((progress.clamp(0.0, 1.0) * PROGRESS_WIDTH as f64).round() as usize)
            .min(PROGRESS_WIDTH);
        (done, PROGRESS_WIDTH - done)
    }

    /// Prints a frame, clearing the screen first when `color` is set.
    pub fn show_frame(snapshot: &TimerSnapshot, theme: Theme, color: bool) {
        if color {
            print!("{}", CLEAR_SCREEN);
        }
        println!("{}", Self::render_frame(snapshot, theme, color));
    }

    /// Shows the key reference.
    pub fn show_help(help: &str) {
        println!("{}", help);
    }

    /// Shows the stored theme.
    pub fn show_theme(theme: Theme) {
        println!("theme: {}", theme);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
