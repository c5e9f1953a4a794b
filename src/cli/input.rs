//! Keyboard commands for the interactive view.
//!
//! Each line read from stdin maps to at most one command.

/// A user request issued from the interactive view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    IncrementSession,
    DecrementSession,
    IncrementBreak,
    DecrementBreak,
    ToggleStartStop,
    Reset,
    ToggleTheme,
    Help,
    Quit,
}

impl ViewCommand {
    /// Parses one input line. Unknown input yields `None` and is ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let command = match line.trim().to_ascii_lowercase().as_str() {
            "" | "p" | "space" | "start" | "stop" | "pause" => Self::ToggleStartStop,
            "s+" | "+s" => Self::IncrementSession,
            "s-" | "-s" => Self::DecrementSession,
            "b+" | "+b" => Self::IncrementBreak,
            "b-" | "-b" => Self::DecrementBreak,
            "r" | "reset" => Self::Reset,
            "t" | "theme" => Self::ToggleTheme,
            "h" | "?" | "help" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Key reference printed by the help command.
pub const HELP_TEXT: &str = "\
  <enter> / p   start or pause
  s+ / s-       session length +1 / -1 minute
  b+ / b-       break length +1 / -1 minute
  r             reset
  t             toggle light/dark theme
  h             this help
  q             quit";
