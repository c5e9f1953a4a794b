//! Interactive clock loop.
//!
//! Wires the timer engine to a tokio tick scheduler, the platform signals,
//! the stored theme and a line-based stdin reader, and redraws the view after
//! every change.

use std::io::{BufRead, IsTerminal};
use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::{Display, RunArgs, ViewCommand, HELP_TEXT};
use crate::engine::{ScheduleHandle, Scheduler, TickOutcome, TimerEngine, TokioScheduler};
use crate::notification::DesktopNotifier;
use crate::signal::{PlatformSignals, SignalSink};
use crate::sound::{try_create_player, CueSound};
use crate::theme::{Theme, ThemeStore};

// ============================================================================
// OutputMode
// ============================================================================

/// How the view is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Full redraw; `color` enables ANSI styling and screen clearing.
    Frame { color: bool },
    /// One status line per change.
    Line,
    /// One JSON object per change.
    Json,
}

impl OutputMode {
    /// Picks the mode from the `--json` flag and whether stdout is a terminal.
    pub fn select(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else if std::io::stdout().is_terminal() {
            OutputMode::Frame { color: true }
        } else {
            OutputMode::Line
        }
    }
}

// ============================================================================
// App
// ============================================================================

/// View state around the engine.
pub struct App<S, K> {
    engine: TimerEngine<S, K>,
    theme: Theme,
    store: Option<ThemeStore>,
    mode: OutputMode,
}

impl<S: Scheduler, K: SignalSink> App<S, K> {
    pub fn new(
        engine: TimerEngine<S, K>,
        theme: Theme,
        store: Option<ThemeStore>,
        mode: OutputMode,
    ) -> Self {
        Self {
            engine,
            theme,
            store,
            mode,
        }
    }

    pub fn engine(&self) -> &TimerEngine<S, K> {
        &self.engine
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Applies one input line. Unknown input is ignored.
    pub fn handle_line(&mut self, line: &str) -> ControlFlow<()> {
        match ViewCommand::parse(line) {
            Some(command) => self.handle_command(command),
            None => {
                debug!("Ignoring input {:?}", line.trim());
                ControlFlow::Continue(())
            }
        }
    }

    /// Applies one view command and redraws.
    pub fn handle_command(&mut self, command: ViewCommand) -> ControlFlow<()> {
        match command {
            ViewCommand::IncrementSession => {
                self.engine.adjust_session_length(1);
            }
            ViewCommand::DecrementSession => {
                self.engine.adjust_session_length(-1);
            }
            ViewCommand::IncrementBreak => {
                self.engine.adjust_break_length(1);
            }
            ViewCommand::DecrementBreak => {
                self.engine.adjust_break_length(-1);
            }
            ViewCommand::ToggleStartStop => self.engine.toggle_start_stop(),
            ViewCommand::Reset => self.engine.reset(),
            ViewCommand::ToggleTheme => self.toggle_theme(),
            ViewCommand::Help => {
                Display::show_help(HELP_TEXT);
                return ControlFlow::Continue(());
            }
            ViewCommand::Quit => return ControlFlow::Break(()),
        }

        self.render();
        ControlFlow::Continue(())
    }

    /// Feeds a scheduler delivery to the engine, redrawing if anything changed.
    pub fn on_tick(&mut self, handle: ScheduleHandle) -> TickOutcome {
        let outcome = self.engine.on_scheduled_tick(handle);
        if outcome != TickOutcome::Idle {
            self.render();
        }
        outcome
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        if let Some(store) = &self.store {
            if let Err(e) = store.save(self.theme) {
                warn!("Failed to save theme: {}", e);
            }
        }
    }

    /// Renders the current view as a string.
    pub fn view(&self) -> String {
        let snapshot = self.engine.snapshot();
        match self.mode {
            OutputMode::Frame { color } => Display::render_frame(&snapshot, self.theme, color),
            OutputMode::Line => Display::status_line(&snapshot),
            OutputMode::Json => Display::json_line(&snapshot).unwrap_or_else(|e| {
                warn!("Failed to serialize snapshot: {}", e);
                String::new()
            }),
        }
    }

    /// Writes the current view to stdout.
    pub fn render(&self) {
        match self.mode {
            OutputMode::Frame { color } => {
                Display::show_frame(&self.engine.snapshot(), self.theme, color)
            }
            _ => println!("{}", self.view()),
        }
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Runs the interactive clock until `q`, end of input, or Ctrl-C.
pub async fn run(args: RunArgs) -> Result<()> {
    let config = args.timer_config();
    config.validate().map_err(anyhow::Error::msg)?;

    let player = if args.no_sound {
        None
    } else {
        try_create_player()
    };
    let cue = args.cue_file.clone().map(CueSound::file).unwrap_or_default();
    let signals = PlatformSignals::new(player, cue, DesktopNotifier::new(!args.no_notify));

    let (scheduler, mut ticks) = TokioScheduler::new();
    let engine = TimerEngine::new(config, scheduler, signals)
        .with_tick_period(Duration::from_millis(args.tick_ms));

    let store = match ThemeStore::default_location() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Theme preference disabled: {}", e);
            None
        }
    };
    let theme = store
        .as_ref()
        .map(ThemeStore::load_or_default)
        .unwrap_or_else(Theme::detect);

    let mut app = App::new(engine, theme, store, OutputMode::select(args.json));
    let mut input = spawn_input_reader().context("Failed to start the input reader")?;

    info!("Clock ready");
    app.render();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = input.recv() => match line {
                Some(line) => {
                    if app.handle_line(&line).is_break() {
                        break;
                    }
                }
                None => {
                    debug!("End of input");
                    break;
                }
            },
            Some(handle) = ticks.recv() => {
                app.on_tick(handle);
            }
            _ = &mut ctrl_c => {
                debug!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}

/// Reads stdin lines on a dedicated thread so a pending read never blocks shutdown.
fn spawn_input_reader() -> std::io::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

// ============================================================================
// Tests
// ============================================================================
