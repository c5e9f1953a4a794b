//! Pomodoro Clock - a terminal Pomodoro timer
//!
//! Alternates focused sessions and breaks:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after 4 sessions

use anyhow::Result;
use clap::{CommandFactory, Parser};

use pomodoro_clock::app;
use pomodoro_clock::cli::{Cli, Commands, Display, RunArgs, ThemeArgs};
use pomodoro_clock::format_time;
use pomodoro_clock::theme::{Theme, ThemeStore};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr; stdout belongs to the view.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => app::run(args).await?,
        Some(Commands::Theme(args)) => execute_theme(&args)?,
        Some(Commands::Format { seconds }) => println!("{}", format_time(seconds)),
        Some(Commands::Completions { shell }) => generate_completions(shell),
        None => app::run(RunArgs::default()).await?,
    }

    Ok(())
}

/// Shows or updates the stored theme.
fn execute_theme(args: &ThemeArgs) -> Result<()> {
    let store = ThemeStore::default_location()?;
    let current = store.load_or_default();

    let next = if args.toggle {
        current.toggle()
    } else if args.dark {
        Theme::Dark
    } else if args.light {
        Theme::Light
    } else {
        Display::show_theme(current);
        return Ok(());
    };

    store.save(next)?;
    Display::show_theme(next);
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_command_is_consistent() {
        Cli::command().debug_assert();
    }
}
