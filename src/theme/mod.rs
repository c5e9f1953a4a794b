//! Light/dark theme preference.
//!
//! The preference is the only state that survives a restart. It is stored as
//! a single boolean under [`THEME_KEY`] in `theme.json` inside the
//! configuration directory.

mod error;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use error::ThemeError;

/// Key under which the dark flag is stored.
pub const THEME_KEY: &str = "pomodoro-theme-dark";

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "POMODORO_CLOCK_CONFIG_DIR";

const APP_DIR_NAME: &str = "pomodoro-clock";
const THEME_FILE_NAME: &str = "theme.json";

// ============================================================================
// Theme
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    #[must_use]
    pub fn toggle(self) -> Self {
        Self::from_dark(!self.is_dark())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Guesses the terminal theme from `COLORFGBG`, falling back to light.
    pub fn detect() -> Self {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|value| Self::from_colorfgbg(&value))
            .unwrap_or_default()
    }

    /// Parses a `COLORFGBG` value such as `"15;0"` (foreground;background).
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        // ANSI 0-6 and 8 are the dark backgrounds.
        Some(Self::from_dark(matches!(background, 0..=6 | 8)))
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    #[serde(rename = "pomodoro-theme-dark")]
    dark: bool,
}

// ============================================================================
// ThemeStore
// ============================================================================

/// Reads and writes the persisted theme preference.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store in the user's configuration directory.
    ///
    /// # Errors
    ///
    /// Returns `ThemeError::NoConfigDir` if no directory can be determined.
    pub fn default_location() -> Result<Self, ThemeError> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or(ThemeError::NoConfigDir)?
                .join(APP_DIR_NAME),
        };
        Ok(Self::new(dir.join(THEME_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored theme, or detects one if nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Theme, ThemeError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored theme at {}", self.path.display());
                return Ok(Theme::detect());
            }
            Err(source) => {
                return Err(ThemeError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let file: ThemeFile =
            serde_json::from_str(&contents).map_err(|source| ThemeError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Theme::from_dark(file.dark))
    }

    /// Loads the stored theme, logging and ignoring any failure.
    pub fn load_or_default(&self) -> Theme {
        self.load().unwrap_or_else(|e| {
            warn!("{}; using the detected theme", e);
            Theme::detect()
        })
    }

    /// Persists `theme`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, theme: Theme) -> Result<(), ThemeError> {
        let io_err = |source| ThemeError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = ThemeFile {
            dark: theme.is_dark(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| ThemeError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)?;

        debug!("Theme saved: {}", theme);
        Ok(())
    }
}
