//! Theme preference error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving the theme preference.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// No configuration directory could be determined.
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    /// Reading or writing the preference file failed.
    #[error("theme preference I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preference file is not valid JSON.
    #[error("theme preference file {path} is corrupt: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ThemeError {
    /// Returns true if the stored file exists but could not be understood.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
