//! Cue sound selection.
//!
//! The cue is either a short generated tone or a user supplied audio file.

use std::path::PathBuf;

/// Default tone pitch in Hz.
pub const DEFAULT_TONE_FREQUENCY_HZ: f32 = 880.0;

/// Default tone length in milliseconds.
pub const DEFAULT_TONE_DURATION_MS: u64 = 400;

/// Represents the sound played on a phase transition.
#[derive(Debug, Clone, PartialEq)]
pub enum CueSound {
    /// A sine tone synthesized at playback time.
    Tone {
        /// Pitch in Hz.
        frequency_hz: f32,
        /// Length of the tone in milliseconds.
        duration_ms: u64,
    },
    /// An audio file on disk.
    File {
        /// Path to the file.
        path: PathBuf,
    },
}

impl Default for CueSound {
    fn default() -> Self {
        Self::tone(DEFAULT_TONE_FREQUENCY_HZ, DEFAULT_TONE_DURATION_MS)
    }
}

impl CueSound {
    /// Creates a tone cue.
    #[must_use]
    pub fn tone(frequency_hz: f32, duration_ms: u64) -> Self {
        Self::Tone {
            frequency_hz,
            duration_ms,
        }
    }

    /// Creates a file cue.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Returns a short description for logs.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Tone { frequency_hz, .. } => format!("tone {frequency_hz}Hz"),
            Self::File { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_short_a5_tone() {
        assert_eq!(
            CueSound::default(),
            CueSound::Tone {
                frequency_hz: 880.0,
                duration_ms: 400,
            }
        );
    }

    #[test]
    fn test_file_cue_name() {
        let cue = CueSound::file("/tmp/sounds/beep.wav");
        assert_eq!(cue, CueSound::File { path: "/tmp/sounds/beep.wav".into() });
        assert_eq!(cue.name(), "beep.wav");
    }

    #[test]
    fn test_tone_name() {
        assert_eq!(CueSound::tone(440.0, 100).name(), "tone 440Hz");
    }
}
