//! Errors raised while playing a transition cue.
//!
//! All errors are recoverable: callers fall back to the generated tone or
//! drop the cue entirely when audio is unavailable.

use thiserror::Error;

/// Cue playback failure.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No output device could be opened.
    #[error("audio device is not available: {0}")]
    DeviceNotAvailable(String),

    /// Cue file was not found at the specified path.
    #[error("cue file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the cue file.
    #[error("failed to decode cue file: {0}")]
    DecodeError(String),

    /// Failed to create the audio output sink.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Anything else rodio reports.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// True when the output device itself is the problem.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// True when only the cue file is the problem.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if playback should fall back to the generated tone.
    #[must_use]
    pub fn should_fallback_to_tone(&self) -> bool {
        self.is_file_error()
    }

    /// Hint printed next to the warning.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio output device or pass --no-sound",
            Self::FileNotFound(_) => "check the --cue-file path; the built-in tone is used meanwhile",
            Self::DecodeError(_) => "use a WAV, MP3, FLAC or Vorbis cue file",
            Self::StreamError(_) => "check the system audio settings",
            Self::PlaybackError(_) => "restart the application",
        }
    }
}
