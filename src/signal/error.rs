//! Signal sink error types.

use thiserror::Error;

use crate::notification::NotificationError;
use crate::sound::SoundError;

/// Errors raised by a signal sink. The engine logs and drops them.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The audible cue could not be played.
    #[error(transparent)]
    Sound(#[from] SoundError),

    /// The notification could not be shown.
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// Failure injected by a test double.
    #[error("signal failed: {0}")]
    Other(String),
}
