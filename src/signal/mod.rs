//! Side-effect signals emitted by the timer engine.
//!
//! The engine only knows the [`SignalSink`] capability. [`PlatformSignals`]
//! adapts it onto the sound player and the desktop notifier.

mod error;

use std::cell::RefCell;

use tracing::debug;

pub use error::SignalError;

use crate::notification::{NotificationPermission, Notifier, APP_NAME};
use crate::sound::{CueSound, SoundPlayer};

/// Capability through which the engine emits cues and notifications.
///
/// Calls are fire-and-forget from the engine's point of view: errors are
/// logged by the caller and never affect timer state.
pub trait SignalSink {
    /// Plays the transition cue from its beginning.
    fn play_cue(&self) -> Result<(), SignalError>;

    /// Stops the cue and rewinds it to position zero.
    fn stop_cue(&self) -> Result<(), SignalError>;

    /// Shows `message` to the user.
    fn notify(&self, message: &str) -> Result<(), SignalError>;
}

// ============================================================================
// PlatformSignals
// ============================================================================

/// Sink backed by an optional sound player and a notifier.
pub struct PlatformSignals<P, N> {
    player: Option<P>,
    cue: CueSound,
    notifier: N,
    permission: NotificationPermission,
}

impl<P: SoundPlayer, N: Notifier> PlatformSignals<P, N> {
    /// Creates the sink and issues the one-time notification permission request.
    pub fn new(player: Option<P>, cue: CueSound, notifier: N) -> Self {
        let permission = notifier.request_permission();
        debug!("Notification permission: {:?}", permission);
        Self {
            player,
            cue,
            notifier,
            permission,
        }
    }

    /// Returns the permission obtained at startup.
    pub fn permission(&self) -> NotificationPermission {
        self.permission
    }

    pub fn player(&self) -> Option<&P> {
        self.player.as_ref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<P: SoundPlayer, N: Notifier> SignalSink for PlatformSignals<P, N> {
    fn play_cue(&self) -> Result<(), SignalError> {
        match &self.player {
            Some(player) => player.play(&self.cue).map_err(SignalError::from),
            None => Ok(()),
        }
    }

    fn stop_cue(&self) -> Result<(), SignalError> {
        if let Some(player) = &self.player {
            player.stop();
        }
        Ok(())
    }

    fn notify(&self, message: &str) -> Result<(), SignalError> {
        if !self.permission.is_granted() {
            debug!("Notification suppressed (permission {:?})", self.permission);
            return Ok(());
        }
        self.notifier
            .notify(APP_NAME, message)
            .map_err(SignalError::from)
    }
}

// ============================================================================
// Test doubles
// ============================================================================

/// A call recorded by [`MockSignalSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalCall {
    PlayCue,
    StopCue,
    Notify(String),
}

/// Sink that records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct MockSignalSink {
    calls: RefCell<Vec<SignalCall>>,
    should_fail: bool,
}

impl MockSignalSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink whose every call records itself and then fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            calls: RefCell::default(),
            should_fail: true,
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<SignalCall> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn cue_count(&self) -> usize {
        self.count(|c| matches!(c, SignalCall::PlayCue))
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.count(|c| matches!(c, SignalCall::StopCue))
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                SignalCall::Notify(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&SignalCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: SignalCall) -> Result<(), SignalError> {
        self.calls.borrow_mut().push(call);
        if self.should_fail {
            return Err(SignalError::Other("Mock failure".to_string()));
        }
        Ok(())
    }
}

impl SignalSink for MockSignalSink {
    fn play_cue(&self) -> Result<(), SignalError> {
        self.record(SignalCall::PlayCue)
    }

    fn stop_cue(&self) -> Result<(), SignalError> {
        self.record(SignalCall::StopCue)
    }

    fn notify(&self, message: &str) -> Result<(), SignalError> {
        self.record(SignalCall::Notify(message.to_string()))
    }
}
