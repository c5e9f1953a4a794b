//! Audible cue playback for phase transitions.
//!
//! - Generated tone cue with optional file override
//! - Restart-from-beginning semantics: a new cue cuts off the previous one
//! - Graceful degradation when audio is unavailable
//!
//! # Usage
//!
//! ```rust,no_run
//! use pomodoro_clock::sound::{CueSound, RodioSoundPlayer};
//!
//! let player = RodioSoundPlayer::new().expect("audio init");
//! player.play(&CueSound::default()).expect("playback failed");
//! player.stop();
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{CueSound, DEFAULT_TONE_DURATION_MS, DEFAULT_TONE_FREQUENCY_HZ};

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Plays `cue` from its beginning, stopping any cue in progress.
    ///
    /// This method is non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, cue: &CueSound) -> Result<(), SoundError>;

    /// Stops the cue in progress and rewinds it.
    fn stop(&self);
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, cue: &CueSound) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, cue)
    }

    fn stop(&self) {
        RodioSoundPlayer::stop(self)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<CueSound>>,
    stop_calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<CueSound> {
        self.play_calls.lock().unwrap().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, cue: &CueSound) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(cue.clone());
        Ok(())
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }
}
