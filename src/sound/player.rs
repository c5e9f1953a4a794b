//! rodio-backed cue player.
//!
//! One sink is retained per player. Playing a cue replaces that sink, so a
//! cue that is still sounding is cut off and the new one starts at zero.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{CueSound, DEFAULT_TONE_DURATION_MS, DEFAULT_TONE_FREQUENCY_HZ};

/// Tone volume relative to full scale.
const TONE_AMPLITUDE: f32 = 0.2;

/// Default output device plus the handle sinks are created from.
///
/// `OutputStream` stops the device when dropped, so it lives as long as the player.
struct CueOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl CueOutput {
    fn open() -> Result<Self, SoundError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    fn sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }
}

/// Plays transition cues on the default audio device.
pub struct RodioSoundPlayer {
    output: CueOutput,
    current: Mutex<Option<Sink>>,
}

impl RodioSoundPlayer {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// `SoundError::DeviceNotAvailable` when the machine has no usable output.
    pub fn new() -> Result<Self, SoundError> {
        let output = CueOutput::open()?;
        debug!("Cue output opened");

        Ok(Self {
            output,
            current: Mutex::new(None),
        })
    }

    /// Plays `cue` from the beginning, cutting off any cue still playing.
    ///
    /// A file cue that cannot be opened or decoded falls back to the default tone.
    ///
    /// # Errors
    ///
    /// Returns an error if the output sink cannot be created.
    pub fn play(&self, cue: &CueSound) -> Result<(), SoundError> {
        self.stop();
        let sink = self.output.sink()?;
        cue_source(cue, &sink)?;
        *self.current() = Some(sink);
        Ok(())
    }

    /// Stops any cue in progress. The next `play` starts from the beginning.
    pub fn stop(&self) {
        if let Some(sink) = self.current().take() {
            sink.stop();
            debug!("Cue cut off");
        }
    }

    /// Returns true while a cue is still audible.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.current().as_ref().is_some_and(|sink| !sink.empty())
    }

    fn current(&self) -> MutexGuard<'_, Option<Sink>> {
        // A poisoned lock only means a previous play panicked; the sink is still usable.
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("playing", &self.is_playing())
            .finish_non_exhaustive()
    }
}

/// Appends the audio for `cue` to `sink`.
fn cue_source(cue: &CueSound, sink: &Sink) -> Result<(), SoundError> {
    match cue {
        CueSound::Tone {
            frequency_hz,
            duration_ms,
        } => {
            debug!("Playing {}", cue.name());
            append_tone(sink, *frequency_hz, *duration_ms);
            Ok(())
        }
        CueSound::File { path } => match open_decoder(path) {
            Ok(decoder) => {
                debug!("Playing {}", path.display());
                sink.append(decoder);
                Ok(())
            }
            Err(e) if e.should_fallback_to_tone() => {
                warn!("{}; using the built-in tone", e);
                append_tone(sink, DEFAULT_TONE_FREQUENCY_HZ, DEFAULT_TONE_DURATION_MS);
                Ok(())
            }
            Err(e) => Err(e),
        },
    }
}

fn append_tone(sink: &Sink, frequency_hz: f32, duration_ms: u64) {
    sink.append(
        SineWave::new(frequency_hz)
            .take_duration(Duration::from_millis(duration_ms))
            .amplify(TONE_AMPLITUDE),
    );
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file =
        File::open(path).map_err(|e| SoundError::FileNotFound(format!("{}: {e}", path.display())))?;
    Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
}

/// Opens the audio device, or returns `None` with a warning when there is none.
#[must_use]
pub fn try_create_player() -> Option<RodioSoundPlayer> {
    RodioSoundPlayer::new()
        .inspect_err(|e| warn!("No audio output, cues are silent: {} ({})", e, e.suggestion()))
        .ok()
}
