// src/audio/mod.rs  —  AudioOutput trait + rodio backend
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

/// Platform-agnostic audio output interface.
///
/// Starting a clip or tone is non-blocking; the caller polls `is_busy` so it
/// can observe cancellation between polls.  Implementations are created
/// inside the playback thread and never cross threads, so no Send bound.
pub trait AudioOutput {
    /// Start playing a pre-recorded clip (mp3/wav — decoder sniffs the format)
    fn play_clip(&mut self, path: &Path) -> Result<()>;
    /// Start playing a sine tone of the given pitch and length
    fn play_tone(&mut self, hz: f32, dur: Duration) -> Result<()>;
    /// True while the last clip/tone is still sounding
    fn is_busy(&self) -> bool;
    /// Cut the current clip/tone immediately
    fn stop(&mut self);
    fn set_volume(&mut self, vol: f32);
}

// ── rodio backend ─────────────────────────────────────────────────────────────
#[cfg(feature = "audio-rodio")]
mod rodio_backend;
#[cfg(feature = "audio-rodio")]
pub use rodio_backend::RodioAudio;

/// Null backend (no sound — useful for testing / no-audio builds).
/// Tones stay "busy" for their nominal duration so timing feels real.
#[derive(Default)]
pub struct NullAudio {
    busy_until: Option<Instant>,
}

impl AudioOutput for NullAudio {
    fn play_clip(&mut self, _path: &Path) -> Result<()> {
        // Clip length is unknown without decoding — treat as instantly done
        Ok(())
    }
    fn play_tone(&mut self, _hz: f32, dur: Duration) -> Result<()> {
        self.busy_until = Some(Instant::now() + dur);
        Ok(())
    }
    fn is_busy(&self) -> bool {
        self.busy_until.map_or(false, |t| Instant::now() < t)
    }
    fn stop(&mut self) {
        self.busy_until = None;
    }
    fn set_volume(&mut self, _vol: f32) {}
}

/// Factory: returns the best available backend
pub fn create_audio(volume: f32) -> Box<dyn AudioOutput> {
    #[cfg(feature = "audio-rodio")]
    {
        match RodioAudio::new(volume) {
            Ok(a)  => return Box::new(a),
            Err(e) => log::warn!("rodio init failed: {e}  →  using NullAudio"),
        }
    }
    #[cfg(not(feature = "audio-rodio"))]
    let _ = volume;
    Box::new(NullAudio::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_audio_tone_is_busy_for_its_duration() {
        let mut a = NullAudio::default();
        assert!(!a.is_busy());
        a.play_tone(620.0, Duration::from_millis(40)).unwrap();
        assert!(a.is_busy());
        std::thread::sleep(Duration::from_millis(60));
        assert!(!a.is_busy());
    }

    #[test]
    fn null_audio_stop_clears_busy() {
        let mut a = NullAudio::default();
        a.play_tone(620.0, Duration::from_secs(5)).unwrap();
        assert!(a.is_busy());
        a.stop();
        assert!(!a.is_busy());
    }
}
