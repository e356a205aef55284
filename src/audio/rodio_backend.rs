// src/audio/rodio_backend.rs  —  rodio clip + sine-tone playback
use anyhow::{Context, Result};
use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use super::AudioOutput;

pub struct RodioAudio {
    // The stream must outlive every sink attached to it
    _stream: OutputStream,
    handle:  OutputStreamHandle,
    sink:    Option<Sink>,
    volume:  f32,
}

impl RodioAudio {
    pub fn new(volume: f32) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .context("No audio output device")?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            volume: volume.clamp(0.0, 1.0),
        })
    }

    /// One sink per clip/tone — a stopped sink is never reused
    fn fresh_sink(&mut self) -> Result<Sink> {
        self.stop();
        let sink = Sink::try_new(&self.handle).context("Creating audio sink")?;
        sink.set_volume(self.volume);
        Ok(sink)
    }
}

impl AudioOutput for RodioAudio {
    fn play_clip(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("Opening audio file {:?}", path))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Decoding audio file {:?}", path))?;
        let sink = self.fresh_sink()?;
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }

    fn play_tone(&mut self, hz: f32, dur: Duration) -> Result<()> {
        let sink = self.fresh_sink()?;
        sink.append(SineWave::new(hz).take_duration(dur));
        self.sink = Some(sink);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().map(|s| !s.empty()).unwrap_or(false)
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }
}
