// src/player/mod.rs  —  Playback worker: mode loops, status channel, cancellation
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::audio::{create_audio, AudioOutput};
use crate::code::{morse_units, phonetic_units, ElementTiming, MorseUnit, PhoneticUnit};
use crate::config::{AppConfig, Mode, Spacing, ToneSource};
use crate::speech::create_speech;

/// Cancellation poll granularity — audio stops within one interval of stop()
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Worker lifecycle, observable by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState { Idle, Running, Cancelling, Done }

/// Messages crossing from the worker to the UI loop
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Status(String),
    Done,
}

/// Cooperative cancellation token, checked at unit boundaries and inside
/// every audio/speech wait loop.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleep `dur` in poll-sized chunks.  Returns false if cancelled first.
    pub fn sleep(&self, dur: Duration) -> bool {
        let mut left = dur;
        while left > Duration::ZERO {
            if self.is_cancelled() {
                return false;
            }
            let step = left.min(POLL_INTERVAL);
            thread::sleep(step);
            left -= step;
        }
        !self.is_cancelled()
    }
}

/// Everything one playback needs, snapshotted at play time.
/// Immutable once the session starts.
#[derive(Debug, Clone)]
pub struct PlaybackRequest {
    pub text:        String,
    pub mode:        Mode,
    pub spacing:     Spacing,
    pub audio_dir:   PathBuf,
    pub volume:      f32,
    pub tone_source: ToneSource,
    pub wpm:         u8,
    pub tone_hz:     u32,
    pub voice:       Option<String>,
    pub rate:        u16,
}

impl PlaybackRequest {
    pub fn from_config(cfg: &AppConfig, text: String) -> Self {
        Self {
            text,
            mode:        cfg.mode,
            spacing:     cfg.spacing,
            audio_dir:   cfg.audio_dir.clone(),
            volume:      cfg.volume,
            tone_source: cfg.tone_source,
            wpm:         cfg.wpm,
            tone_hz:     cfg.tone_hz,
            voice:       cfg.voice.clone(),
            rate:        cfg.rate,
        }
    }
}

// ── Player front-end ─────────────────────────────────────────────────────────
/// Owns at most one playback session.  The audio/speech resources are
/// created inside the worker thread and owned exclusively by it.
pub struct Player {
    handle: Option<JoinHandle<()>>,
    cancel: CancelToken,
    state:  Arc<Mutex<SessionState>>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            handle: None,
            cancel: CancelToken::default(),
            state:  Arc::new(Mutex::new(SessionState::Idle)),
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// Start a playback session.  Rejects while one is active (the active
    /// session is left untouched) and rejects blank input before spawning.
    pub fn start(&mut self, req: PlaybackRequest, tx: Sender<PlayerEvent>) -> Result<()> {
        if let Some(h) = self.handle.take() {
            if !h.is_finished() {
                self.handle = Some(h);
                bail!("Already playing");
            }
            let _ = h.join(); // reap the finished session
        }
        if req.text.trim().is_empty() {
            bail!("No text to play");
        }

        self.cancel = CancelToken::default();
        *self.state.lock().unwrap() = SessionState::Running;

        let cancel = self.cancel.clone();
        let state  = Arc::clone(&self.state);
        self.handle = Some(thread::spawn(move || {
            run_session(req, tx, cancel, state);
        }));
        Ok(())
    }

    /// Request cancellation.  The worker observes the token within one
    /// polling interval and stops the audio itself.
    pub fn stop(&mut self) {
        if self.is_active() {
            let mut st = self.state.lock().unwrap();
            if *st == SessionState::Running {
                *st = SessionState::Cancelling;
            }
            drop(st);
            self.cancel.cancel();
        }
    }

    /// Block until the current session ends (headless one-shot mode).
    pub fn join(&mut self) {
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

// ── Worker body ──────────────────────────────────────────────────────────────
fn run_session(
    req: PlaybackRequest,
    tx: Sender<PlayerEvent>,
    cancel: CancelToken,
    state: Arc<Mutex<SessionState>>,
) {
    // The audio handle lives inside this thread only; dropping it at the end
    // of the branch releases the device.
    let result = match req.mode {
        Mode::Phonetic => {
            let mut audio = create_audio(req.volume);
            play_phonetic(&req, audio.as_mut(), &tx, &cancel)
        }
        Mode::Morse => {
            let mut audio = create_audio(req.volume);
            play_morse(&req, audio.as_mut(), &tx, &cancel)
        }
        Mode::Normal => play_normal(&req, &tx, &cancel),
    };
    match result {
        Ok(true)  => status(&tx, "Done."),
        Ok(false) => status(&tx, "Stopped."),
        // All playback errors end here as a status line — never fatal
        Err(e) => status(&tx, format!("Error: {e:#}")),
    }
    *state.lock().unwrap() = SessionState::Done;
    let _ = tx.send(PlayerEvent::Done);
}

/// Returns Ok(true) on completion, Ok(false) when cancelled.
fn play_phonetic(
    req: &PlaybackRequest,
    audio: &mut dyn AudioOutput,
    tx: &Sender<PlayerEvent>,
    cancel: &CancelToken,
) -> Result<bool> {
    status(tx, "Phonetic mode");
    let clip_dir = req.audio_dir.join("phonetic");
    for unit in phonetic_units(&req.text) {
        if cancel.is_cancelled() {
            return Ok(false);
        }
        match unit {
            PhoneticUnit::Say { ch, word } => {
                status(tx, format!("{ch} → {word}"));
                let clip = clip_dir.join(format!("{}.mp3", ch.to_ascii_lowercase()));
                play_clip(audio, &clip, tx, cancel)?;
                if !cancel.sleep(req.spacing.phonetic_char_gap()) {
                    return Ok(false);
                }
            }
            PhoneticUnit::Gap => {
                status(tx, "Space");
                if !cancel.sleep(req.spacing.phonetic_word_gap()) {
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}

fn play_morse(
    req: &PlaybackRequest,
    audio: &mut dyn AudioOutput,
    tx: &Sender<PlayerEvent>,
    cancel: &CancelToken,
) -> Result<bool> {
    status(tx, "Morse mode");
    let timing    = ElementTiming::from_wpm(req.wpm);
    let dot_clip  = req.audio_dir.join("morse").join("dot.wav");
    let dash_clip = req.audio_dir.join("morse").join("dash.wav");

    for unit in morse_units(&req.text) {
        if cancel.is_cancelled() {
            return Ok(false);
        }
        match unit {
            MorseUnit::Gap => {
                status(tx, "Space");
                if !cancel.sleep(req.spacing.morse_word_gap()) {
                    return Ok(false);
                }
            }
            MorseUnit::Letter { ch, pattern } => {
                status(tx, format!("{ch} → {pattern}"));
                for sym in pattern.chars() {
                    if cancel.is_cancelled() {
                        return Ok(false);
                    }
                    status(tx, format!("{ch} → {sym}"));
                    match req.tone_source {
                        ToneSource::Files => {
                            let clip = if sym == '.' { &dot_clip } else { &dash_clip };
                            play_clip(audio, clip, tx, cancel)?;
                        }
                        ToneSource::Synth => {
                            let len = if sym == '.' { timing.dot } else { timing.dash };
                            audio.play_tone(req.tone_hz as f32, len)?;
                            wait_audio(audio, cancel);
                        }
                    }
                    if !cancel.sleep(req.spacing.morse_symbol_gap()) {
                        return Ok(false);
                    }
                }
                if !cancel.sleep(req.spacing.morse_letter_gap()) {
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}

fn play_normal(
    req: &PlaybackRequest,
    tx: &Sender<PlayerEvent>,
    cancel: &CancelToken,
) -> Result<bool> {
    status(tx, "Normal speech mode");
    let mut speech = create_speech(req.voice.as_deref(), req.rate);
    log::debug!("speech engine: {}", speech.name());
    status(tx, "Speaking full text");
    speech.speak(&req.text, cancel)?;
    if cancel.is_cancelled() {
        return Ok(false);
    }
    if !cancel.sleep(req.spacing.tts_pause_gap()) {
        return Ok(false);
    }
    Ok(true)
}

/// Start one clip and busy-wait until it finishes or the token cancels it.
/// A missing file is reported and skipped; playback continues.
fn play_clip(
    audio: &mut dyn AudioOutput,
    path: &Path,
    tx: &Sender<PlayerEvent>,
    cancel: &CancelToken,
) -> Result<()> {
    if !path.exists() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        status(tx, format!("Missing audio file: {name}"));
        return Ok(());
    }
    audio.play_clip(path)?;
    wait_audio(audio, cancel);
    Ok(())
}

fn wait_audio(audio: &mut dyn AudioOutput, cancel: &CancelToken) {
    while audio.is_busy() {
        if cancel.is_cancelled() {
            audio.stop();
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn status(tx: &Sender<PlayerEvent>, msg: impl Into<String>) {
    let _ = tx.send(PlayerEvent::Status(msg.into()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Instant;

    fn request(text: &str, mode: Mode) -> PlaybackRequest {
        let mut spacing = Spacing::default();
        for i in 0..6 {
            spacing.set(i, 0.0);
        }
        PlaybackRequest {
            text:        text.into(),
            mode,
            spacing,
            // nonexistent on purpose — clips resolve to "missing" statuses
            audio_dir:   PathBuf::from("target/test-audio-none"),
            volume:      0.0,
            tone_source: ToneSource::Synth,
            wpm:         60,
            tone_hz:     620,
            voice:       None,
            rate:        175,
        }
    }

    fn drain_until_done(rx: &mpsc::Receiver<PlayerEvent>, timeout: Duration) -> Vec<String> {
        let deadline = Instant::now() + timeout;
        let mut statuses = Vec::new();
        while Instant::now() < deadline {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(PlayerEvent::Status(s)) => statuses.push(s),
                Ok(PlayerEvent::Done) => return statuses,
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
        panic!("worker never sent Done; statuses so far: {statuses:?}");
    }

    #[test]
    fn empty_input_never_starts_a_session() {
        let (tx, _rx) = mpsc::channel();
        let mut player = Player::new();
        assert!(player.start(request("   ", Mode::Phonetic), tx).is_err());
        assert!(!player.is_active());
        assert_eq!(player.state(), SessionState::Idle);
    }

    #[test]
    fn second_start_is_rejected_while_active() {
        let (tx, rx) = mpsc::channel();
        let mut player = Player::new();
        // Long enough to still be running when the second start arrives
        player
            .start(request("PARIS PARIS PARIS", Mode::Morse), tx.clone())
            .unwrap();
        let err = player.start(request("X", Mode::Morse), tx).unwrap_err();
        assert!(err.to_string().contains("Already playing"));
        assert!(player.is_active());
        player.stop();
        drain_until_done(&rx, Duration::from_secs(5));
        player.join();
    }

    #[test]
    fn sos_plays_letters_in_order_without_word_gap() {
        let (tx, rx) = mpsc::channel();
        let mut player = Player::new();
        player.start(request("SOS", Mode::Morse), tx).unwrap();
        let statuses = drain_until_done(&rx, Duration::from_secs(10));
        player.join();

        // letter announcements carry the full pattern; per-symbol lines only one element
        let letters: Vec<&String> = statuses
            .iter()
            .filter(|s| {
                s.split(" → ")
                    .nth(1)
                    .map_or(false, |p| p.len() > 1 && p.chars().all(|c| c == '.' || c == '-'))
            })
            .collect();
        assert_eq!(letters, ["S → ...", "O → ---", "S → ..."]);
        assert!(!statuses.iter().any(|s| s == "Space"));
        assert_eq!(statuses.last().map(String::as_str), Some("Done."));
    }

    #[test]
    fn phonetic_ab_emits_alpha_then_bravo() {
        let (tx, rx) = mpsc::channel();
        let mut player = Player::new();
        player.start(request("AB", Mode::Phonetic), tx).unwrap();
        let statuses = drain_until_done(&rx, Duration::from_secs(10));
        player.join();

        let calls: Vec<&String> = statuses.iter().filter(|s| s.contains(" → ")).collect();
        assert_eq!(calls, ["A → ALPHA", "B → BRAVO"]);
        // clips do not exist in the test tree — each unit is skipped, not fatal
        assert!(statuses.iter().any(|s| s.starts_with("Missing audio file")));
        assert_eq!(statuses.last().map(String::as_str), Some("Done."));
    }

    #[test]
    fn space_sleeps_word_gap_in_phonetic_mode() {
        let (tx, rx) = mpsc::channel();
        let mut player = Player::new();
        player.start(request("A B", Mode::Phonetic), tx).unwrap();
        let statuses = drain_until_done(&rx, Duration::from_secs(10));
        player.join();
        assert!(statuses.iter().any(|s| s == "Space"));
    }

    #[test]
    fn stop_cancels_within_polling_granularity() {
        let (tx, rx) = mpsc::channel();
        let mut player = Player::new();
        // 5 wpm → 240ms dots; plenty of units left when stop() lands
        let mut req = request("SOS SOS SOS SOS SOS", Mode::Morse);
        req.wpm = 5;
        player.start(req, tx).unwrap();
        thread::sleep(Duration::from_millis(150));

        player.stop();
        // Done is legal here too — the worker may observe the token first
        assert!(matches!(
            player.state(),
            SessionState::Cancelling | SessionState::Done
        ));
        let start = Instant::now();
        let statuses = drain_until_done(&rx, Duration::from_secs(2));
        // the worker bails at the next poll, not at the end of the text
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(statuses.last().map(String::as_str), Some("Stopped."));
        player.join();
        assert_eq!(player.state(), SessionState::Done);
    }

    #[test]
    fn cancel_token_sleep_reports_interruption() {
        let token = CancelToken::default();
        assert!(token.sleep(Duration::from_millis(5)));
        token.cancel();
        assert!(!token.sleep(Duration::from_millis(5)));
    }
}
