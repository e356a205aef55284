// src/speech/mod.rs  —  SpeechEngine trait + platform backends
use anyhow::Result;
use crate::player::CancelToken;

#[cfg(all(unix, not(target_os = "macos")))]
mod espeak;
#[cfg(target_os = "macos")]
mod say;
#[cfg(windows)]
mod sapi;

/// An installed text-to-speech voice
#[derive(Debug, Clone)]
pub struct Voice {
    /// Identifier accepted by the engine's voice switch
    pub id:       String,
    pub name:     String,
    pub language: String,
}

/// Blocking call-and-wait speech synthesis.
///
/// `speak` returns once the text has been spoken in full, or early when the
/// cancellation token fires (the synthesizer process is killed).
pub trait SpeechEngine {
    fn name(&self) -> &'static str;
    fn speak(&mut self, text: &str, cancel: &CancelToken) -> Result<()>;
    fn list_voices(&self) -> Result<Vec<Voice>>;
}

/// Best-effort voice preference: case-insensitive substring match against
/// voice name or id.  First hit wins.
pub fn select_voice(voices: &[Voice], pref: &str) -> Option<Voice> {
    let pref = pref.to_lowercase();
    voices
        .iter()
        .find(|v| v.name.to_lowercase().contains(&pref) || v.id.to_lowercase().contains(&pref))
        .cloned()
}

/// Null backend (no synthesizer found — speech is skipped)
pub struct NullSpeech;

impl SpeechEngine for NullSpeech {
    fn name(&self) -> &'static str { "null" }
    fn speak(&mut self, text: &str, _cancel: &CancelToken) -> Result<()> {
        log::warn!("no speech engine available — skipping {} chars", text.len());
        Ok(())
    }
    fn list_voices(&self) -> Result<Vec<Voice>> { Ok(Vec::new()) }
}

/// Factory: returns the platform synthesizer, or NullSpeech when none works
pub fn create_speech(voice_pref: Option<&str>, rate_wpm: u16) -> Box<dyn SpeechEngine> {
    #[cfg(target_os = "macos")]
    {
        match say::SaySpeech::new(voice_pref, rate_wpm) {
            Ok(s)  => return Box::new(s),
            Err(e) => log::warn!("say init failed: {e}  →  using NullSpeech"),
        }
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        match espeak::EspeakSpeech::new(voice_pref, rate_wpm) {
            Ok(s)  => return Box::new(s),
            Err(e) => log::warn!("espeak init failed: {e}  →  using NullSpeech"),
        }
    }
    #[cfg(windows)]
    {
        match sapi::SapiSpeech::new(voice_pref, rate_wpm) {
            Ok(s)  => return Box::new(s),
            Err(e) => log::warn!("SAPI init failed: {e}  →  using NullSpeech"),
        }
    }
    #[cfg(not(any(unix, windows)))]
    let _ = (voice_pref, rate_wpm);
    Box::new(NullSpeech)
}

/// Poll a spawned synthesizer until it exits or the token cancels it.
/// Shared by every process-based backend.
#[cfg(any(unix, windows))]
pub(crate) fn wait_child(mut child: std::process::Child, cancel: &CancelToken) -> Result<()> {
    use anyhow::Context;
    loop {
        if let Some(status) = child.try_wait().context("Waiting for synthesizer")? {
            if !status.success() {
                anyhow::bail!("synthesizer exited with {status}");
            }
            return Ok(());
        }
        if cancel.is_cancelled() {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(());
        }
        std::thread::sleep(crate::player::POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<Voice> {
        vec![
            Voice { id: "en-gb".into(), name: "English (Great Britain)".into(), language: "en-GB".into() },
            Voice { id: "en-us".into(), name: "English (America)".into(),       language: "en-US".into() },
            Voice { id: "de".into(),    name: "German".into(),                  language: "de".into() },
        ]
    }

    #[test]
    fn preference_matches_name_substring_case_insensitive() {
        let v = select_voice(&voices(), "america").unwrap();
        assert_eq!(v.id, "en-us");
    }

    #[test]
    fn preference_matches_id_too() {
        let v = select_voice(&voices(), "DE").unwrap();
        assert_eq!(v.name, "German");
    }

    #[test]
    fn unmatched_preference_is_none() {
        assert!(select_voice(&voices(), "zira").is_none());
    }
}
