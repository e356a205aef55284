// src/speech/say.rs  —  macOS `say` backend
use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use super::{select_voice, SpeechEngine, Voice};
use crate::player::CancelToken;

pub struct SaySpeech {
    voice: Option<String>,
    rate:  u16,
}

impl SaySpeech {
    pub fn new(voice_pref: Option<&str>, rate_wpm: u16) -> Result<Self> {
        Command::new("say")
            .arg("-v")
            .arg("?")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .context("say not found in PATH")?;

        let mut engine = Self { voice: None, rate: rate_wpm };
        if let Some(pref) = voice_pref {
            match engine.list_voices() {
                Ok(voices) => match select_voice(&voices, pref) {
                    Some(v) => {
                        log::info!("voice preference '{pref}' → {}", v.name);
                        engine.voice = Some(v.name);
                    }
                    None => log::warn!("no voice matches '{pref}' — using default"),
                },
                Err(e) => log::warn!("listing voices failed: {e} — using default"),
            }
        }
        Ok(engine)
    }
}

impl SpeechEngine for SaySpeech {
    fn name(&self) -> &'static str { "say" }

    fn speak(&mut self, text: &str, cancel: &CancelToken) -> Result<()> {
        let mut cmd = Command::new("say");
        cmd.arg("-r").arg(self.rate.to_string());
        if let Some(v) = &self.voice {
            cmd.arg("-v").arg(v);
        }
        let child = cmd
            .arg("--")
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Spawning say")?;
        super::wait_child(child, cancel)
    }

    fn list_voices(&self) -> Result<Vec<Voice>> {
        let out = Command::new("say")
            .arg("-v")
            .arg("?")
            .output()
            .context("Running say -v ?")?;
        Ok(parse_voice_list(&String::from_utf8_lossy(&out.stdout)))
    }
}

/// Parse `say -v ?` lines:  "Alex    en_US  # Most people recognize me…"
fn parse_voice_list(raw: &str) -> Vec<Voice> {
    raw.lines()
        .filter_map(|line| {
            let head = line.split('#').next().unwrap_or("").trim_end();
            let mut cols = head.split_whitespace().collect::<Vec<_>>();
            let language = cols.pop()?.to_string();
            if cols.is_empty() {
                return None;
            }
            let name = cols.join(" ");
            Some(Voice { id: name.clone(), name, language })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_say_voice_list() {
        let raw = "\
Alex                en_US    # Most people recognize me by my voice.
Amelie              fr_CA    # Bonjour, je m'appelle Amelie.
Pipe Organ          en_US    # We must rejoice in this morbid voice.
";
        let voices = parse_voice_list(raw);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].name, "Alex");
        assert_eq!(voices[2].name, "Pipe Organ");
        assert_eq!(voices[2].language, "en_US");
    }
}
