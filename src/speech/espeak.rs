// src/speech/espeak.rs  —  espeak-ng / espeak backend
use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use super::{select_voice, SpeechEngine, Voice};
use crate::player::CancelToken;

pub struct EspeakSpeech {
    program: &'static str,
    /// Resolved -v argument, None = engine default
    voice:   Option<String>,
    rate:    u16,
}

impl EspeakSpeech {
    pub fn new(voice_pref: Option<&str>, rate_wpm: u16) -> Result<Self> {
        let program = ["espeak-ng", "espeak"]
            .into_iter()
            .find(|p| {
                Command::new(p)
                    .arg("--version")
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .map(|s| s.success())
                    .unwrap_or(false)
            })
            .context("Neither espeak-ng nor espeak found in PATH")?;

        let mut engine = Self { program, voice: None, rate: rate_wpm };
        if let Some(pref) = voice_pref {
            match engine.list_voices() {
                Ok(voices) => match select_voice(&voices, pref) {
                    Some(v) => {
                        log::info!("voice preference '{pref}' → {} ({})", v.name, v.id);
                        engine.voice = Some(v.id);
                    }
                    None => log::warn!("no voice matches '{pref}' — using default"),
                },
                Err(e) => log::warn!("listing voices failed: {e} — using default"),
            }
        }
        Ok(engine)
    }
}

impl SpeechEngine for EspeakSpeech {
    fn name(&self) -> &'static str { self.program }

    fn speak(&mut self, text: &str, cancel: &CancelToken) -> Result<()> {
        let mut cmd = Command::new(self.program);
        cmd.arg("-s").arg(self.rate.to_string());
        if let Some(v) = &self.voice {
            cmd.arg("-v").arg(v);
        }
        // Text as a single argument, "--" so leading dashes cannot become flags
        let child = cmd
            .arg("--")
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Spawning {}", self.program))?;
        super::wait_child(child, cancel)
    }

    fn list_voices(&self) -> Result<Vec<Voice>> {
        let out = Command::new(self.program)
            .arg("--voices")
            .output()
            .with_context(|| format!("Running {} --voices", self.program))?;
        Ok(parse_voice_table(&String::from_utf8_lossy(&out.stdout)))
    }
}

/// Parse the `--voices` table:
///   Pty Language Age/Gender VoiceName File [Other Languages]
/// The voice name may contain spaces, so everything between the gender
/// column and the file column is taken as the name.
fn parse_voice_table(raw: &str) -> Vec<Voice> {
    raw.lines()
        .skip(1) // header
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 5 {
                return None;
            }
            let language = cols[1].to_string();
            let name = cols[3..cols.len() - 1].join(" ");
            Some(Voice { id: language.clone(), name, language })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_espeak_ng_voice_table() {
        let raw = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  en-gb           --/M      English_(Great_Britain) gmw/en
 2  de              --/M      German             gmw/de
";
        let voices = parse_voice_table(raw);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[1].id, "en-gb");
        assert_eq!(voices[2].name, "German");
    }

    #[test]
    fn short_lines_are_skipped() {
        assert!(parse_voice_table("header\nbroken line\n").is_empty());
    }
}
