// src/speech/sapi.rs  —  Windows System.Speech backend (via PowerShell)
use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use super::{select_voice, SpeechEngine, Voice};
use crate::player::CancelToken;

pub struct SapiSpeech {
    voice: Option<String>,
    rate:  u16,
}

impl SapiSpeech {
    pub fn new(voice_pref: Option<&str>, rate_wpm: u16) -> Result<Self> {
        Command::new("powershell")
            .args(["-NoProfile", "-Command", "exit 0"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .context("powershell not found in PATH")?;

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

    /// SAPI rate runs -10…10 around a ≈175 wpm midpoint
    fn sapi_rate(&self) -> i32 {
        ((i32::from(self.rate) - 175) / 25).clamp(-10, 10)
    }
}

impl SpeechEngine for SapiSpeech {
    fn name(&self) -> &'static str { "sapi" }

    fn speak(&mut self, text: &str, cancel: &CancelToken) -> Result<()> {
        let escaped = text.replace('\'', "''").replace(['\r', '\n'], " ");
        let select = match &self.voice {
            Some(v) => format!("$synth.SelectVoice('{}'); ", v.replace('\'', "''")),
            None => String::new(),
        };
        let script = format!(
            "Add-Type -AssemblyName System.Speech; \
             $synth = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
             $synth.Rate = {}; {}$synth.Speak('{}');",
            self.sapi_rate(),
            select,
            escaped,
        );
        let child = Command::new("powershell")
            .args(["-NoProfile", "-Command", &script])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Spawning powershell")?;
        super::wait_child(child, cancel)
    }

    fn list_voices(&self) -> Result<Vec<Voice>> {
        let script = "Add-Type -AssemblyName System.Speech; \
             (New-Object System.Speech.Synthesis.SpeechSynthesizer).GetInstalledVoices() | \
             ForEach-Object { $i = $_.VoiceInfo; \"$($i.Name)|$($i.Culture)\" }";
        let out = Command::new("powershell")
            .args(["-NoProfile", "-Command", script])
            .output()
            .context("Listing SAPI voices")?;
        Ok(String::from_utf8_lossy(&out.stdout)
            .lines()
            .filter_map(|line| {
                let (name, culture) = line.trim().split_once('|')?;
                Some(Voice {
                    id:       name.to_string(),
                    name:     name.to_string(),
                    language: culture.to_string(),
                })
            })
            .collect())
    }
}
