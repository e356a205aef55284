// src/config.rs  —  Runtime configuration (CLI + TOML)
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// The example config is embedded directly in the binary at compile time.
/// Users can write it out with:  radio-trainer --write-config
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config.toml.example");

// ── CLI ───────────────────────────────────────────────────────────────────────
#[derive(Parser, Debug)]
#[command(
    name        = "radio-trainer",
    about       = "Phonetic alphabet & Morse code trainer",
    version,
)]
pub struct Cli {
    /// Config file path (default: ~/.config/radio-trainer/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Playback mode: phonetic | morse | normal
    #[arg(short, long)]
    pub mode: Option<Mode>,

    /// Play this text once and exit (no TUI)
    #[arg(short, long)]
    pub text: Option<String>,

    /// Play N random practice groups and exit (no TUI)
    #[arg(long, value_name = "N")]
    pub drill: Option<usize>,

    /// Drill charset: letters | digits | mixed
    #[arg(long)]
    pub charset: Option<Charset>,

    /// Directory holding the phonetic/ and morse/ clip trees
    #[arg(long)]
    pub audio_dir: Option<PathBuf>,

    /// Output volume 0.0 … 1.0
    #[arg(long)]
    pub volume: Option<f32>,

    /// Morse tone source: files | synth
    #[arg(long)]
    pub tone_source: Option<ToneSource>,

    /// Synthesized tone pitch in Hz
    #[arg(long)]
    pub tone: Option<u32>,

    /// Synthesized element speed in WPM (dot = 1200ms / wpm)
    #[arg(long)]
    pub wpm: Option<u8>,

    /// Voice preference — substring matched against installed voice names
    #[arg(long)]
    pub voice: Option<String>,

    /// Speech rate in words per minute
    #[arg(long)]
    pub rate: Option<u16>,

    /// Pause between phonetic characters (seconds)
    #[arg(long)]
    pub phonetic_char: Option<f64>,

    /// Pause between phonetic words (seconds)
    #[arg(long)]
    pub phonetic_word: Option<f64>,

    /// Pause between Morse symbols (seconds)
    #[arg(long)]
    pub morse_symbol: Option<f64>,

    /// Pause between Morse letters (seconds)
    #[arg(long)]
    pub morse_letter: Option<f64>,

    /// Pause between Morse words (seconds)
    #[arg(long)]
    pub morse_word: Option<f64>,

    /// Pause after normal speech (seconds)
    #[arg(long)]
    pub tts_pause: Option<f64>,

    /// List the installed speech voices and exit
    #[arg(long, action)]
    pub list_voices: bool,

    /// Write the built-in default config.toml to the config path and exit.
    /// Use --config <PATH> to write to a custom location.
    #[arg(long, action)]
    pub write_config: bool,

    /// Print the built-in default config.toml to stdout and exit
    #[arg(long, action)]
    pub print_config: bool,
}

// ── Enums shared across CLI + TOML ────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// NATO phonetic call-outs from pre-recorded clips
    #[default]
    Phonetic,
    /// CW audio — clip files or synthesized tones
    Morse,
    /// Full text through the platform speech engine
    Normal,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Phonetic => "phonetic",
            Mode::Morse    => "morse",
            Mode::Normal   => "normal",
        }
    }

    /// Cycle order used by the TUI mode selector
    pub fn next(self) -> Self {
        match self {
            Mode::Phonetic => Mode::Morse,
            Mode::Morse    => Mode::Normal,
            Mode::Normal   => Mode::Phonetic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ToneSource {
    /// dot.wav / dash.wav clips from the morse audio directory
    Files,
    /// Generated sine tones, element length from [morse] wpm
    Synth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Charset { Letters, Digits, Mixed }

// ── Spacing parameters ────────────────────────────────────────────────────────
/// The six user-adjustable pauses, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Spacing {
    pub phonetic_char: f64,
    pub phonetic_word: f64,
    pub morse_symbol:  f64,
    pub morse_letter:  f64,
    pub morse_word:    f64,
    pub tts_pause:     f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            phonetic_char: 0.2,
            phonetic_word: 0.5,
            morse_symbol:  0.15,
            morse_letter:  0.3,
            morse_word:    0.7,
            tts_pause:     0.5,
        }
    }
}

/// (label, min, max) per parameter — index order matches `Spacing::get/set`.
pub const SPACING_RANGES: [(&str, f64, f64); 6] = [
    ("Between characters (phonetic)", 0.0, 1.0),
    ("Between words (phonetic)",      0.0, 2.0),
    ("Between symbols (morse)",       0.0, 1.0),
    ("Between letters (morse)",       0.0, 2.0),
    ("Between words (morse)",         0.0, 3.0),
    ("Pause after speech (normal)",   0.0, 2.0),
];

impl Spacing {
    pub fn get(&self, idx: usize) -> f64 {
        match idx {
            0 => self.phonetic_char,
            1 => self.phonetic_word,
            2 => self.morse_symbol,
            3 => self.morse_letter,
            4 => self.morse_word,
            _ => self.tts_pause,
        }
    }

    /// Set parameter `idx`, clamped to its slider range.
    pub fn set(&mut self, idx: usize, value: f64) {
        let (_, min, max) = SPACING_RANGES[idx.min(5)];
        let v = value.clamp(min, max);
        match idx {
            0 => self.phonetic_char = v,
            1 => self.phonetic_word = v,
            2 => self.morse_symbol  = v,
            3 => self.morse_letter  = v,
            4 => self.morse_word    = v,
            _ => self.tts_pause     = v,
        }
    }

    pub fn phonetic_char_gap(&self) -> Duration { secs(self.phonetic_char) }
    pub fn phonetic_word_gap(&self) -> Duration { secs(self.phonetic_word) }
    pub fn morse_symbol_gap(&self)  -> Duration { secs(self.morse_symbol) }
    pub fn morse_letter_gap(&self)  -> Duration { secs(self.morse_letter) }
    pub fn morse_word_gap(&self)    -> Duration { secs(self.morse_word) }
    pub fn tts_pause_gap(&self)     -> Duration { secs(self.tts_pause) }
}

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s.max(0.0))
}

// ── TOML file structure ───────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    pub general: Option<GeneralCfg>,
    pub spacing: Option<SpacingCfg>,
    pub morse:   Option<MorseCfg>,
    pub speech:  Option<SpeechCfg>,
    pub drill:   Option<DrillCfg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralCfg {
    pub mode:      Option<Mode>,
    pub audio_dir: Option<PathBuf>,
    pub volume:    Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacingCfg {
    pub phonetic_char: Option<f64>,
    pub phonetic_word: Option<f64>,
    pub morse_symbol:  Option<f64>,
    pub morse_letter:  Option<f64>,
    pub morse_word:    Option<f64>,
    pub tts_pause:     Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorseCfg {
    pub source:  Option<ToneSource>,
    pub wpm:     Option<u8>,
    pub tone_hz: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechCfg {
    pub voice: Option<String>,
    pub rate:  Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillCfg {
    pub charset:   Option<Charset>,
    pub group_len: Option<usize>,
}

// ── Resolved / merged config ──────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode:        Mode,
    pub audio_dir:   PathBuf,
    pub volume:      f32,
    pub spacing:     Spacing,
    pub tone_source: ToneSource,
    /// Element speed for synthesized tones (dot = 1200ms / wpm)
    pub wpm:         u8,
    pub tone_hz:     u32,
    /// Voice preference — substring matched against installed voice names
    pub voice:       Option<String>,
    pub rate:        u16,
    pub charset:     Charset,
    pub group_len:   usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode:        Mode::Phonetic,
            audio_dir:   PathBuf::from("audio"),
            volume:      0.7,
            spacing:     Spacing::default(),
            tone_source: ToneSource::Files,
            wpm:         20,
            tone_hz:     620,
            voice:       None,
            rate:        175,
            charset:     Charset::Letters,
            group_len:   5,
        }
    }
}

// ── Config loader ─────────────────────────────────────────────────────────────
impl AppConfig {
    /// Write the embedded default config to disk.
    /// Returns the path it was written to.
    pub fn write_default_config(cli: &Cli) -> Result<PathBuf> {
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating config directory {:?}", parent))?;
        }
        std::fs::write(&path, DEFAULT_CONFIG_TOML)
            .with_context(|| format!("Writing config to {:?}", path))?;
        Ok(path)
    }

    pub fn load(cli: &Cli) -> Result<Self> {
        let mut cfg = Self::default();

        // 1. Load TOML file
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Reading config {:?}", path))?;
            let fc: FileConfig = toml::from_str(&raw)
                .with_context(|| format!("Parsing config {:?}", path))?;
            cfg.apply_file(&fc);
        } else {
            log::info!(
                "No config file at {} — using defaults (radio-trainer --write-config creates one)",
                path.display()
            );
        }

        // 2. Apply CLI overrides
        cfg.apply_cli(cli);
        Ok(cfg)
    }

    fn apply_file(&mut self, fc: &FileConfig) {
        if let Some(g) = &fc.general {
            if let Some(v) = g.mode        { self.mode      = v; }
            if let Some(v) = &g.audio_dir  { self.audio_dir = v.clone(); }
            if let Some(v) = g.volume      { self.volume    = v; }
        }
        if let Some(s) = &fc.spacing {
            if let Some(v) = s.phonetic_char { self.spacing.set(0, v); }
            if let Some(v) = s.phonetic_word { self.spacing.set(1, v); }
            if let Some(v) = s.morse_symbol  { self.spacing.set(2, v); }
            if let Some(v) = s.morse_letter  { self.spacing.set(3, v); }
            if let Some(v) = s.morse_word    { self.spacing.set(4, v); }
            if let Some(v) = s.tts_pause     { self.spacing.set(5, v); }
        }
        if let Some(m) = &fc.morse {
            if let Some(v) = m.source  { self.tone_source = v; }
            if let Some(v) = m.wpm     { self.wpm         = v; }
            if let Some(v) = m.tone_hz { self.tone_hz     = v; }
        }
        if let Some(s) = &fc.speech {
            if let Some(v) = &s.voice { self.voice = Some(v.clone()); }
            if let Some(v) = s.rate   { self.rate  = v; }
        }
        if let Some(d) = &fc.drill {
            if let Some(v) = d.charset   { self.charset   = v; }
            if let Some(v) = d.group_len { self.group_len = v; }
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = cli.mode          { self.mode        = v; }
        if let Some(v) = &cli.audio_dir    { self.audio_dir   = v.clone(); }
        if let Some(v) = cli.volume        { self.volume      = v; }
        if let Some(v) = cli.tone_source   { self.tone_source = v; }
        if let Some(v) = cli.tone          { self.tone_hz     = v; }
        if let Some(v) = cli.wpm           { self.wpm         = v; }
        if let Some(v) = &cli.voice        { self.voice       = Some(v.clone()); }
        if let Some(v) = cli.rate          { self.rate        = v; }
        if let Some(v) = cli.charset       { self.charset     = v; }
        if let Some(v) = cli.phonetic_char { self.spacing.set(0, v); }
        if let Some(v) = cli.phonetic_word { self.spacing.set(1, v); }
        if let Some(v) = cli.morse_symbol  { self.spacing.set(2, v); }
        if let Some(v) = cli.morse_letter  { self.spacing.set(3, v); }
        if let Some(v) = cli.morse_word    { self.spacing.set(4, v); }
        if let Some(v) = cli.tts_pause     { self.spacing.set(5, v); }
    }
}

fn default_config_path() -> PathBuf {
    dirs_next().join("radio-trainer").join("config.toml")
}

fn dirs_next() -> PathBuf {
    if let Ok(v) = std::env::var("XDG_CONFIG_HOME") { return PathBuf::from(v); }
    if let Ok(v) = std::env::var("APPDATA")          { return PathBuf::from(v); }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_default();
    PathBuf::from(home).join(".config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_default_config_parses() {
        let fc: FileConfig = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        let mut cfg = AppConfig::default();
        cfg.apply_file(&fc);
        assert_eq!(cfg.mode, Mode::Phonetic);
        assert_eq!(cfg.tone_source, ToneSource::Files);
        assert_eq!(cfg.rate, 175);
    }

    #[test]
    fn spacing_set_clamps_to_range() {
        let mut s = Spacing::default();
        s.set(0, 5.0);
        assert_eq!(s.phonetic_char, 1.0);
        s.set(4, -1.0);
        assert_eq!(s.morse_word, 0.0);
        s.set(4, 2.5);
        assert_eq!(s.morse_word, 2.5);
    }

    #[test]
    fn file_then_cli_layering() {
        let fc: FileConfig = toml::from_str(
            "[general]\nmode = \"morse\"\n[spacing]\nmorse_symbol = 0.25\n",
        )
        .unwrap();
        let mut cfg = AppConfig::default();
        cfg.apply_file(&fc);
        assert_eq!(cfg.mode, Mode::Morse);
        assert_eq!(cfg.spacing.morse_symbol, 0.25);

        let cli = Cli::parse_from(["radio-trainer", "--mode", "normal", "--rate", "150"]);
        cfg.apply_cli(&cli);
        assert_eq!(cfg.mode, Mode::Normal);
        assert_eq!(cfg.rate, 150);
        // untouched by CLI — file value survives
        assert_eq!(cfg.spacing.morse_symbol, 0.25);
    }
}
