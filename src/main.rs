// src/main.rs  —  radio-trainer  entry point
mod audio;
mod code;
mod config;
mod drill;
mod player;
mod speech;
mod tui;

use anyhow::Result;
use clap::Parser;
use config::{AppConfig, Cli, Mode, Spacing};
use player::{PlaybackRequest, Player, PlayerEvent};
use std::sync::mpsc;
#[cfg(feature = "tui")]
use std::thread;
#[cfg(feature = "tui")]
use std::time::Duration;

/// Slider adjustment per ←/→ keypress, seconds
#[cfg(feature = "tui")]
const ADJUST_STEP: f64 = 0.05;

// ── Shared UI state (passed to TUI draw) ─────────────────────────────────────
#[derive(Default, Clone)]
pub struct AppState {
    pub input:    String,
    pub mode:     Mode,
    pub spacing:  Spacing,
    /// Selected spacing row (0..6)
    pub selected: usize,
    pub status:   String,
    pub log:      Vec<String>,
    pub playing:  bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // ── --print-config  ───────────────────────────────────────────────────────
    if cli.print_config {
        print!("{}", config::DEFAULT_CONFIG_TOML);
        return Ok(());
    }

    // ── --write-config  ───────────────────────────────────────────────────────
    if cli.write_config {
        let path = AppConfig::write_default_config(&cli)?;
        println!("Config written to: {}", path.display());
        println!("Edit it to set your audio directory, voice, spacing, etc.");
        return Ok(());
    }

    // ── Load config ───────────────────────────────────────────────────────────
    let cfg = AppConfig::load(&cli)?;

    // ── --list-voices  ────────────────────────────────────────────────────────
    if cli.list_voices {
        let engine = speech::create_speech(None, cfg.rate);
        let voices = engine.list_voices()?;
        if voices.is_empty() {
            println!("No voices found ({} engine).", engine.name());
        } else {
            println!("Installed voices ({} engine):", engine.name());
            for v in &voices {
                println!("  {:<30} {:<10} {}", v.name, v.language, v.id);
            }
        }
        return Ok(());
    }

    // ── Headless one-shot: --text / --drill ───────────────────────────────────
    let oneshot = if let Some(text) = &cli.text {
        Some(text.clone())
    } else if let Some(n) = cli.drill {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;
        let mut rng = SmallRng::from_entropy();
        Some(drill::groups(&mut rng, cfg.charset, n, cfg.group_len))
    } else {
        None
    };
    if let Some(text) = oneshot {
        return run_headless(&cfg, text);
    }

    #[cfg(not(feature = "tui"))]
    anyhow::bail!("built without the tui feature — use --text or --drill");

    #[cfg(feature = "tui")]
    run_tui(cfg)
}

// ── Headless playback ─────────────────────────────────────────────────────────
fn run_headless(cfg: &AppConfig, text: String) -> Result<()> {
    println!("{} mode: {}", cfg.mode.label(), text.trim());
    let (tx, rx) = mpsc::channel::<PlayerEvent>();
    let mut player = Player::new();
    player.start(PlaybackRequest::from_config(cfg, text), tx)?;
    for ev in rx {
        match ev {
            PlayerEvent::Status(msg) => println!("  {msg}"),
            PlayerEvent::Done => break,
        }
    }
    player.join();
    Ok(())
}

// ── Interactive TUI ───────────────────────────────────────────────────────────
#[cfg(feature = "tui")]
fn run_tui(cfg: AppConfig) -> Result<()> {
    let mut state = AppState {
        input:   "CQ CQ DE VK3ABC".into(),
        mode:    cfg.mode,
        spacing: cfg.spacing,
        status:  "Ready.".into(),
        ..Default::default()
    };

    let mut tui = tui::Tui::new()?;
    let (tx_status, rx_status) = mpsc::channel::<PlayerEvent>();
    let mut player = Player::new();

    let tick = Duration::from_millis(10);

    'main: loop {
        // ── Single crossterm event reader ─────────────────────────────────────
        {
            use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
            while event::poll(Duration::from_millis(0))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind == KeyEventKind::Release {
                        continue;
                    }

                    // Ctrl+C always quits
                    if k.code == KeyCode::Char('c')
                        && k.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        break 'main;
                    }

                    match k.code {
                        // Esc stops an active session; quits otherwise
                        KeyCode::Esc => {
                            if player.is_active() {
                                player.stop();
                                state.status = "Stopping…".into();
                            } else {
                                break 'main;
                            }
                        }
                        KeyCode::Enter => {
                            let mut req =
                                PlaybackRequest::from_config(&cfg, state.input.clone());
                            req.mode    = state.mode;
                            req.spacing = state.spacing;
                            match player.start(req, tx_status.clone()) {
                                Ok(()) => {
                                    state.playing = true;
                                    state.log.clear();
                                    state.status = "Playing…".into();
                                }
                                Err(e) => state.status = e.to_string(),
                            }
                        }
                        KeyCode::Tab  => state.mode = state.mode.next(),
                        KeyCode::Up   => state.selected = state.selected.saturating_sub(1),
                        KeyCode::Down => state.selected = (state.selected + 1).min(5),
                        KeyCode::Left => {
                            let v = state.spacing.get(state.selected) - ADJUST_STEP;
                            state.spacing.set(state.selected, v);
                        }
                        KeyCode::Right => {
                            let v = state.spacing.get(state.selected) + ADJUST_STEP;
                            state.spacing.set(state.selected, v);
                        }
                        KeyCode::Backspace => {
                            state.input.pop();
                        }
                        KeyCode::Char(c) => state.input.push(c),
                        _ => {}
                    }
                }
            }
        }

        // ── Drain worker events → UI state ────────────────────────────────────
        // Status crosses threads only through this channel.
        while let Ok(ev) = rx_status.try_recv() {
            match ev {
                PlayerEvent::Status(msg) => {
                    state.status = msg.clone();
                    state.log.push(msg);
                    if state.log.len() > 200 {
                        let trim = state.log.len() - 200;
                        state.log.drain(..trim);
                    }
                }
                PlayerEvent::Done => state.playing = false,
            }
        }

        tui.draw(&state)?;
        thread::sleep(tick);
    }

    // ── Cleanup ───────────────────────────────────────────────────────────────
    if player.is_active() {
        player.stop();
    }
    player.join();
    tui.cleanup();

    println!("\n73 de radio-trainer!\n");
    Ok(())
}
