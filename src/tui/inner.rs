// src/tui/inner.rs  —  ratatui layout
use anyhow::Result;
use crossterm::{execute, terminal::{self, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use crate::config::{Mode, SPACING_RANGES};
use crate::AppState;
use std::io::stdout;

const SLIDER_CELLS: usize = 24;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
}

impl Tui {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen)?;
        let backend  = CrosstermBackend::new(out);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn cleanup(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }

    pub fn draw(&mut self, s: &AppState) -> Result<()> {
        self.terminal.draw(|f| {
            let area = f.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),  // header bar
                    Constraint::Length(5),  // text entry
                    Constraint::Length(3),  // mode selector
                    Constraint::Length(8),  // spacing sliders
                    Constraint::Min(5),     // status log
                    Constraint::Length(1),  // footer hints
                ])
                .split(area);

            // ── Header ────────────────────────────────────────────────────
            let header = Paragraph::new(format!(
                " Radio Trainer  |  mode: {}  |  {}",
                s.mode.label(),
                if s.playing { "PLAYING" } else { "ready" },
            ))
            .style(Style::default().fg(Color::Black).bg(Color::Cyan)
                   .add_modifier(Modifier::BOLD));
            f.render_widget(header, chunks[0]);

            // ── Text entry ────────────────────────────────────────────────
            let entry = Paragraph::new(format!("{}_", s.input))
                .block(Block::default()
                    .title(" TEXT ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::White)))
                .wrap(Wrap { trim: false });
            f.render_widget(entry, chunks[1]);

            // ── Mode selector ─────────────────────────────────────────────
            let mode_spans: Vec<Span> = [Mode::Phonetic, Mode::Morse, Mode::Normal]
                .into_iter()
                .flat_map(|m| {
                    let style = if m == s.mode {
                        Style::default().fg(Color::Black).bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    };
                    [
                        Span::styled(format!(" {} ", m.label()), style),
                        Span::raw("  "),
                    ]
                })
                .collect();
            let mode_block = Paragraph::new(Line::from(mode_spans))
                .block(Block::default()
                    .title(" MODE (Tab) ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)));
            f.render_widget(mode_block, chunks[2]);

            // ── Spacing sliders ───────────────────────────────────────────
            let rows: Vec<Line> = SPACING_RANGES
                .iter()
                .enumerate()
                .map(|(i, (label, min, max))| {
                    let value = s.spacing.get(i);
                    let filled = (((value - min) / (max - min)) * SLIDER_CELLS as f64)
                        .round()
                        .clamp(0.0, SLIDER_CELLS as f64) as usize;
                    let bar: String = "█".repeat(filled) + &"░".repeat(SLIDER_CELLS - filled);
                    let style = if i == s.selected {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    Line::from(Span::styled(
                        format!("{:<32} {bar} {value:4.2}s", label),
                        style,
                    ))
                })
                .collect();
            let spacing_block = Paragraph::new(rows)
                .block(Block::default()
                    .title(" SPACING (seconds) ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)));
            f.render_widget(spacing_block, chunks[3]);

            // ── Status log ────────────────────────────────────────────────
            let visible = chunks[4].height.saturating_sub(2) as usize;
            let skip = s.log.len().saturating_sub(visible);
            let log_lines: Vec<Line> = s.log[skip..]
                .iter()
                .map(|l| Line::from(Span::styled(l.clone(), Style::default().fg(Color::Green))))
                .collect();
            let log_block = Paragraph::new(log_lines)
                .block(Block::default()
                    .title(format!(" STATUS  {} ", s.status))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)))
                .wrap(Wrap { trim: true });
            f.render_widget(log_block, chunks[4]);

            // ── Footer ────────────────────────────────────────────────────
            let footer = Paragraph::new(
                " Enter = play   Esc = stop / quit   Tab = mode   ↑↓ = select   ←→ = adjust ",
            )
            .style(Style::default().fg(Color::DarkGray).bg(Color::Black));
            f.render_widget(footer, chunks[5]);
        })?;
        Ok(())
    }
}
