//! TUI (Terminal User Interface) front end for Bomb Party
//!
//! Full-screen view built with Ratatui: prompt, countdown gauge, lives,
//! alphabet progress and a history of recent submissions.
//!
//! # State Machine
//! - `Playing` → `Playing` for every round, submission and timeout
//! - `Playing` → `GameOver` when the round loop ends; any key then exits

use crate::engine::{LetterSet, ValidationOutcome};
use crate::game_state::{
    GameInterface, GameOutcome, GameSummary, RoundInfo, TimeoutReport, UserAction,
};
use crate::input::LineEditor;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const MAX_HISTORY_DISPLAY: usize = 6;
const COUNTDOWN_STEP_MS: u128 = 100;
const LOW_TIME_MS: u128 = 1500;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const COVERED_STYLE: Style = Style::new().fg(Color::DarkGray);

#[derive(Debug, Clone, Copy, PartialEq)]
enum TuiState {
    Playing,
    /// Session has ended - summary stored in interface.message
    GameOver,
}

#[derive(Debug)]
struct HistoryEntry {
    word: String,
    outcome: ValidationOutcome,
}

impl HistoryEntry {
    fn line(&self) -> Line<'_> {
        let (label, style) = match self.outcome {
            ValidationOutcome::Accepted => ("accepted", SUCCESS_STYLE),
            ValidationOutcome::NewLife => ("new life!", INFO_STYLE),
            ValidationOutcome::Rejected => ("rejected", ERROR_STYLE),
        };
        Line::from(vec![
            Span::raw(format!("  {} ", self.word)),
            Span::styled(label, style),
        ])
    }
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    state: TuiState,
    round: Option<&'a RoundInfo>,
    lives: u32,
    remaining_letters: LetterSet,
    countdown_ratio: f64,
    remaining: Duration,
    current_input: &'a str,
    history: &'a [HistoryEntry],
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    editor: LineEditor,
    state: TuiState,
    round: Option<RoundInfo>,
    round_timeout: Duration,
    remaining: Duration,
    shown_steps: Option<u128>,
    lives: u32,
    remaining_letters: LetterSet,
    history: Vec<HistoryEntry>,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new(round_timeout: Duration) -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("TuiInterface::new() - Terminal ready");

        Ok(Self {
            terminal,
            editor: LineEditor::new(),
            state: TuiState::Playing,
            round: None,
            round_timeout,
            remaining: round_timeout,
            shown_steps: None,
            lives: 0,
            remaining_letters: LetterSet::full(),
            history: Vec::new(),
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            state: self.state,
            round: self.round.as_ref(),
            lives: self.lives,
            remaining_letters: self.remaining_letters,
            countdown_ratio: countdown_ratio(self.remaining, self.round_timeout),
            remaining: self.remaining,
            current_input: self.editor.buffer(),
            history: &self.history,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Render the complete UI layout using the provided context.
    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(5), // Prompt
                Constraint::Length(3), // Countdown
                Constraint::Length(3), // Input
                Constraint::Length(3), // Alphabet
                Constraint::Min(6),    // Info panel (takes remaining space)
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0], ctx);
        Self::render_prompt(f, chunks[1], ctx.round);
        Self::render_countdown(f, chunks[2], ctx);
        Self::render_input(f, chunks[3], ctx.current_input, ctx.state);
        Self::render_alphabet(f, chunks[4], ctx.remaining_letters);
        Self::render_info(f, chunks[5], ctx.history, ctx.message, ctx.error_message);
        Self::render_status(f, chunks[6], ctx.status);
        Self::render_instructions(f, chunks[7], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut spans = vec![Span::styled("BOMB PARTY", HEADER_STYLE)];
        if let Some(round) = ctx.round {
            spans.push(Span::raw(format!("   Round {}   ", round.round)));
            spans.push(Span::styled(
                hearts(ctx.lives, round.max_lives),
                Style::default().fg(Color::Red),
            ));
        }
        let title = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_prompt(f: &mut Frame, area: Rect, round: Option<&RoundInfo>) {
        let text = round.map_or_else(String::new, |r| spaced(&r.prompt.to_uppercase()));
        let lines = vec![Line::from(""), Line::from(Span::styled(text, INFO_STYLE))];
        let prompt = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Prompt").borders(Borders::ALL));
        f.render_widget(prompt, area);
    }

    fn render_countdown(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let color = if ctx.remaining.as_millis() <= LOW_TIME_MS {
            Color::Red
        } else {
            Color::Green
        };
        let gauge = Gauge::default()
            .block(Block::default().title("Bomb").borders(Borders::ALL))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio(ctx.countdown_ratio)
            .label(format!("{:.1}s", ctx.remaining.as_secs_f64()));
        f.render_widget(gauge, area);
    }

    fn render_input(f: &mut Frame, area: Rect, current_input: &str, state: TuiState) {
        let text = match state {
            TuiState::Playing => format!("> {current_input}_"),
            TuiState::GameOver => String::new(),
        };
        let input =
            Paragraph::new(text).block(Block::default().title("Your word").borders(Borders::ALL));
        f.render_widget(input, area);
    }

    fn render_alphabet(f: &mut Frame, area: Rect, remaining: LetterSet) {
        let spans: Vec<Span> = ('a'..='z')
            .map(|letter| {
                let style = if remaining.contains(letter) {
                    INFO_STYLE
                } else {
                    COVERED_STYLE
                };
                Span::styled(format!("{} ", letter.to_ascii_uppercase()), style)
            })
            .collect();
        let title = format!("Letters left for a bonus life ({})", remaining.len());
        let alphabet = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(alphabet, area);
    }

    fn render_info(
        f: &mut Frame,
        area: Rect,
        history: &[HistoryEntry],
        message: &str,
        error_message: &str,
    ) {
        let mut lines = Vec::new();

        if !history.is_empty() {
            lines.push(Line::from(vec![Span::styled("This round:", HEADER_STYLE)]));
            let skip = history.len().saturating_sub(MAX_HISTORY_DISPLAY);
            lines.extend(history.iter().skip(skip).map(HistoryEntry::line));
            lines.push(Line::from(""));
        }

        if !message.is_empty() {
            lines.push(Line::from(vec![Span::styled(message, MESSAGE_STYLE)]));
        }

        if !error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::Playing => "Type a word containing the prompt | ENTER: Submit | ESC: Quit",
            TuiState::GameOver => "Press any key to exit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    /// Blocks until a key is pressed.
    fn wait_for_key() -> io::Result<()> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }

    /// Transition to the `GameOver` state
    fn transition_to_game_over(&mut self) {
        self.state = TuiState::GameOver;
    }
}

/// Fraction of the round still left, clamped to `0.0..=1.0`.
fn countdown_ratio(remaining: Duration, round_timeout: Duration) -> f64 {
    if round_timeout.is_zero() {
        return 0.0;
    }
    (remaining.as_secs_f64() / round_timeout.as_secs_f64()).clamp(0.0, 1.0)
}

fn hearts(lives: u32, max_lives: u32) -> String {
    let full = lives.min(max_lives) as usize;
    let empty = max_lives as usize - full;
    format!("{}{}", "♥ ".repeat(full), "♡ ".repeat(empty)).trim_end().to_string()
}

fn spaced(text: &str) -> String {
    text.chars().map(String::from).collect::<Vec<_>>().join(" ")
}

impl GameInterface for TuiInterface {
    fn display_round_start(&mut self, info: &RoundInfo) {
        self.editor.clear();
        self.history.clear();
        self.error_message.clear();
        self.lives = info.lives;
        self.remaining_letters = info.remaining_letters;
        self.remaining = self.round_timeout;
        self.shown_steps = None;
        self.status = format!("Round {} - find a word containing '{}'", info.round, info.prompt);
        self.round = Some(info.clone());
        self.draw_or_log();
    }

    fn poll_action(&mut self, timeout: Duration) -> io::Result<Option<UserAction>> {
        let before = self.editor.buffer().len();
        let action = self.editor.poll_terminal(timeout)?;
        if action.is_some() || self.editor.buffer().len() != before {
            self.draw_or_log();
        }
        Ok(action)
    }

    fn display_countdown(&mut self, remaining: Duration) {
        self.remaining = remaining;
        let steps = remaining.as_millis() / COUNTDOWN_STEP_MS;
        if self.shown_steps != Some(steps) {
            self.shown_steps = Some(steps);
            self.draw_or_log();
        }
    }

    fn display_verdict(&mut self, submission: &str, outcome: ValidationOutcome, lives: u32) {
        self.lives = lives;
        self.history.push(HistoryEntry {
            word: submission.to_string(),
            outcome,
        });
        match outcome {
            ValidationOutcome::Rejected => {
                self.error_message = format!("'{submission}' doesn't work - try again");
            }
            ValidationOutcome::Accepted => {
                self.error_message.clear();
                self.message = format!("'{submission}' accepted");
            }
            ValidationOutcome::NewLife => {
                self.error_message.clear();
                self.message = format!("'{submission}' completed the alphabet - new life!");
            }
        }
        self.draw_or_log();
    }

    fn display_timeout(&mut self, report: &TimeoutReport) {
        self.lives = report.lives;
        self.remaining = Duration::ZERO;
        self.error_message.clear();
        self.message = format!(
            "Boom! '{}' had {} words, e.g. {}",
            report.prompt,
            report.frequency,
            report.examples.join(", ")
        );
        self.draw_or_log();
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        self.transition_to_game_over();
        self.error_message = match summary.outcome {
            GameOutcome::OutOfLives => "You lose :(".to_string(),
            GameOutcome::OutOfPrompts => {
                "No prompts left - you outlasted the dictionary!".to_string()
            }
            GameOutcome::Quit => String::new(),
        };
        self.status = summary.to_string();
        if summary.outcome == GameOutcome::Quit {
            return;
        }
        self.draw_or_log();
        if let Err(e) = Self::wait_for_key() {
            debug_log!("display_game_over() - Input error: {}", e);
        }
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
