use crate::config::{
    DEFAULT_INITIAL_LIVES, DEFAULT_MAX_LIVES, DEFAULT_ROUND_TIMEOUT_SECS, DEFAULT_WPP, GameConfig,
};
use crate::corpus::GENERATE_MIN_WORDS;
use crate::engine::ValidationOutcome;
use crate::error::ConfigError;
use crate::game_state::{
    GameInterface, GameOutcome, GameSummary, RoundInfo, TimeoutReport, UserAction,
};
use crate::input::LineEditor;
use clap::{Args, Parser, Subcommand};
use crossterm::cursor::MoveToColumn;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{execute, queue};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Single-player Bomb Party: type a word containing the prompt before the bomb goes off
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub play: PlayArgs,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a JSON prompt corpus from a dictionary
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PlayArgs {
    /// Path to a newline-delimited dictionary
    #[arg(short = 'd', long = "dict")]
    pub dictionary_path: Option<PathBuf>,

    /// Path to a JSON prompt corpus (generated from the dictionary when absent)
    #[arg(short = 'p', long = "prompts")]
    pub prompts_path: Option<PathBuf>,

    /// Minimum number of dictionary words a prompt must match
    #[arg(long, default_value_t = DEFAULT_WPP)]
    pub wpp: u32,

    /// Lives at the start of the game
    #[arg(long = "lives", default_value_t = DEFAULT_INITIAL_LIVES)]
    pub initial_lives: u32,

    /// Cap on lives earned by covering the alphabet
    #[arg(long, default_value_t = DEFAULT_MAX_LIVES)]
    pub max_lives: u32,

    /// Seconds per round
    #[arg(long = "timeout", value_name = "SECS", default_value_t = DEFAULT_ROUND_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Seed for prompt order and example sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use the full-screen interface
    #[arg(long)]
    pub tui: bool,
}

impl PlayArgs {
    pub fn to_config(&self) -> Result<GameConfig, ConfigError> {
        let config = GameConfig {
            wpp: self.wpp,
            initial_lives: self.initial_lives,
            max_lives: self.max_lives,
            round_timeout: Duration::from_secs(self.timeout_secs),
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Path to a newline-delimited dictionary
    #[arg(short = 'd', long = "dict")]
    pub dictionary_path: Option<PathBuf>,

    /// Where to write the JSON corpus
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Shortest prompt length
    #[arg(long, default_value_t = 2)]
    pub min_len: usize,

    /// Longest prompt length
    #[arg(long, default_value_t = 3)]
    pub max_len: usize,

    /// Drop prompts matched by fewer words
    #[arg(long, default_value_t = GENERATE_MIN_WORDS)]
    pub min_words: u32,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// Text shown by the line-oriented front end

pub fn format_lives(lives: u32, max_lives: u32) -> String {
    format!("Lives: {lives}/{max_lives}")
}

/// Pools smaller than this get a warning before the game starts.
pub const SMALL_POOL_PROMPTS: usize = 20;

/// Warning for a prompt pool too small for a proper game, `None` otherwise.
pub fn format_pool_hint(eligible: usize, wpp: u32, embedded_dictionary: bool) -> Option<String> {
    if eligible >= SMALL_POOL_PROMPTS {
        return None;
    }
    let headline = if eligible == 0 {
        format!("No prompt reaches wpp {wpp}.")
    } else {
        format!("Only {eligible} prompts reach wpp {wpp}, a game of at most {eligible} rounds.")
    };
    let advice = if embedded_dictionary {
        "The built-in dictionary is a small sample: pass a full word list with -d, or try --wpp 20."
    } else {
        "Try a lower --wpp."
    };
    Some(format!("{headline} {advice}"))
}

pub fn format_round_start(info: &RoundInfo) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Round {} | {} | Letters left: {}",
            info.round,
            format_lives(info.lives, info.max_lives),
            info.remaining_letters
        ),
        format!("Prompt: {}", info.prompt.to_uppercase()),
    ]
}

pub fn format_verdict(submission: &str, outcome: ValidationOutcome, lives: u32) -> String {
    match outcome {
        ValidationOutcome::Accepted => format!("W - '{submission}' accepted"),
        ValidationOutcome::NewLife => {
            format!("New life! '{submission}' completed the alphabet ({lives} lives)")
        }
        ValidationOutcome::Rejected => format!("L - '{submission}' rejected"),
    }
}

pub fn format_timeout(report: &TimeoutReport) -> String {
    format!(
        "Boom! WPP: {}. Examples: {}. Lives left: {}",
        report.frequency,
        report.examples.join(", "),
        report.lives
    )
}

pub fn format_game_over(summary: &GameSummary) -> Vec<String> {
    let headline = match summary.outcome {
        GameOutcome::OutOfLives => "You lose :(",
        GameOutcome::OutOfPrompts => "No prompts left - you outlasted the dictionary!",
        GameOutcome::Quit => "Exiting.",
    };
    vec![headline.to_string(), summary.to_string()]
}

/// Line-oriented front end. Runs the terminal in raw mode so that input can be
/// polled keystroke by keystroke without blocking past the round deadline.
pub struct CliInterface<W: Write> {
    out: W,
    editor: LineEditor,
    raw_mode: bool,
    shown_seconds: Option<u64>,
}

impl CliInterface<io::Stdout> {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut interface = Self::with_writer(io::stdout());
        interface.raw_mode = true;
        execute!(interface.out, EnableBracketedPaste)?;
        Ok(interface)
    }
}

impl<W: Write> CliInterface<W> {
    /// Writes to `out` without touching the terminal mode.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            editor: LineEditor::new(),
            raw_mode: false,
            shown_seconds: None,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn print_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> io::Result<()> {
        for line in lines {
            queue!(
                self.out,
                MoveToColumn(0),
                Clear(ClearType::CurrentLine),
                Print(line.as_ref()),
                Print("\r\n")
            )?;
        }
        self.out.flush()
    }

    fn redraw_input(&mut self) -> io::Result<()> {
        let seconds = self.shown_seconds.unwrap_or_default();
        execute!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(format!("[{seconds}s] > {}", self.editor.buffer()))
        )
    }

    fn print_or_log<S: AsRef<str>>(&mut self, lines: &[S]) {
        if let Err(e) = self.print_lines(lines) {
            log::warn!("CliInterface - write failed: {e}");
        }
    }
}

impl<W: Write> GameInterface for CliInterface<W> {
    fn display_round_start(&mut self, info: &RoundInfo) {
        self.editor.clear();
        self.shown_seconds = None;
        self.print_or_log(&format_round_start(info));
    }

    fn poll_action(&mut self, timeout: Duration) -> io::Result<Option<UserAction>> {
        let before = self.editor.buffer().len();
        let action = self.editor.poll_terminal(timeout)?;
        match action {
            Some(UserAction::Submit(_)) => self.out.write_all(b"\r\n")?,
            _ if self.editor.buffer().len() != before => self.redraw_input()?,
            _ => {}
        }
        Ok(action)
    }

    fn display_countdown(&mut self, remaining: Duration) {
        let seconds = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        if self.shown_seconds != Some(seconds) {
            self.shown_seconds = Some(seconds);
            if let Err(e) = self.redraw_input() {
                log::warn!("CliInterface - write failed: {e}");
            }
        }
    }

    fn display_verdict(&mut self, submission: &str, outcome: ValidationOutcome, lives: u32) {
        self.print_or_log(&[format_verdict(submission, outcome, lives)]);
        if outcome == ValidationOutcome::Rejected {
            let _ = self.redraw_input();
        }
    }

    fn display_timeout(&mut self, report: &TimeoutReport) {
        self.print_or_log(&[format_timeout(report)]);
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        self.print_or_log(&format_game_over(summary));
    }
}

impl<W: Write> Drop for CliInterface<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = execute!(self.out, DisableBracketedPaste);
            let _ = disable_raw_mode();
        }
    }
}
