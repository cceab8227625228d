use crate::corpus::Prompt;
use crate::engine::{LetterSet, RoundEngine, ValidationOutcome};
use crate::error::GameError;
use crate::{debug_log, info_log};
use std::fmt;
use std::io;
use std::time::{Duration, Instant};

/// How long a single input poll may wait before the deadline is re-checked.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Example words shown when a round times out.
pub const TIMEOUT_EXAMPLES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Submit(String),
    Exit,
}

/// What the player sees when a round begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundInfo {
    pub round: usize,
    pub prompt: String,
    pub lives: u32,
    pub max_lives: u32,
    pub remaining_letters: LetterSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutReport {
    pub prompt: String,
    pub frequency: u32,
    pub examples: Vec<String>,
    /// Lives left after the penalty.
    pub lives: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    OutOfLives,
    OutOfPrompts,
    Quit,
}

impl From<GameError> for GameOutcome {
    fn from(error: GameError) -> Self {
        match error {
            GameError::OutOfLives => Self::OutOfLives,
            GameError::OutOfPrompts => Self::OutOfPrompts,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::OutOfLives => "Out of lives",
            Self::OutOfPrompts => "Ran out of prompts",
            Self::Quit => "Quit",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub outcome: GameOutcome,
    pub rounds: usize,
    pub accepted: usize,
    pub lives_gained: u32,
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. Rounds played: {}, words accepted: {}, lives gained: {}",
            self.outcome, self.rounds, self.accepted, self.lives_gained
        )
    }
}

/// Front end the round loop talks to. Implemented by the line-oriented CLI,
/// the full-screen TUI, and scripted players in tests.
pub trait GameInterface {
    fn display_round_start(&mut self, info: &RoundInfo);

    /// Waits at most `timeout` for a complete line or a quit request.
    /// Must not block past `timeout`.
    fn poll_action(&mut self, timeout: Duration) -> io::Result<Option<UserAction>>;

    /// Called on every poll with the time left in the round.
    fn display_countdown(&mut self, _remaining: Duration) {}

    fn display_verdict(&mut self, submission: &str, outcome: ValidationOutcome, lives: u32);

    fn display_timeout(&mut self, report: &TimeoutReport);

    fn display_game_over(&mut self, summary: &GameSummary);
}

enum RoundResult {
    Solved(ValidationOutcome),
    TimedOut,
    Quit,
}

/// Plays rounds until the player runs out of lives, the pool runs dry, or
/// the player quits.
pub fn game_loop<I: GameInterface + ?Sized>(
    engine: &mut RoundEngine,
    interface: &mut I,
    round_timeout: Duration,
) -> io::Result<GameSummary> {
    let mut rounds = 0;
    let mut accepted = 0;
    let mut lives_gained = 0;

    let outcome = loop {
        let prompt = match engine.next_prompt() {
            Ok(prompt) => prompt,
            Err(error) => {
                info_log!("game_loop() - {}", error);
                break GameOutcome::from(error);
            }
        };
        rounds += 1;
        info_log!(
            "game_loop() - Round {} prompt '{}' (wpp {})",
            rounds,
            prompt.text(),
            prompt.frequency()
        );

        interface.display_round_start(&RoundInfo {
            round: rounds,
            prompt: prompt.text().to_string(),
            lives: engine.lives(),
            max_lives: engine.max_lives(),
            remaining_letters: engine.remaining_letters(),
        });

        match play_round(engine, interface, &prompt, round_timeout)? {
            RoundResult::Solved(outcome) => {
                accepted += 1;
                if outcome == ValidationOutcome::NewLife {
                    lives_gained += 1;
                }
            }
            RoundResult::Quit => break GameOutcome::Quit,
            RoundResult::TimedOut => {
                let examples = engine.sample_examples(&prompt, TIMEOUT_EXAMPLES);
                let lost = engine.lose_life();
                interface.display_timeout(&TimeoutReport {
                    prompt: prompt.text().to_string(),
                    frequency: prompt.frequency(),
                    examples,
                    lives: engine.lives(),
                });
                if let Err(error) = lost {
                    info_log!("game_loop() - {}", error);
                    break GameOutcome::from(error);
                }
            }
        }
    };

    let summary = GameSummary {
        outcome,
        rounds,
        accepted,
        lives_gained,
    };
    interface.display_game_over(&summary);
    Ok(summary)
}

/// Polls for submissions until one is accepted or the deadline passes.
/// Rejected words leave the deadline untouched.
fn play_round<I: GameInterface + ?Sized>(
    engine: &mut RoundEngine,
    interface: &mut I,
    prompt: &Prompt,
    round_timeout: Duration,
) -> io::Result<RoundResult> {
    let deadline = Instant::now() + round_timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            debug_log!("play_round() - '{}' timed out", prompt.text());
            return Ok(RoundResult::TimedOut);
        }
        interface.display_countdown(remaining);

        match interface.poll_action(remaining.min(POLL_INTERVAL))? {
            None => {}
            Some(UserAction::Exit) => return Ok(RoundResult::Quit),
            Some(UserAction::Submit(line)) => {
                let word = line.trim();
                let outcome = engine.validate(word, prompt.text());
                debug_log!("play_round() - '{}' -> {:?}", word, outcome);
                interface.display_verdict(word, outcome, engine.lives());
                if outcome != ValidationOutcome::Rejected {
                    return Ok(RoundResult::Solved(outcome));
                }
            }
        }
    }
}
