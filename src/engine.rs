//! Round engine: prompt draws, answer validation and life bookkeeping.

use crate::config::GameConfig;
use crate::corpus::Prompt;
use crate::debug_log;
use crate::error::GameError;
use crate::pool::PromptPool;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::fmt;

const ALPHABET_LEN: u32 = 26;
const FULL_ALPHABET: u32 = (1 << ALPHABET_LEN) - 1;

/// Set of lowercase ASCII letters, one bit per letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LetterSet(u32);

impl LetterSet {
    pub const fn full() -> Self {
        Self(FULL_ALPHABET)
    }

    pub const fn empty() -> Self {
        Self(0)
    }

    fn bit(letter: char) -> Option<u32> {
        let lower = letter.to_ascii_lowercase();
        lower
            .is_ascii_lowercase()
            .then(|| 1 << (lower as u32 - 'a' as u32))
    }

    pub fn contains(self, letter: char) -> bool {
        Self::bit(letter).is_some_and(|bit| self.0 & bit != 0)
    }

    /// Removes every letter of `word`; anything outside `a..=z` is ignored.
    pub fn remove_letters_of(&mut self, word: &str) {
        for bit in word.chars().filter_map(Self::bit) {
            self.0 &= !bit;
        }
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Letters in alphabetical order.
    pub fn iter(self) -> impl Iterator<Item = char> {
        ('a'..='z').filter(move |&letter| self.contains(letter))
    }
}

impl FromIterator<char> for LetterSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self(iter.into_iter().filter_map(Self::bit).fold(0, |set, bit| set | bit))
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|letter| write!(f, "{letter}"))
    }
}

/// Verdict for one submitted word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Accepted, and it completed the alphabet while below the life cap.
    NewLife,
    Accepted,
    Rejected,
}

/// Owns all mutable game state for a session.
#[derive(Debug)]
pub struct RoundEngine {
    dictionary: HashSet<String>,
    pool: PromptPool,
    lives: u32,
    max_lives: u32,
    used_prompts: HashSet<String>,
    remaining_letters: LetterSet,
    rng: StdRng,
}

impl RoundEngine {
    /// Builds an engine seeded from `config.seed`, or from entropy when unset.
    pub fn new(words: Vec<String>, prompts: Vec<Prompt>, config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(words, prompts, config, rng)
    }

    pub fn with_rng(
        words: Vec<String>,
        prompts: Vec<Prompt>,
        config: &GameConfig,
        mut rng: StdRng,
    ) -> Self {
        let pool = PromptPool::new(prompts, config.wpp, &mut rng);
        debug_log!(
            "RoundEngine::with_rng() - {} words, {} eligible prompts (wpp >= {})",
            words.len(),
            pool.len(),
            config.wpp
        );
        Self {
            dictionary: words.into_iter().map(|w| w.to_lowercase()).collect(),
            pool,
            lives: config.initial_lives,
            max_lives: config.max_lives,
            used_prompts: HashSet::new(),
            remaining_letters: LetterSet::full(),
            rng,
        }
    }

    /// Draws the next prompt and marks its text as used.
    pub fn next_prompt(&mut self) -> Result<Prompt, GameError> {
        let prompt = self.pool.draw().cloned().ok_or(GameError::OutOfPrompts)?;
        self.used_prompts.insert(prompt.text().to_string());
        Ok(prompt)
    }

    /// Checks `submission` against `prompt_text` and updates the letter bonus.
    ///
    /// A word is accepted when it is not a used prompt text, contains the
    /// prompt (ignoring case) and is in the dictionary. Rejections leave the
    /// state untouched.
    pub fn validate(&mut self, submission: &str, prompt_text: &str) -> ValidationOutcome {
        let word = submission.to_lowercase();
        let accepted = !self.used_prompts.contains(&word)
            && word.contains(&prompt_text.to_lowercase())
            && self.dictionary.contains(&word);
        if !accepted {
            return ValidationOutcome::Rejected;
        }

        self.remaining_letters.remove_letters_of(&word);
        if !self.remaining_letters.is_empty() {
            return ValidationOutcome::Accepted;
        }

        self.remaining_letters = LetterSet::full();
        if self.lives == self.max_lives {
            return ValidationOutcome::Accepted;
        }
        self.lives += 1;
        ValidationOutcome::NewLife
    }

    /// Takes one life. Reaching zero is terminal for the session.
    pub fn lose_life(&mut self) -> Result<(), GameError> {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            return Err(GameError::OutOfLives);
        }
        Ok(())
    }

    /// Up to `count` distinct example words of `prompt`, in random order.
    pub fn sample_examples(&mut self, prompt: &Prompt, count: usize) -> Vec<String> {
        prompt
            .examples()
            .choose_multiple(&mut self.rng, count)
            .cloned()
            .collect()
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    pub fn remaining_letters(&self) -> LetterSet {
        self.remaining_letters
    }

    pub fn used_prompts(&self) -> &HashSet<String> {
        &self.used_prompts
    }

    pub fn prompts_remaining(&self) -> usize {
        self.pool.remaining()
    }
}
