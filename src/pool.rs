use crate::corpus::Prompt;
use rand::Rng;
use rand::seq::SliceRandom;

/// Prompts eligible for a session, shuffled once and drawn without replacement.
#[derive(Debug, Clone)]
pub struct PromptPool {
    prompts: Vec<Prompt>,
    cursor: usize,
}

impl PromptPool {
    /// Keeps the prompts with `frequency >= wpp` and shuffles them.
    pub fn new<R: Rng + ?Sized>(prompts: Vec<Prompt>, wpp: u32, rng: &mut R) -> Self {
        let mut prompts: Vec<Prompt> = prompts
            .into_iter()
            .filter(|prompt| prompt.frequency() >= wpp)
            .collect();
        prompts.shuffle(rng);
        Self { prompts, cursor: 0 }
    }

    pub fn draw(&mut self) -> Option<&Prompt> {
        let prompt = self.prompts.get(self.cursor)?;
        self.cursor += 1;
        Some(prompt)
    }

    /// Prompts not drawn yet.
    pub fn remaining(&self) -> usize {
        self.prompts.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}
