// Library interface for bomb-party
// This allows integration tests to access internal modules

pub mod cli;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod game_state;
pub mod input;
pub mod logging;
pub mod pool;
pub mod tui;

// Re-export commonly used items for easier testing
pub use config::GameConfig;
pub use corpus::{
    Prompt, build_prompts, load_dictionary_from_file, load_dictionary_from_str,
    load_prompts_from_file, load_prompts_from_str, write_prompts_to_file,
};
pub use engine::{LetterSet, RoundEngine, ValidationOutcome};
pub use error::{ConfigError, CorpusError, GameError};
pub use game_state::{
    GameInterface, GameOutcome, GameSummary, RoundInfo, TimeoutReport, UserAction, game_loop,
};
pub use pool::PromptPool;
