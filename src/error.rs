use std::path::PathBuf;

use thiserror::Error;

/// Terminal conditions raised by the round engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("ran out of prompts")]
    OutOfPrompts,
    #[error("out of lives")]
    OutOfLives,
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed prompt corpus: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("initial lives must be at least 1")]
    NoLives,
    #[error("max lives ({max}) must be at least the initial lives ({initial})")]
    MaxBelowInitial { initial: u32, max: u32 },
    #[error("round timeout must be greater than zero")]
    ZeroTimeout,
}
