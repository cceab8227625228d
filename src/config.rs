use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_WPP: u32 = 100;
pub const DEFAULT_INITIAL_LIVES: u32 = 2;
pub const DEFAULT_MAX_LIVES: u32 = 3;
pub const DEFAULT_ROUND_TIMEOUT_SECS: u64 = 5;

/// Session parameters, fixed for the lifetime of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Minimum prompt frequency for a prompt to be drawn.
    pub wpp: u32,
    pub initial_lives: u32,
    pub max_lives: u32,
    pub round_timeout: Duration,
    /// Seeds the prompt shuffle and example sampling. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            wpp: DEFAULT_WPP,
            initial_lives: DEFAULT_INITIAL_LIVES,
            max_lives: DEFAULT_MAX_LIVES,
            round_timeout: Duration::from_secs(DEFAULT_ROUND_TIMEOUT_SECS),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.max_lives < self.initial_lives {
            return Err(ConfigError::MaxBelowInitial {
                initial: self.initial_lives,
                max: self.max_lives,
            });
        }
        if self.round_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.wpp, 100);
        assert_eq!(config.initial_lives, 2);
        assert_eq!(config.max_lives, 3);
        assert_eq!(config.round_timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_initial_lives_rejected() {
        let config = GameConfig {
            initial_lives: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoLives));
    }

    #[test]
    fn test_max_lives_below_initial_rejected() {
        let config = GameConfig {
            initial_lives: 4,
            max_lives: 3,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MaxBelowInitial { initial: 4, max: 3 })
        );
    }

    #[test]
    fn test_max_lives_equal_to_initial_allowed() {
        let config = GameConfig {
            initial_lives: 3,
            max_lives: 3,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = GameConfig {
            round_timeout: Duration::ZERO,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}
