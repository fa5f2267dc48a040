//! Arena configuration.
//!
//! Consolidates every tunable the orchestrators consume and validates it
//! before any match is played.

use crate::{
    game::{DEFAULT_MOVE_TIMEOUT, GameType, MatchSettings},
    tournament::TournamentConfig,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, time::Duration};
use thiserror::Error;

/// Upper bound on the default parallelism
pub const MAX_DEFAULT_PARALLELISM: usize = 8;

/// Default rounds per RPSLS match
pub const DEFAULT_RPSLS_ROUNDS: u32 = 50;

/// Default rounds per match for every other game
pub const DEFAULT_ROUNDS: u32 = 10;

/// Configuration error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("No game types configured")]
    NoGameTypes,
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Complete arena configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Deadline for each bot call
    pub move_timeout: Duration,
    /// Rounds per match, by game
    pub max_rounds: BTreeMap<GameType, u32>,
    /// Matches allowed to run at once within a batch
    pub max_parallel_matches: usize,
    pub group_count: usize,
    pub finalists_per_group: usize,
    /// Per-bot memory limit, enforced by the bot loader
    pub memory_limit_mb: u64,
    /// Maximum submitted source size, enforced by the bot loader
    pub max_source_bytes: u64,
    /// Games played by a series, in order
    pub game_types: Vec<GameType>,
    /// Base seed for group seeding and role coin flips
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        let max_rounds = GameType::ALL
            .into_iter()
            .map(|game_type| {
                let rounds = match game_type {
                    GameType::Rpsls => DEFAULT_RPSLS_ROUNDS,
                    _ => DEFAULT_ROUNDS,
                };
                (game_type, rounds)
            })
            .collect();

        Self {
            move_timeout: DEFAULT_MOVE_TIMEOUT,
            max_rounds,
            max_parallel_matches: default_parallelism(),
            group_count: 4,
            finalists_per_group: 2,
            memory_limit_mb: 512,
            max_source_bytes: 1024 * 1024,
            game_types: GameType::ALL.to_vec(),
            seed: 0,
        }
    }
}

/// Host parallelism capped at [`MAX_DEFAULT_PARALLELISM`]
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_DEFAULT_PARALLELISM)
}

impl ArenaConfig {
    /// Rounds per match for `game_type`
    pub fn rounds_for(&self, game_type: GameType) -> u32 {
        self.max_rounds
            .get(&game_type)
            .copied()
            .unwrap_or(DEFAULT_ROUNDS)
    }

    /// Match settings for `game_type`
    pub fn match_settings(&self, game_type: GameType) -> MatchSettings {
        MatchSettings::new(self.rounds_for(game_type), self.move_timeout).with_seed(self.seed)
    }

    /// Event configuration for the series step at `index`.
    ///
    /// Each step gets its own seed so events differ but stay reproducible.
    pub fn tournament_config(&self, game_type: GameType, index: usize) -> TournamentConfig {
        TournamentConfig::new(game_type, self.match_settings(game_type))
            .with_groups(self.group_count, self.finalists_per_group)
            .with_parallelism(self.max_parallel_matches)
            .with_seed(self.seed.wrapping_add(index as u64))
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_timeout.is_zero() {
            return Err(ConfigError::invalid("move_timeout", "Must be greater than 0"));
        }

        if let Some((game_type, _)) = self.max_rounds.iter().find(|(_, rounds)| **rounds == 0) {
            return Err(ConfigError::invalid(
                "max_rounds",
                format!("{game_type} must play at least 1 round"),
            ));
        }

        if self.max_parallel_matches == 0 {
            return Err(ConfigError::invalid(
                "max_parallel_matches",
                "Must be at least 1",
            ));
        }

        if self.group_count == 0 {
            return Err(ConfigError::invalid("group_count", "Must be at least 1"));
        }

        if self.finalists_per_group == 0 {
            return Err(ConfigError::invalid(
                "finalists_per_group",
                "Must be at least 1",
            ));
        }

        if self.memory_limit_mb == 0 {
            return Err(ConfigError::invalid("memory_limit_mb", "Must be greater than 0"));
        }

        if self.max_source_bytes == 0 {
            return Err(ConfigError::invalid(
                "max_source_bytes",
                "Must be greater than 0",
            ));
        }

        if self.game_types.is_empty() {
            return Err(ConfigError::NoGameTypes);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ArenaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rounds_for(GameType::Rpsls), 50);
        assert_eq!(config.rounds_for(GameType::ColonelBlotto), 10);
        assert_eq!(config.game_types.len(), 4);
        assert!((1..=MAX_DEFAULT_PARALLELISM).contains(&config.max_parallel_matches));
    }

    #[test]
    fn test_zero_round_game_rejected() {
        let mut config = ArenaConfig::default();
        config.max_rounds.insert(GameType::PenaltyKicks, 0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "max_rounds"));
        assert!(err.to_string().contains("PenaltyKicks"));
    }

    #[test]
    fn test_empty_game_list_rejected() {
        let config = ArenaConfig {
            game_types: Vec::new(),
            ..ArenaConfig::default()
        };
        assert_eq!(config.validate().unwrap_err(), ConfigError::NoGameTypes);
    }

    #[test]
    fn test_zero_parallelism_rejected() {
        let config = ArenaConfig {
            max_parallel_matches: 0,
            ..ArenaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tournament_config_seed_per_step() {
        let config = ArenaConfig {
            seed: 10,
            ..ArenaConfig::default()
        };
        let first = config.tournament_config(GameType::Rpsls, 0);
        let third = config.tournament_config(GameType::SecurityGame, 2);
        assert_eq!(first.seed, 10);
        assert_eq!(third.seed, 12);
        assert_eq!(third.settings.seed, 12);
        assert_eq!(third.settings.rounds, 10);
        assert_eq!(first.finalists_per_group, config.finalists_per_group);
    }

    #[test]
    fn test_unknown_game_falls_back_to_default_rounds() {
        let mut config = ArenaConfig::default();
        config.max_rounds.clear();
        assert_eq!(config.rounds_for(GameType::Rpsls), DEFAULT_ROUNDS);
    }
}
