//! Runner configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use bot_arena::{ArenaConfig, GameType};
use std::time::Duration;

/// Complete runner configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Arena settings handed to the series
    pub arena: ArenaConfig,
    /// Capacity of the lifecycle event channel
    pub event_buffer: usize,
    /// Matches slower than this are logged as warnings
    pub slow_match_ms: u64,
}

impl RunnerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `games_override` - Optional comma-separated game list (from CLI args)
    /// * `seed_override` - Optional seed override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<RunnerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if the game list names an unknown game
    pub fn from_env(
        games_override: Option<String>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let defaults = ArenaConfig::default();
        let mut arena = ArenaConfig {
            move_timeout: Duration::from_millis(parse_env_or(
                "ARENA_MOVE_TIMEOUT_MS",
                defaults.move_timeout.as_millis() as u64,
            )),
            max_parallel_matches: parse_env_or(
                "ARENA_MAX_PARALLEL",
                defaults.max_parallel_matches,
            ),
            group_count: parse_env_or("ARENA_GROUP_COUNT", defaults.group_count),
            finalists_per_group: parse_env_or(
                "ARENA_FINALISTS_PER_GROUP",
                defaults.finalists_per_group,
            ),
            memory_limit_mb: parse_env_or("ARENA_MEMORY_LIMIT_MB", defaults.memory_limit_mb),
            max_source_bytes: parse_env_or("ARENA_MAX_SOURCE_BYTES", defaults.max_source_bytes),
            seed: seed_override.unwrap_or_else(|| parse_env_or("ARENA_SEED", defaults.seed)),
            ..defaults
        };

        for (var, game_type) in [
            ("ARENA_RPSLS_ROUNDS", GameType::Rpsls),
            ("ARENA_BLOTTO_ROUNDS", GameType::ColonelBlotto),
            ("ARENA_PENALTY_ROUNDS", GameType::PenaltyKicks),
            ("ARENA_SECURITY_ROUNDS", GameType::SecurityGame),
        ] {
            let rounds = parse_env_or(var, arena.rounds_for(game_type));
            arena.max_rounds.insert(game_type, rounds);
        }

        if let Some(games) = games_override.or_else(|| std::env::var("ARENA_GAMES").ok()) {
            arena.game_types = parse_games(&games)?;
        }

        Ok(RunnerConfig {
            arena,
            event_buffer: parse_env_or("ARENA_EVENT_BUFFER", 1024),
            slow_match_ms: parse_env_or("ARENA_SLOW_MATCH_MS", 1000),
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_buffer == 0 {
            return Err(ConfigError::Invalid {
                var: "ARENA_EVENT_BUFFER".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        self.arena.validate()?;
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Arena(#[from] bot_arena::ConfigError),
}

/// Parse a comma-separated list of game names
fn parse_games(raw: &str) -> Result<Vec<GameType>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<GameType>().map_err(|err| ConfigError::Invalid {
                var: "ARENA_GAMES".to_string(),
                reason: err.to_string(),
            })
        })
        .collect()
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
