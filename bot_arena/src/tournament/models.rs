//! Event data models.

use crate::{
    game::{GameType, MatchResult, MatchSettings},
    scoring::{BotRanking, Standings, TournamentStatistics},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tournament ID type
pub type TournamentId = Uuid;

/// Label of the playoff group
pub const FINALS_LABEL: &str = "Finals";

/// Label of the match that separates two level finalists
pub const FINALS_TIEBREAK_LABEL: &str = "Finals-tiebreak";

/// Stage number recorded when a bot goes out in the group stage
pub const GROUP_STAGE_ROUND: u32 = 1;

/// Stage number recorded when a bot goes out in the playoffs
pub const PLAYOFF_ROUND: u32 = 2;

/// Event stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Round-robin inside each seeded group
    GroupStage,
    /// Round-robin among group finalists
    PlayoffGroups,
}

/// Event lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    Pending,
    InProgress,
    Completed,
}

/// A labelled set of bots that play each other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub bots: Vec<String>,
}

impl Group {
    pub fn new(label: impl Into<String>, bots: Vec<String>) -> Self {
        Self {
            label: label.into(),
            bots,
        }
    }
}

/// Playoff structure, filled in once the group stage ends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Bots that advanced, grouped by the group they came from
    pub advanced: Vec<Group>,
    pub finals: Option<Group>,
    /// Whether a finals tiebreak match decided the champion
    pub tiebreak_played: bool,
}

/// Event configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub game_type: GameType,
    pub settings: MatchSettings,
    /// Matches allowed to run at once within a batch
    pub max_parallel_matches: usize,
    pub group_count: usize,
    pub finalists_per_group: usize,
    /// Seed for group seeding and role coin flips
    pub seed: u64,
}

impl TournamentConfig {
    /// Create a configuration with the usual bracket shape
    pub fn new(game_type: GameType, settings: MatchSettings) -> Self {
        let seed = settings.seed;
        Self {
            game_type,
            settings,
            max_parallel_matches: 4,
            group_count: 4,
            finalists_per_group: 2,
            seed,
        }
    }

    pub fn with_groups(mut self, group_count: usize, finalists_per_group: usize) -> Self {
        self.group_count = group_count;
        self.finalists_per_group = finalists_per_group;
        self
    }

    pub fn with_parallelism(mut self, max_parallel_matches: usize) -> Self {
        self.max_parallel_matches = max_parallel_matches;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.settings.seed = seed;
        self
    }

    /// Check the configuration before any match is scheduled
    pub fn validate(&self) -> Result<(), String> {
        if self.settings.rounds == 0 {
            return Err("Rounds per match must be at least 1".to_string());
        }

        if self.settings.move_timeout.is_zero() {
            return Err("Move timeout must be greater than 0".to_string());
        }

        if self.max_parallel_matches == 0 {
            return Err("Max parallel matches must be at least 1".to_string());
        }

        if self.group_count == 0 {
            return Err("Group count must be at least 1".to_string());
        }

        if self.finalists_per_group == 0 {
            return Err("Finalists per group must be at least 1".to_string());
        }

        Ok(())
    }
}

/// Full state of one event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub id: TournamentId,
    pub game_type: GameType,
    pub config: TournamentConfig,
    /// Roster team names in registration order
    pub bots: Vec<String>,
    pub groups: Vec<Group>,
    pub stage: Stage,
    pub status: TournamentStatus,
    pub bracket: Bracket,
    /// Scheduling batches started so far
    pub current_round: u32,
    pub total_rounds: u32,
    /// Every recorded match, in recording order
    pub match_results: Vec<MatchResult>,
    pub standings: Standings,
    /// Final placements, filled in on completion
    pub rankings: Vec<BotRanking>,
    pub statistics: Option<TournamentStatistics>,
    pub champion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TournamentInfo {
    pub fn new(config: TournamentConfig, bots: Vec<String>, groups: Vec<Group>) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_type: config.game_type,
            config,
            bots,
            groups,
            stage: Stage::GroupStage,
            status: TournamentStatus::Pending,
            bracket: Bracket::default(),
            current_round: 0,
            total_rounds: 0,
            match_results: Vec::new(),
            standings: Standings::new(),
            rankings: Vec::new(),
            statistics: None,
            champion: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TournamentStatus::Completed
    }

    /// Recorded matches of one group or stage label
    pub fn matches_labelled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a MatchResult> {
        self.match_results
            .iter()
            .filter(move |result| result.group_label.as_deref() == Some(label))
    }

    /// Final placement of `bot`, once the event is completed
    pub fn placement_of(&self, bot: &str) -> Option<usize> {
        self.rankings
            .iter()
            .find(|ranking| ranking.bot_name == bot)
            .map(|ranking| ranking.final_placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> TournamentConfig {
        TournamentConfig::new(
            GameType::Rpsls,
            MatchSettings::new(5, Duration::from_millis(100)),
        )
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(config().with_groups(0, 2).validate().is_err());
        assert!(config().with_groups(2, 0).validate().is_err());
        assert!(config().with_parallelism(0).validate().is_err());

        let mut no_rounds = config();
        no_rounds.settings.rounds = 0;
        assert!(no_rounds.validate().is_err());

        let mut no_timeout = config();
        no_timeout.settings.move_timeout = Duration::ZERO;
        assert!(no_timeout.validate().is_err());
    }

    #[test]
    fn test_with_seed_reaches_match_settings() {
        let config = config().with_seed(99);
        assert_eq!(config.seed, 99);
        assert_eq!(config.settings.seed, 99);
    }

    #[test]
    fn test_new_info_is_pending() {
        let info = TournamentInfo::new(config(), vec!["A".into(), "B".into()], Vec::new());
        assert_eq!(info.status, TournamentStatus::Pending);
        assert_eq!(info.stage, Stage::GroupStage);
        assert!(info.champion.is_none());
        assert!(!info.is_completed());
    }
}
