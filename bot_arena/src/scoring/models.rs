//! Standings, rankings and statistics models.

use crate::game::GameType;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

/// Case-folded form of a team name, used wherever names compare
/// case-insensitively
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Per-event standings keyed by team name
pub type Standings = BTreeMap<String, TournamentStanding>;

/// One bot's running totals within an event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentStanding {
    pub bot_name: String,
    /// Match points earned
    pub total_score: i32,
    /// Match points conceded to opponents
    pub total_opponent_score: i32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub matches_played: u32,
    /// Opponents faced, deduplicated case-insensitively
    pub opponents_played: BTreeSet<String>,
    pub elimination_round: Option<u32>,
    pub eliminated_by: Option<String>,
}

impl TournamentStanding {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            ..Self::default()
        }
    }

    /// Record `opponent` unless a case-insensitive match is already present
    pub fn record_opponent(&mut self, opponent: &str) {
        if !self.has_played(opponent) {
            self.opponents_played.insert(opponent.to_string());
        }
    }

    pub fn has_played(&self, opponent: &str) -> bool {
        let key = name_key(opponent);
        self.opponents_played
            .iter()
            .any(|name| name_key(name) == key)
    }

    pub fn is_eliminated(&self) -> bool {
        self.elimination_round.is_some()
    }

    /// Mark the bot as knocked out in `round` by `by`
    pub fn eliminate(&mut self, round: u32, by: impl Into<String>) {
        self.elimination_round = Some(round);
        self.eliminated_by = Some(by.into());
    }
}

/// Read-only placement snapshot derived from standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotRanking {
    /// 1-based
    pub final_placement: usize,
    pub bot_name: String,
    pub total_score: i32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub elimination_round: Option<u32>,
    pub eliminated_by: Option<String>,
}

impl BotRanking {
    pub(crate) fn from_standing(placement: usize, standing: &TournamentStanding) -> Self {
        Self {
            final_placement: placement,
            bot_name: standing.bot_name.clone(),
            total_score: standing.total_score,
            wins: standing.wins,
            losses: standing.losses,
            draws: standing.draws,
            elimination_round: standing.elimination_round,
            eliminated_by: standing.eliminated_by.clone(),
        }
    }
}

/// Aggregate figures for one event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentStatistics {
    pub total_matches: usize,
    pub total_rounds: u64,
    /// Wall-clock span of the event: start to finish when the orchestrator
    /// recorded both, otherwise first match start to last match end
    pub tournament_duration: Duration,
    pub average_match_duration: Duration,
    pub total_errors: usize,
    pub total_timeouts: usize,
    pub matches_by_game_type: BTreeMap<GameType, usize>,
    pub most_active_bot: Option<String>,
    pub highest_scoring_bot: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponents_dedup_case_insensitive() {
        let mut standing = TournamentStanding::new("Alpha");
        standing.record_opponent("Beta");
        standing.record_opponent("BETA");
        standing.record_opponent("Gamma");
        assert_eq!(standing.opponents_played.len(), 2);
        assert!(standing.has_played("beta"));
    }

    #[test]
    fn test_opponents_dedup_folds_non_ascii_letters() {
        let mut standing = TournamentStanding::new("Alpha");
        standing.record_opponent("Ödön");
        standing.record_opponent("ÖDÖN");
        assert_eq!(standing.opponents_played.len(), 1);
        assert!(standing.has_played("ödön"));
        assert_eq!(name_key("ÖDÖN"), name_key("ödön"));
    }

    #[test]
    fn test_eliminate() {
        let mut standing = TournamentStanding::new("Alpha");
        assert!(!standing.is_eliminated());
        standing.eliminate(1, "Beta");
        assert_eq!(standing.elimination_round, Some(1));
        assert_eq!(standing.eliminated_by.as_deref(), Some("Beta"));
    }
}
