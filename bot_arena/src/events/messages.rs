//! Lifecycle notifications sent to the external publisher.

use crate::{
    game::{GameType, MatchResult},
    scoring::BotRanking,
    series::{SeriesId, SeriesStanding},
    tournament::{Stage, TournamentId},
};
use serde::{Deserialize, Serialize};

/// Notification emitted while a series or event runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArenaEvent {
    SeriesStarted {
        series_id: SeriesId,
        game_types: Vec<GameType>,
    },
    TournamentStarted {
        tournament_id: TournamentId,
        game_type: GameType,
        bots: Vec<String>,
    },
    RoundStarted {
        tournament_id: TournamentId,
        stage: Stage,
        round: u32,
        total_rounds: u32,
        matches: usize,
    },
    MatchCompleted {
        tournament_id: TournamentId,
        result: Box<MatchResult>,
    },
    StandingsUpdated {
        tournament_id: TournamentId,
        rankings: Vec<BotRanking>,
    },
    TournamentCompleted {
        tournament_id: TournamentId,
        game_type: GameType,
        champion: Option<String>,
    },
    SeriesStepCompleted {
        series_id: SeriesId,
        step: usize,
        total_steps: usize,
        game_type: GameType,
        champion: Option<String>,
    },
    SeriesStandingsUpdated {
        series_id: SeriesId,
        standings: Vec<SeriesStanding>,
    },
    SeriesCompleted {
        series_id: SeriesId,
        champion: Option<String>,
    },
}

impl ArenaEvent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SeriesStarted { .. } => "series_started",
            Self::TournamentStarted { .. } => "tournament_started",
            Self::RoundStarted { .. } => "round_started",
            Self::MatchCompleted { .. } => "match_completed",
            Self::StandingsUpdated { .. } => "standings_updated",
            Self::TournamentCompleted { .. } => "tournament_completed",
            Self::SeriesStepCompleted { .. } => "series_step_completed",
            Self::SeriesStandingsUpdated { .. } => "series_standings_updated",
            Self::SeriesCompleted { .. } => "series_completed",
        }
    }
}
