//! Series data models.

use crate::{game::GameType, tournament::TournamentInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Series ID type
pub type SeriesId = Uuid;

/// One bot's totals across every completed event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStanding {
    pub bot_name: String,
    /// 1-based, assigned after sorting
    pub placement: usize,
    pub total_series_score: i32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub total_draws: u32,
    /// Events finished in first place
    pub tournaments_won: u32,
    pub events_participated: u32,
    pub scores_by_game: BTreeMap<GameType, i32>,
}

impl SeriesStanding {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            ..Self::default()
        }
    }
}

/// Full state of a series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub id: SeriesId,
    /// Games to play, in order
    pub game_types: Vec<GameType>,
    /// Completed events, in the order they ran
    pub events: Vec<TournamentInfo>,
    pub standings: Vec<SeriesStanding>,
    pub champion: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SeriesInfo {
    pub fn new(game_types: Vec<GameType>) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_types,
            events: Vec::new(),
            standings: Vec::new(),
            champion: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Standing of `bot`, if it has played a completed event
    pub fn standing_of(&self, bot: &str) -> Option<&SeriesStanding> {
        self.standings.iter().find(|standing| standing.bot_name == bot)
    }
}
