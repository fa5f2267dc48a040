//! Per-bot view of a match in progress.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Auxiliary key holding the bot's role in asymmetric games
pub const ROLE_KEY: &str = "Role";

/// Result of a single round from one bot's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    Win,
    Loss,
    Draw,
}

impl RoundResult {
    /// The same round seen from the opponent's side
    pub fn flipped(self) -> Self {
        match self {
            Self::Win => Self::Loss,
            Self::Loss => Self::Win,
            Self::Draw => Self::Draw,
        }
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Draw => "draw",
        };
        write!(f, "{repr}")
    }
}

/// One completed round as remembered by a single bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number (1-indexed)
    pub round: u32,
    /// What this bot submitted (or a fault marker)
    pub my_move: String,
    /// What the opponent submitted (or a fault marker)
    pub opponent_move: String,
    /// Round result for this bot
    pub result: RoundResult,
    /// Role played this round, for asymmetric games
    pub role: Option<String>,
}

/// Game state handed to a bot on every capability call.
///
/// History is scoped to the current match and only ever contains this
/// bot's own perspective.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Round being requested (1-indexed)
    pub current_round: u32,
    /// Rounds in this match
    pub max_rounds: u32,
    /// Game-specific key/value pairs (role, troop totals, target values)
    pub state: BTreeMap<String, String>,
    /// Prior rounds of this match, oldest first
    pub round_history: Vec<RoundRecord>,
}

impl GameState {
    /// Look up an auxiliary value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.state.get(key).map(String::as_str)
    }

    /// The bot's role in asymmetric games
    pub fn role(&self) -> Option<&str> {
        self.get(ROLE_KEY)
    }

    /// Most recent completed round, if any
    pub fn last_round(&self) -> Option<&RoundRecord> {
        self.round_history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_result_flipped() {
        assert_eq!(RoundResult::Win.flipped(), RoundResult::Loss);
        assert_eq!(RoundResult::Loss.flipped(), RoundResult::Win);
        assert_eq!(RoundResult::Draw.flipped(), RoundResult::Draw);
    }

    #[test]
    fn test_state_lookup() {
        let mut state = GameState::default();
        state
            .state
            .insert(ROLE_KEY.to_string(), "Shooter".to_string());

        assert_eq!(state.role(), Some("Shooter"));
        assert_eq!(state.get("Missing"), None);
        assert!(state.last_round().is_none());
    }
}
