use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

use super::errors::GameError;

/// Supported game types
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum GameType {
    Rpsls,
    ColonelBlotto,
    PenaltyKicks,
    SecurityGame,
}

impl GameType {
    pub const ALL: [GameType; 4] = [
        Self::Rpsls,
        Self::ColonelBlotto,
        Self::PenaltyKicks,
        Self::SecurityGame,
    ];
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Rpsls => "RPSLS",
            Self::ColonelBlotto => "ColonelBlotto",
            Self::PenaltyKicks => "PenaltyKicks",
            Self::SecurityGame => "SecurityGame",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for GameType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "rpsls" => Ok(Self::Rpsls),
            "blotto" | "colonelblotto" => Ok(Self::ColonelBlotto),
            "penalty" | "penaltykicks" => Ok(Self::PenaltyKicks),
            "security" | "securitygame" => Ok(Self::SecurityGame),
            _ => Err(GameError::UnsupportedGameType(s.to_string())),
        }
    }
}

/// Which seat a bot occupies in a match
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }
}

/// Final outcome of a match
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MatchOutcome {
    Player1Wins,
    Player2Wins,
    Draw,
    /// Player 1 could not take part; player 2 wins
    Player1Error,
    /// Player 2 could not take part; player 1 wins
    Player2Error,
    /// Neither bot produced a usable answer
    BothError,
}

impl MatchOutcome {
    /// Outcome won by `side`
    pub fn win_for(side: Side) -> Self {
        match side {
            Side::Player1 => Self::Player1Wins,
            Side::Player2 => Self::Player2Wins,
        }
    }

    /// Side credited with the win, if any
    pub fn winner(self) -> Option<Side> {
        match self {
            Self::Player1Wins | Self::Player2Error => Some(Side::Player1),
            Self::Player2Wins | Self::Player1Error => Some(Side::Player2),
            Self::Draw | Self::BothError => None,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Immutable record of one refereed match
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MatchResult {
    pub bot1_name: String,
    pub bot2_name: String,
    pub game_type: GameType,
    pub outcome: MatchOutcome,
    pub bot1_score: i32,
    pub bot2_score: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: Duration,
    pub rounds_played: u32,
    /// Human-readable trace, in order
    pub match_log: Vec<String>,
    /// Per-round faults, timeouts and invalid answers, in order
    pub errors: Vec<String>,
    /// Group or stage label; labels containing "tiebreak" mark placement tiebreaks
    pub group_label: Option<String>,
}

impl MatchResult {
    /// Team name of the winner, if the match has one
    pub fn winner_name(&self) -> Option<&str> {
        self.outcome.winner().map(|side| self.name_of(side))
    }

    /// Team name of the loser, if the match has one
    pub fn loser_name(&self) -> Option<&str> {
        self.outcome.winner().map(|side| self.name_of(side.other()))
    }

    pub fn name_of(&self, side: Side) -> &str {
        match side {
            Side::Player1 => &self.bot1_name,
            Side::Player2 => &self.bot2_name,
        }
    }

    /// Whether this match only breaks a placement tie
    pub fn is_tiebreak(&self) -> bool {
        self.group_label
            .as_deref()
            .is_some_and(|label| label.to_lowercase().contains("tiebreak"))
    }

    /// Attach a group label
    pub fn with_group_label(mut self, label: impl Into<String>) -> Self {
        self.group_label = Some(label.into());
        self
    }

    /// Whether `team` played in this match
    pub fn involves(&self, team: &str) -> bool {
        self.bot1_name == team || self.bot2_name == team
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: MatchOutcome, label: Option<&str>) -> MatchResult {
        let now = Utc::now();
        MatchResult {
            bot1_name: "Alpha".to_string(),
            bot2_name: "Beta".to_string(),
            game_type: GameType::Rpsls,
            outcome,
            bot1_score: 0,
            bot2_score: 0,
            start_time: now,
            end_time: now,
            duration: Duration::ZERO,
            rounds_played: 0,
            match_log: Vec::new(),
            errors: Vec::new(),
            group_label: label.map(str::to_string),
        }
    }

    #[test]
    fn test_game_type_parse_aliases() {
        assert_eq!("rpsls".parse::<GameType>().unwrap(), GameType::Rpsls);
        assert_eq!(
            "Colonel_Blotto".parse::<GameType>().unwrap(),
            GameType::ColonelBlotto
        );
        assert_eq!(
            "penalty-kicks".parse::<GameType>().unwrap(),
            GameType::PenaltyKicks
        );
        assert_eq!(
            " SecurityGame ".parse::<GameType>().unwrap(),
            GameType::SecurityGame
        );
    }

    #[test]
    fn test_game_type_parse_unknown() {
        let err = "chess".parse::<GameType>().unwrap_err();
        assert!(matches!(err, GameError::UnsupportedGameType(name) if name == "chess"));
    }

    #[test]
    fn test_winner_name_per_outcome() {
        assert_eq!(
            result(MatchOutcome::Player1Wins, None).winner_name(),
            Some("Alpha")
        );
        assert_eq!(
            result(MatchOutcome::Player2Wins, None).winner_name(),
            Some("Beta")
        );
        assert_eq!(
            result(MatchOutcome::Player1Error, None).winner_name(),
            Some("Beta")
        );
        assert_eq!(
            result(MatchOutcome::Player2Error, None).winner_name(),
            Some("Alpha")
        );
        assert_eq!(result(MatchOutcome::Draw, None).winner_name(), None);
        assert_eq!(result(MatchOutcome::BothError, None).winner_name(), None);
    }

    #[test]
    fn test_is_tiebreak_case_insensitive() {
        assert!(result(MatchOutcome::Draw, Some("Finals-TieBreak")).is_tiebreak());
        assert!(!result(MatchOutcome::Draw, Some("Group A")).is_tiebreak());
        assert!(!result(MatchOutcome::Draw, None).is_tiebreak());
    }
}
