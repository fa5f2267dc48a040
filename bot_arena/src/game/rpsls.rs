//! Rock-Paper-Scissors-Lizard-Spock.
//!
//! Each move defeats exactly two others. Identical moves draw the round.
//! Match score is the number of rounds won.

use super::{
    engine::{Answer, GameEngine, MatchRecorder, MatchSettings, ask, default_winner, ensure_active},
    entities::{GameType, MatchResult, Side},
    errors::GameResult,
};
use crate::{
    bot::{handle::BotHandle, state::RoundResult},
    cancel::CancellationToken,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum RpslsMove {
    Rock,
    Paper,
    Scissors,
    Lizard,
    Spock,
}

impl RpslsMove {
    pub const ALL: [RpslsMove; 5] = [
        Self::Rock,
        Self::Paper,
        Self::Scissors,
        Self::Lizard,
        Self::Spock,
    ];

    /// The two moves this move defeats
    pub fn defeats(self) -> [RpslsMove; 2] {
        match self {
            Self::Rock => [Self::Scissors, Self::Lizard],
            Self::Paper => [Self::Rock, Self::Spock],
            Self::Scissors => [Self::Paper, Self::Lizard],
            Self::Lizard => [Self::Spock, Self::Paper],
            Self::Spock => [Self::Scissors, Self::Rock],
        }
    }

    pub fn beats(self, other: RpslsMove) -> bool {
        self.defeats().contains(&other)
    }

    /// Round result for `self` against `other`
    pub fn against(self, other: RpslsMove) -> RoundResult {
        if self == other {
            RoundResult::Draw
        } else if self.beats(other) {
            RoundResult::Win
        } else {
            RoundResult::Loss
        }
    }
}

impl fmt::Display for RpslsMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for RpslsMove {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rock" => Ok(Self::Rock),
            "paper" => Ok(Self::Paper),
            "scissors" => Ok(Self::Scissors),
            "lizard" => Ok(Self::Lizard),
            "spock" => Ok(Self::Spock),
            _ => Err(format!("invalid move '{s}'")),
        }
    }
}

fn parse_move(raw: String) -> Result<RpslsMove, String> {
    raw.parse()
}

/// RPSLS referee
#[derive(Debug, Clone, Copy, Default)]
pub struct RpslsEngine;

#[async_trait]
impl GameEngine for RpslsEngine {
    fn game_type(&self) -> GameType {
        GameType::Rpsls
    }

    async fn execute(
        &self,
        bot1: &dyn BotHandle,
        bot2: &dyn BotHandle,
        settings: &MatchSettings,
        cancel: &CancellationToken,
    ) -> GameResult<MatchResult> {
        let (name1, name2) = (bot1.team_name(), bot2.team_name());
        let mut recorder = MatchRecorder::new(name1, name2, GameType::Rpsls, settings.rounds);
        let aux = BTreeMap::new();

        for round in 1..=settings.rounds {
            ensure_active(cancel)?;

            let view1 = recorder.view(Side::Player1, round, settings.rounds, &aux);
            let view2 = recorder.view(Side::Player2, round, settings.rounds, &aux);
            let (answer1, answer2) = tokio::join!(
                ask(settings, cancel, bot1.make_move(&view1, cancel), parse_move),
                ask(settings, cancel, bot2.make_move(&view2, cancel), parse_move),
            );
            let (answer1, answer2) = (answer1?, answer2?);
            recorder.note(Side::Player1, round, &answer1);
            recorder.note(Side::Player2, round, &answer2);

            let result1 = match (&answer1, &answer2) {
                (Answer::Valid(move1), Answer::Valid(move2)) => move1.against(*move2),
                _ => match default_winner(&answer1, &answer2, name1, name2, round) {
                    Side::Player1 => RoundResult::Win,
                    Side::Player2 => RoundResult::Loss,
                },
            };
            match result1 {
                RoundResult::Win => recorder.award(Side::Player1, 1),
                RoundResult::Loss => recorder.award(Side::Player2, 1),
                RoundResult::Draw => {}
            }

            recorder.complete_round(
                round,
                answer1.describe(RpslsMove::to_string),
                answer2.describe(RpslsMove::to_string),
                result1,
                (None, None),
            );
        }

        Ok(recorder.finish())
    }
}
