//! Penalty kicks.
//!
//! Roles are fixed for the whole match by a seeded coin flip. Both bots pick
//! `Left`, `Center` or `Right`; the shooter scores [`GOAL_POINTS`] when the
//! picks differ, the goalkeeper scores [`SAVE_POINTS`] when they match.

use super::{
    engine::{
        Answer, GameEngine, MatchRecorder, MatchSettings, ask, coin_flip, default_winner,
        ensure_active,
    },
    entities::{GameType, MatchResult, Side},
    errors::GameResult,
};
use crate::{
    bot::{
        handle::BotHandle,
        state::{ROLE_KEY, RoundResult},
    },
    cancel::CancellationToken,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Points for a goal
pub const GOAL_POINTS: i32 = 1;

/// Points for a save
pub const SAVE_POINTS: i32 = 2;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum PenaltyChoice {
    Left,
    Center,
    Right,
}

impl PenaltyChoice {
    pub const ALL: [PenaltyChoice; 3] = [Self::Left, Self::Center, Self::Right];
}

impl fmt::Display for PenaltyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for PenaltyChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(format!("invalid penalty decision '{s}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PenaltyRole {
    Shooter,
    Goalkeeper,
}

impl PenaltyRole {
    /// Points this role earns when it takes the round
    pub fn points(self) -> i32 {
        match self {
            Self::Shooter => GOAL_POINTS,
            Self::Goalkeeper => SAVE_POINTS,
        }
    }
}

impl fmt::Display for PenaltyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Roles of (player 1, player 2) for the whole match
pub fn assign_roles(settings: &MatchSettings, bot1: &str, bot2: &str) -> (PenaltyRole, PenaltyRole) {
    if coin_flip(settings, "penalty", bot1, bot2) {
        (PenaltyRole::Shooter, PenaltyRole::Goalkeeper)
    } else {
        (PenaltyRole::Goalkeeper, PenaltyRole::Shooter)
    }
}

fn parse_choice(raw: String) -> Result<PenaltyChoice, String> {
    raw.parse()
}

/// Penalty kicks referee
#[derive(Debug, Clone, Copy, Default)]
pub struct PenaltyEngine;

#[async_trait]
impl GameEngine for PenaltyEngine {
    fn game_type(&self) -> GameType {
        GameType::PenaltyKicks
    }

    async fn execute(
        &self,
        bot1: &dyn BotHandle,
        bot2: &dyn BotHandle,
        settings: &MatchSettings,
        cancel: &CancellationToken,
    ) -> GameResult<MatchResult> {
        let (name1, name2) = (bot1.team_name(), bot2.team_name());
        let mut recorder =
            MatchRecorder::new(name1, name2, GameType::PenaltyKicks, settings.rounds);

        let (role1, role2) = assign_roles(settings, name1, name2);
        recorder.log(format!("Roles: {name1}={role1} {name2}={role2}"));
        let aux_for = |role: PenaltyRole| {
            BTreeMap::from([
                (ROLE_KEY.to_string(), role.to_string()),
                ("GoalPoints".to_string(), GOAL_POINTS.to_string()),
                ("SavePoints".to_string(), SAVE_POINTS.to_string()),
            ])
        };
        let (aux1, aux2) = (aux_for(role1), aux_for(role2));

        for round in 1..=settings.rounds {
            ensure_active(cancel)?;

            let view1 = recorder.view(Side::Player1, round, settings.rounds, &aux1);
            let view2 = recorder.view(Side::Player2, round, settings.rounds, &aux2);
            let (answer1, answer2) = tokio::join!(
                ask(
                    settings,
                    cancel,
                    bot1.make_penalty_decision(&view1, cancel),
                    parse_choice
                ),
                ask(
                    settings,
                    cancel,
                    bot2.make_penalty_decision(&view2, cancel),
                    parse_choice
                ),
            );
            let (answer1, answer2) = (answer1?, answer2?);
            recorder.note(Side::Player1, round, &answer1);
            recorder.note(Side::Player2, round, &answer2);

            let round_winner = match (&answer1, &answer2) {
                (Answer::Valid(choice1), Answer::Valid(choice2)) => {
                    let keeper_side = if role1 == PenaltyRole::Goalkeeper {
                        Side::Player1
                    } else {
                        Side::Player2
                    };
                    if choice1 == choice2 {
                        keeper_side
                    } else {
                        keeper_side.other()
                    }
                }
                _ => default_winner(&answer1, &answer2, name1, name2, round),
            };
            let (points, result1) = match round_winner {
                Side::Player1 => (role1.points(), RoundResult::Win),
                Side::Player2 => (role2.points(), RoundResult::Loss),
            };
            recorder.award(round_winner, points);

            recorder.complete_round(
                round,
                answer1.describe(PenaltyChoice::to_string),
                answer2.describe(PenaltyChoice::to_string),
                result1,
                (Some(role1.to_string()), Some(role2.to_string())),
            );
        }

        Ok(recorder.finish())
    }
}
