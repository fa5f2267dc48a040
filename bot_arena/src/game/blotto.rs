//! Colonel Blotto.
//!
//! Each round both bots split [`TOTAL_TROOPS`] across [`BATTLEFIELDS`]
//! battlefields. The strictly larger force takes a battlefield; equal forces
//! take nothing. Match score is battlefields won across all rounds.

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
use std::{cmp::Ordering, collections::BTreeMap};

/// Battlefields per round
pub const BATTLEFIELDS: usize = 5;

/// Troops every allocation must add up to
pub const TOTAL_TROOPS: i32 = 100;

/// Check shape, sign and total of an allocation
pub fn validate_allocation(allocation: Vec<i32>) -> Result<Vec<i32>, String> {
    if allocation.len() != BATTLEFIELDS {
        return Err(format!(
            "invalid allocation {allocation:?}: expected {BATTLEFIELDS} battlefields, got {}",
            allocation.len()
        ));
    }
    if allocation.iter().any(|troops| *troops < 0) {
        return Err(format!(
            "invalid allocation {allocation:?}: negative troops"
        ));
    }
    let total: i64 = allocation.iter().map(|troops| *troops as i64).sum();
    if total != TOTAL_TROOPS as i64 {
        return Err(format!(
            "invalid allocation {allocation:?}: troops sum to {total}, expected {TOTAL_TROOPS}"
        ));
    }
    Ok(allocation)
}

/// Battlefields won by each side
pub fn battlefields_won(allocation1: &[i32], allocation2: &[i32]) -> (i32, i32) {
    allocation1
        .iter()
        .zip(allocation2)
        .fold((0, 0), |(won1, won2), (a, b)| match a.cmp(b) {
            Ordering::Greater => (won1 + 1, won2),
            Ordering::Less => (won1, won2 + 1),
            Ordering::Equal => (won1, won2),
        })
}

fn describe(allocation: &[i32]) -> String {
    allocation
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Colonel Blotto referee
#[derive(Debug, Clone, Copy, Default)]
pub struct BlottoEngine;

#[async_trait]
impl GameEngine for BlottoEngine {
    fn game_type(&self) -> GameType {
        GameType::ColonelBlotto
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
            MatchRecorder::new(name1, name2, GameType::ColonelBlotto, settings.rounds);
        let aux = BTreeMap::from([
            ("Battlefields".to_string(), BATTLEFIELDS.to_string()),
            ("TotalTroops".to_string(), TOTAL_TROOPS.to_string()),
        ]);

        for round in 1..=settings.rounds {
            ensure_active(cancel)?;

            let view1 = recorder.view(Side::Player1, round, settings.rounds, &aux);
            let view2 = recorder.view(Side::Player2, round, settings.rounds, &aux);
            let (answer1, answer2) = tokio::join!(
                ask(
                    settings,
                    cancel,
                    bot1.allocate_troops(&view1, cancel),
                    validate_allocation
                ),
                ask(
                    settings,
                    cancel,
                    bot2.allocate_troops(&view2, cancel),
                    validate_allocation
                ),
            );
            let (answer1, answer2) = (answer1?, answer2?);
            recorder.note(Side::Player1, round, &answer1);
            recorder.note(Side::Player2, round, &answer2);

            let (won1, won2) = match (&answer1, &answer2) {
                (Answer::Valid(a1), Answer::Valid(a2)) => battlefields_won(a1, a2),
                _ => match default_winner(&answer1, &answer2, name1, name2, round) {
                    Side::Player1 => (BATTLEFIELDS as i32, 0),
                    Side::Player2 => (0, BATTLEFIELDS as i32),
                },
            };
            recorder.award(Side::Player1, won1);
            recorder.award(Side::Player2, won2);

            let result1 = match won1.cmp(&won2) {
                Ordering::Greater => RoundResult::Win,
                Ordering::Less => RoundResult::Loss,
                Ordering::Equal => RoundResult::Draw,
            };
            recorder.complete_round(
                round,
                answer1.describe(|a| describe(a)),
                answer2.describe(|a| describe(a)),
                result1,
                (None, None),
            );
        }

        Ok(recorder.finish())
    }
}
