//! Built-in bot personalities.
//!
//! - **rock** / **paper**: fixed RPSLS move, even Blotto split
//! - **cycler**: walks through every option in order, round by round
//! - **counter**: plays whatever beats the opponent's previous RPSLS move
//! - **random**: seeded per round, so replays are identical
//! - **faulty**: every call fails
//! - **invalid**: every call returns a well-formed but illegal answer
//! - **sluggish**: valid answers that arrive after `latency`

use super::{
    handle::{BotError, BotHandle},
    scripted::ScriptedBot,
};
use crate::game::{
    blotto::{BATTLEFIELDS, TOTAL_TROOPS},
    penalty::PenaltyChoice,
    rpsls::RpslsMove,
    security::{DEFENSE_BUDGET, TARGET_VALUES},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{sync::Arc, time::Duration};

/// Always plays Rock
pub fn rock(team_name: &str) -> Arc<dyn BotHandle> {
    ScriptedBot::new(team_name).into_handle()
}

/// Always plays Paper
pub fn paper(team_name: &str) -> Arc<dyn BotHandle> {
    ScriptedBot::new(team_name)
        .with_moves(|_| Ok(RpslsMove::Paper.to_string()))
        .into_handle()
}

/// Cycles through every option
pub fn cycler(team_name: &str) -> Arc<dyn BotHandle> {
    ScriptedBot::new(team_name)
        .with_moves(|state| {
            let idx = state.current_round.saturating_sub(1) as usize % RpslsMove::ALL.len();
            Ok(RpslsMove::ALL[idx].to_string())
        })
        .with_allocations(|state| {
            // Stack 60 troops on a rotating battlefield, spread the rest.
            let heavy = state.current_round.saturating_sub(1) as usize % BATTLEFIELDS;
            let mut allocation = vec![10; BATTLEFIELDS];
            allocation[heavy] = TOTAL_TROOPS - 10 * (BATTLEFIELDS as i32 - 1);
            Ok(allocation)
        })
        .with_penalties(|state| {
            let idx = state.current_round.saturating_sub(1) as usize % PenaltyChoice::ALL.len();
            Ok(PenaltyChoice::ALL[idx].to_string())
        })
        .with_security(|state| match state.role() {
            Some("Defender") => Ok(even_defense()),
            _ => {
                let target = state.current_round.saturating_sub(1) as usize % TARGET_VALUES.len();
                Ok(target.to_string())
            }
        })
        .into_handle()
}

/// Answers the opponent's previous RPSLS move with a move that beats it
pub fn counter(team_name: &str) -> Arc<dyn BotHandle> {
    ScriptedBot::new(team_name)
        .with_moves(|state| {
            let answer = state
                .last_round()
                .and_then(|round| round.opponent_move.parse::<RpslsMove>().ok())
                .and_then(|last| RpslsMove::ALL.into_iter().find(|m| m.beats(last)))
                .unwrap_or(RpslsMove::Spock);
            Ok(answer.to_string())
        })
        .into_handle()
}

/// Seeded random play; the same seed and round always give the same answer
pub fn random(team_name: &str, seed: u64) -> Arc<dyn BotHandle> {
    let rng_for = move |round: u32| {
        StdRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(round as u64))
    };

    ScriptedBot::new(team_name)
        .with_moves(move |state| {
            let mut rng = rng_for(state.current_round);
            let idx = rng.random_range(0..RpslsMove::ALL.len());
            Ok(RpslsMove::ALL[idx].to_string())
        })
        .with_allocations(move |state| {
            let mut rng = rng_for(state.current_round);
            let mut allocation = vec![0; BATTLEFIELDS];
            for _ in 0..TOTAL_TROOPS {
                allocation[rng.random_range(0..BATTLEFIELDS)] += 1;
            }
            Ok(allocation)
        })
        .with_penalties(move |state| {
            let mut rng = rng_for(state.current_round);
            let idx = rng.random_range(0..PenaltyChoice::ALL.len());
            Ok(PenaltyChoice::ALL[idx].to_string())
        })
        .with_security(move |state| {
            let mut rng = rng_for(state.current_round);
            match state.role() {
                Some("Defender") => {
                    let mut defense = vec![0; TARGET_VALUES.len()];
                    for _ in 0..DEFENSE_BUDGET {
                        defense[rng.random_range(0..TARGET_VALUES.len())] += 1;
                    }
                    Ok(join(&defense))
                }
                _ => Ok(rng.random_range(0..TARGET_VALUES.len()).to_string()),
            }
        })
        .into_handle()
}

/// Every capability call fails
pub fn faulty(team_name: &str) -> Arc<dyn BotHandle> {
    let fault = || BotError::Fault("unhandled exception in bot logic".to_string());
    ScriptedBot::new(team_name)
        .with_moves(move |_| Err(fault()))
        .with_allocations(move |_| Err(fault()))
        .with_penalties(move |_| Err(fault()))
        .with_security(move |_| Err(fault()))
        .into_handle()
}

/// Every answer is well-formed but breaks the game's constraints
pub fn invalid(team_name: &str) -> Arc<dyn BotHandle> {
    ScriptedBot::new(team_name)
        .with_moves(|_| Ok("Banana".to_string()))
        .with_allocations(|_| Ok(vec![50, 50, 50, 0, 0]))
        .with_penalties(|_| Ok("Up".to_string()))
        .with_security(|state| match state.role() {
            Some("Defender") => Ok("100,0,0".to_string()),
            _ => Ok("99".to_string()),
        })
        .into_handle()
}

/// Valid answers that arrive after `latency`
pub fn sluggish(team_name: &str, latency: Duration) -> Arc<dyn BotHandle> {
    ScriptedBot::new(team_name)
        .with_latency(latency)
        .into_handle()
}

fn even_defense() -> String {
    let share = DEFENSE_BUDGET / TARGET_VALUES.len() as i32;
    let mut defense = vec![share; TARGET_VALUES.len()];
    defense[0] += DEFENSE_BUDGET - share * TARGET_VALUES.len() as i32;
    join(&defense)
}

fn join(values: &[i32]) -> String {
    values
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
