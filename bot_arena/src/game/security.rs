//! Security game (asymmetric multi-target variant).
//!
//! Roles are fixed for the match by a seeded coin flip. Each round the
//! attacker names one target index and the defender spreads exactly
//! [`DEFENSE_BUDGET`] units across all targets. On the attacked target with
//! value `v` and defense `d`:
//!
//! - `d == 0`: attacker takes `v`
//! - `0 < d < v`: attacker takes `v - d`, defender takes `d`
//! - `d >= v`: defender takes `v`

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
use std::{cmp::Ordering, collections::BTreeMap, fmt};

/// Point value of each target
pub const TARGET_VALUES: [i32; 3] = [10, 20, 30];

/// Defense units the defender must place every round
pub const DEFENSE_BUDGET: i32 = 30;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SecurityRole {
    Attacker,
    Defender,
}

impl fmt::Display for SecurityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Roles of (player 1, player 2) for the whole match
pub fn assign_roles(
    settings: &MatchSettings,
    bot1: &str,
    bot2: &str,
) -> (SecurityRole, SecurityRole) {
    if coin_flip(settings, "security", bot1, bot2) {
        (SecurityRole::Attacker, SecurityRole::Defender)
    } else {
        (SecurityRole::Defender, SecurityRole::Attacker)
    }
}

/// Parse an attacker's target index
pub fn parse_target(raw: String) -> Result<usize, String> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|target| *target < TARGET_VALUES.len())
        .ok_or_else(|| {
            format!(
                "invalid target '{raw}': expected an index below {}",
                TARGET_VALUES.len()
            )
        })
}

/// Parse a defender's comma-separated allocation
pub fn parse_defense(raw: String) -> Result<Vec<i32>, String> {
    let defense = raw
        .split(',')
        .map(|part| part.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("invalid defense '{raw}': not a list of integers"))?;

    if defense.len() != TARGET_VALUES.len() {
        return Err(format!(
            "invalid defense '{raw}': expected {} values, got {}",
            TARGET_VALUES.len(),
            defense.len()
        ));
    }
    if defense.iter().any(|units| *units < 0) {
        return Err(format!("invalid defense '{raw}': negative units"));
    }
    let total: i64 = defense.iter().map(|units| *units as i64).sum();
    if total != DEFENSE_BUDGET as i64 {
        return Err(format!(
            "invalid defense '{raw}': units sum to {total}, expected {DEFENSE_BUDGET}"
        ));
    }
    Ok(defense)
}

/// (attacker, defender) payoff for an attack on a target worth `value`
pub fn payoff(value: i32, defense: i32) -> (i32, i32) {
    if defense <= 0 {
        (value, 0)
    } else if defense >= value {
        (0, value)
    } else {
        (value - defense, defense)
    }
}

fn max_target_value() -> i32 {
    TARGET_VALUES.iter().copied().max().unwrap_or_default()
}

fn describe_defense(defense: &[i32]) -> String {
    defense
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Security game referee
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityEngine;

#[async_trait]
impl GameEngine for SecurityEngine {
    fn game_type(&self) -> GameType {
        GameType::SecurityGame
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
            MatchRecorder::new(name1, name2, GameType::SecurityGame, settings.rounds);

        let (role1, role2) = assign_roles(settings, name1, name2);
        recorder.log(format!("Roles: {name1}={role1} {name2}={role2}"));
        let aux_for = |role: SecurityRole| {
            BTreeMap::from([
                (ROLE_KEY.to_string(), role.to_string()),
                (
                    "TargetValues".to_string(),
                    describe_defense(&TARGET_VALUES),
                ),
                ("DefenseBudget".to_string(), DEFENSE_BUDGET.to_string()),
            ])
        };
        let (aux1, aux2) = (aux_for(role1), aux_for(role2));

        let attacker_side = if role1 == SecurityRole::Attacker {
            Side::Player1
        } else {
            Side::Player2
        };
        let (attacker, defender) = match attacker_side {
            Side::Player1 => (bot1, bot2),
            Side::Player2 => (bot2, bot1),
        };

        for round in 1..=settings.rounds {
            ensure_active(cancel)?;

            let view1 = recorder.view(Side::Player1, round, settings.rounds, &aux1);
            let view2 = recorder.view(Side::Player2, round, settings.rounds, &aux2);
            let (attacker_view, defender_view) = match attacker_side {
                Side::Player1 => (&view1, &view2),
                Side::Player2 => (&view2, &view1),
            };

            let (attack, defense) = tokio::join!(
                ask(
                    settings,
                    cancel,
                    attacker.make_security_move(attacker_view, cancel),
                    parse_target
                ),
                ask(
                    settings,
                    cancel,
                    defender.make_security_move(defender_view, cancel),
                    parse_defense
                ),
            );
            let (attack, defense) = (attack?, defense?);
            recorder.note(attacker_side, round, &attack);
            recorder.note(attacker_side.other(), round, &defense);

            let attacker_result = match (&attack, &defense) {
                (Answer::Valid(target), Answer::Valid(units)) => {
                    let (gained, held) = payoff(TARGET_VALUES[*target], units[*target]);
                    recorder.award(attacker_side, gained);
                    recorder.award(attacker_side.other(), held);
                    match gained.cmp(&held) {
                        Ordering::Greater => RoundResult::Win,
                        Ordering::Less => RoundResult::Loss,
                        Ordering::Equal => RoundResult::Draw,
                    }
                }
                _ => {
                    let winner = match attacker_side {
                        Side::Player1 => default_winner(&attack, &defense, name1, name2, round),
                        Side::Player2 => default_winner(&defense, &attack, name1, name2, round),
                    };
                    let stake = attack
                        .valid()
                        .map(|target| TARGET_VALUES[*target])
                        .unwrap_or_else(max_target_value);
                    recorder.award(winner, stake);
                    if winner == attacker_side {
                        RoundResult::Win
                    } else {
                        RoundResult::Loss
                    }
                }
            };

            let attack_shown = attack.describe(|target| format!("target {target}"));
            let defense_shown = defense.describe(|units| describe_defense(units));
            let (move1, move2, result1) = match attacker_side {
                Side::Player1 => (attack_shown, defense_shown, attacker_result),
                Side::Player2 => (defense_shown, attack_shown, attacker_result.flipped()),
            };
            recorder.complete_round(
                round,
                move1,
                move2,
                result1,
                (Some(role1.to_string()), Some(role2.to_string())),
            );
        }

        Ok(recorder.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoff_regions() {
        assert_eq!(payoff(20, 0), (20, 0));
        assert_eq!(payoff(20, 5), (15, 5));
        assert_eq!(payoff(20, 20), (0, 20));
        assert_eq!(payoff(20, 30), (0, 20));
    }

    #[test]
    fn test_parse_target_bounds() {
        assert_eq!(parse_target(" 2 ".to_string()).unwrap(), 2);
        assert!(parse_target("3".to_string()).unwrap_err().contains("invalid target"));
        assert!(parse_target("-1".to_string()).is_err());
        assert!(parse_target("left".to_string()).is_err());
    }

    #[test]
    fn test_parse_defense_requires_exact_budget() {
        assert_eq!(parse_defense("10,10,10".to_string()).unwrap(), vec![10, 10, 10]);
        assert_eq!(parse_defense(" 0, 0 ,30".to_string()).unwrap(), vec![0, 0, 30]);
        assert!(parse_defense("10,10".to_string()).is_err());
        assert!(parse_defense("40,-10,0".to_string()).is_err());
        assert!(
            parse_defense("100,0,0".to_string())
                .unwrap_err()
                .contains("invalid defense")
        );
        assert!(parse_defense("a,b,c".to_string()).is_err());
    }

    #[test]
    fn test_roles_are_complementary() {
        let settings = MatchSettings::default().with_seed(5);
        let (role1, role2) = assign_roles(&settings, "Red", "Blue");
        assert_ne!(role1, role2);
    }
}
