//! Match outcome to point deltas, and standings accumulation.

use super::models::{Standings, TournamentStanding};
use crate::game::{MatchOutcome, MatchResult, Side};

/// Points for a match win
pub const WIN_POINTS: i32 = 3;

/// Points for a drawn match
pub const DRAW_POINTS: i32 = 1;

/// Points for a loss or a double forfeit
pub const LOSS_POINTS: i32 = 0;

/// Match points awarded to (player 1, player 2)
pub fn points_for(outcome: MatchOutcome) -> (i32, i32) {
    match outcome {
        MatchOutcome::Player1Wins | MatchOutcome::Player2Error => (WIN_POINTS, LOSS_POINTS),
        MatchOutcome::Player2Wins | MatchOutcome::Player1Error => (LOSS_POINTS, WIN_POINTS),
        MatchOutcome::Draw => (DRAW_POINTS, DRAW_POINTS),
        MatchOutcome::BothError => (LOSS_POINTS, LOSS_POINTS),
    }
}

/// Match points for both sides of `result`
pub fn calculate_match_score(result: &MatchResult) -> (i32, i32) {
    points_for(result.outcome)
}

/// Apply one match to `standings`.
///
/// Tiebreak matches are skipped. Returns whether the match was counted.
pub fn update_standings(result: &MatchResult, standings: &mut Standings) -> bool {
    if result.is_tiebreak() {
        log::debug!(
            "Skipping tiebreak match {} vs {} in standings",
            result.bot1_name,
            result.bot2_name
        );
        return false;
    }

    let (points1, points2) = calculate_match_score(result);
    let winner = result.outcome.winner();
    let draw = result.outcome == MatchOutcome::Draw;

    for (name, opponent, earned, conceded, side) in [
        (
            &result.bot1_name,
            &result.bot2_name,
            points1,
            points2,
            Side::Player1,
        ),
        (
            &result.bot2_name,
            &result.bot1_name,
            points2,
            points1,
            Side::Player2,
        ),
    ] {
        let standing = standings
            .entry(name.clone())
            .or_insert_with(|| TournamentStanding::new(name.as_str()));
        standing.total_score += earned;
        standing.total_opponent_score += conceded;
        standing.matches_played += 1;
        match winner {
            Some(won) if won == side => standing.wins += 1,
            Some(_) => standing.losses += 1,
            None if draw => standing.draws += 1,
            None => {}
        }
        standing.record_opponent(opponent);
    }
    true
}

/// Fresh standings built from `results` in the given order
pub fn build_standings<'a>(results: impl IntoIterator<Item = &'a MatchResult>) -> Standings {
    let mut standings = Standings::new();
    for result in results {
        update_standings(result, &mut standings);
    }
    standings
}
