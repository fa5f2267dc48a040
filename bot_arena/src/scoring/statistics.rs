//! Event-level statistics over recorded matches.

use super::models::{Standings, TournamentStatistics, name_key};
use crate::game::MatchResult;
use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, time::Duration};

/// Time between two instants, zero if `end` comes first
pub fn elapsed(start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
    (end - start).to_std().unwrap_or_default()
}

/// Summarize an event's matches.
///
/// Tiebreak matches are left out, like in the standings. The duration
/// spans the recorded matches; an orchestrator that knows when the event
/// started and finished replaces it with that window.
pub fn calculate_statistics(results: &[MatchResult], standings: &Standings) -> TournamentStatistics {
    let counted: Vec<&MatchResult> = results.iter().filter(|r| !r.is_tiebreak()).collect();

    let mut stats = TournamentStatistics {
        total_matches: counted.len(),
        ..TournamentStatistics::default()
    };
    if counted.is_empty() {
        stats.highest_scoring_bot = highest_scoring(standings);
        return stats;
    }

    let mut total_duration = Duration::ZERO;
    let mut appearances: BTreeMap<&str, usize> = BTreeMap::new();
    for result in &counted {
        stats.total_rounds += u64::from(result.rounds_played);
        total_duration += result.duration;
        stats.total_errors += result.errors.len();
        stats.total_timeouts += result
            .errors
            .iter()
            .filter(|error| error.to_lowercase().contains("timeout"))
            .count();
        *stats
            .matches_by_game_type
            .entry(result.game_type)
            .or_default() += 1;
        *appearances.entry(result.bot1_name.as_str()).or_default() += 1;
        *appearances.entry(result.bot2_name.as_str()).or_default() += 1;
    }

    stats.average_match_duration =
        total_duration / u32::try_from(counted.len()).unwrap_or(u32::MAX);

    let first_start = counted.iter().map(|r| r.start_time).min();
    let last_end = counted.iter().map(|r| r.end_time).max();
    if let (Some(start), Some(end)) = (first_start, last_end) {
        stats.tournament_duration = elapsed(start, end);
    }

    stats.most_active_bot = appearances
        .into_iter()
        .max_by(|(name_a, count_a), (name_b, count_b)| {
            count_a
                .cmp(count_b)
                .then_with(|| name_key(name_b).cmp(&name_key(name_a)))
        })
        .map(|(name, _)| name.to_string());
    stats.highest_scoring_bot = highest_scoring(standings);
    stats
}

fn highest_scoring(standings: &Standings) -> Option<String> {
    standings
        .values()
        .min_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| b.wins.cmp(&a.wins))
                .then_with(|| name_key(&a.bot_name).cmp(&name_key(&b.bot_name)))
        })
        .map(|standing| standing.bot_name.clone())
}
