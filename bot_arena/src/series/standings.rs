//! Cross-event standings.

use super::models::SeriesStanding;
use crate::{scoring::models::name_key, tournament::TournamentInfo};
use std::{cmp::Ordering, collections::BTreeMap};

/// Series order: score desc, wins desc, losses asc, titles desc, name asc
pub fn compare_series(a: &SeriesStanding, b: &SeriesStanding) -> Ordering {
    b.total_series_score
        .cmp(&a.total_series_score)
        .then_with(|| b.total_wins.cmp(&a.total_wins))
        .then_with(|| a.total_losses.cmp(&b.total_losses))
        .then_with(|| b.tournaments_won.cmp(&a.tournaments_won))
        .then_with(|| name_key(&a.bot_name).cmp(&name_key(&b.bot_name)))
        .then_with(|| a.bot_name.cmp(&b.bot_name))
}

/// Sum final per-event standings over completed events only.
///
/// An event still running contributes nothing, not a partial score.
pub fn calculate_series_standings(events: &[TournamentInfo]) -> Vec<SeriesStanding> {
    let mut totals: BTreeMap<&str, SeriesStanding> = BTreeMap::new();

    for event in events.iter().filter(|event| event.is_completed()) {
        for standing in event.standings.values() {
            let entry = totals
                .entry(standing.bot_name.as_str())
                .or_insert_with(|| SeriesStanding::new(standing.bot_name.as_str()));
            entry.total_series_score += standing.total_score;
            entry.total_wins += standing.wins;
            entry.total_losses += standing.losses;
            entry.total_draws += standing.draws;
            entry.events_participated += 1;
            *entry.scores_by_game.entry(event.game_type).or_default() += standing.total_score;
            if event.champion.as_deref() == Some(standing.bot_name.as_str()) {
                entry.tournaments_won += 1;
            }
        }
    }

    let mut standings: Vec<SeriesStanding> = totals.into_values().collect();
    standings.sort_by(compare_series);
    for (index, standing) in standings.iter_mut().enumerate() {
        standing.placement = index + 1;
    }
    standings
}
