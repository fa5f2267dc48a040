//! Ordering standings into placements.

use super::models::{BotRanking, Standings, TournamentStanding, name_key};
use std::cmp::Ordering;

/// Ranking order: score desc, wins desc, losses asc, name asc (case-insensitive)
pub fn compare_standings(a: &TournamentStanding, b: &TournamentStanding) -> Ordering {
    b.total_score
        .cmp(&a.total_score)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.losses.cmp(&b.losses))
        .then_with(|| name_key(&a.bot_name).cmp(&name_key(&b.bot_name)))
        .then_with(|| a.bot_name.cmp(&b.bot_name))
}

/// Standings sorted into ranking order
pub fn sorted_standings(standings: &Standings) -> Vec<&TournamentStanding> {
    let mut sorted: Vec<_> = standings.values().collect();
    sorted.sort_by(|a, b| compare_standings(a, b));
    sorted
}

/// Live placements for the standings as they stand
pub fn get_current_rankings(standings: &Standings) -> Vec<BotRanking> {
    sorted_standings(standings)
        .into_iter()
        .enumerate()
        .map(|(index, standing)| BotRanking::from_standing(index + 1, standing))
        .collect()
}

/// Final placements once an event is over.
///
/// The champion, when known, takes first place even if a tiebreak match
/// (which never touches standings) was needed to separate it from the
/// runner-up. Everyone else follows ranking order.
pub fn generate_final_rankings(standings: &Standings, champion: Option<&str>) -> Vec<BotRanking> {
    let mut sorted = sorted_standings(standings);
    if let Some(position) =
        champion.and_then(|name| sorted.iter().position(|standing| standing.bot_name == name))
    {
        let champion = sorted.remove(position);
        sorted.insert(0, champion);
    }

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, standing)| BotRanking::from_standing(index + 1, standing))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(name: &str, score: i32, wins: u32, losses: u32) -> TournamentStanding {
        TournamentStanding {
            total_score: score,
            wins,
            losses,
            ..TournamentStanding::new(name)
        }
    }

    fn standings(entries: Vec<TournamentStanding>) -> Standings {
        entries
            .into_iter()
            .map(|standing| (standing.bot_name.clone(), standing))
            .collect()
    }

    #[test]
    fn test_order_by_score_then_wins_then_losses() {
        let table = standings(vec![
            standing("Low", 3, 1, 0),
            standing("Top", 9, 3, 0),
            standing("FewerWins", 6, 1, 0),
            standing("MoreWins", 6, 2, 1),
            standing("MoreLosses", 6, 2, 2),
        ]);
        let names: Vec<_> = get_current_rankings(&table)
            .into_iter()
            .map(|ranking| ranking.bot_name)
            .collect();
        assert_eq!(
            names,
            vec!["Top", "MoreWins", "MoreLosses", "FewerWins", "Low"]
        );
    }

    #[test]
    fn test_name_breaks_ties_case_insensitively() {
        let table = standings(vec![
            standing("bravo", 3, 1, 0),
            standing("Alpha", 3, 1, 0),
            standing("Charlie", 3, 1, 0),
        ]);
        let rankings = get_current_rankings(&table);
        assert_eq!(rankings[0].bot_name, "Alpha");
        assert_eq!(rankings[1].bot_name, "bravo");
        assert_eq!(rankings[2].bot_name, "Charlie");
        assert_eq!(rankings[2].final_placement, 3);
    }

    #[test]
    fn test_name_ties_fold_non_ascii_case() {
        let table = standings(vec![standing("Éric", 3, 1, 0), standing("émile", 3, 1, 0)]);
        let rankings = get_current_rankings(&table);
        assert_eq!(rankings[0].bot_name, "émile");
        assert_eq!(rankings[1].bot_name, "Éric");
    }

    #[test]
    fn test_final_rankings_put_champion_first() {
        let table = standings(vec![standing("Alpha", 6, 2, 0), standing("Beta", 6, 2, 0)]);
        let rankings = generate_final_rankings(&table, Some("Beta"));
        assert_eq!(rankings[0].bot_name, "Beta");
        assert_eq!(rankings[0].final_placement, 1);
        assert_eq!(rankings[1].bot_name, "Alpha");
    }

    #[test]
    fn test_final_rankings_ignore_unknown_champion() {
        let table = standings(vec![standing("Alpha", 6, 2, 0)]);
        let rankings = generate_final_rankings(&table, Some("Ghost"));
        assert_eq!(rankings.len(), 1);
        assert_eq!(rankings[0].bot_name, "Alpha");
    }
}
