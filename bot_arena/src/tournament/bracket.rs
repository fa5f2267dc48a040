//! Group seeding, round-robin pairing and advancement.

use super::models::Group;
use crate::scoring::{Standings, TournamentStanding, rankings::compare_standings};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// A pairing inside a scheduling round: (player 1, player 2)
pub type Pairing = (String, String);

/// Label for the group at `index`
pub fn group_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(offset) if offset < 26 => format!("Group {}", char::from(b'A' + offset)),
        _ => format!("Group {}", index + 1),
    }
}

/// Number of groups actually used for `bot_count` bots
pub fn effective_group_count(requested: usize, bot_count: usize) -> usize {
    requested.min(bot_count / 2).max(1)
}

/// Shuffle the roster with `seed` and deal it snake-order into groups.
///
/// Every group ends up with at least two bots whenever the roster has two
/// or more.
pub fn seed_groups(bots: &[String], group_count: usize, seed: u64) -> Vec<Group> {
    let count = effective_group_count(group_count, bots.len());
    let mut shuffled = bots.to_vec();
    shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut members: Vec<Vec<String>> = vec![Vec::new(); count];
    for (index, bot) in shuffled.into_iter().enumerate() {
        let (pass, position) = (index / count, index % count);
        let target = if pass % 2 == 0 {
            position
        } else {
            count - 1 - position
        };
        members[target].push(bot);
    }

    members
        .into_iter()
        .enumerate()
        .map(|(index, bots)| Group::new(group_label(index), bots))
        .collect()
}

/// Round-robin schedule by the circle method.
///
/// Each inner vector is one round in which every bot plays at most once.
/// With an odd number of bots one bot sits out each round.
pub fn round_robin(bots: &[String]) -> Vec<Vec<Pairing>> {
    if bots.len() < 2 {
        return Vec::new();
    }

    let mut seats: Vec<Option<&String>> = bots.iter().map(Some).collect();
    if seats.len() % 2 == 1 {
        seats.push(None);
    }
    let seat_count = seats.len();

    let mut rounds = Vec::with_capacity(seat_count - 1);
    for round in 0..seat_count - 1 {
        let mut pairings = Vec::with_capacity(seat_count / 2);
        for slot in 0..seat_count / 2 {
            if let (Some(home), Some(away)) = (seats[slot], seats[seat_count - 1 - slot]) {
                // Alternate the fixed seat so it does not always play first.
                if slot == 0 && round % 2 == 1 {
                    pairings.push((away.clone(), home.clone()));
                } else {
                    pairings.push((home.clone(), away.clone()));
                }
            }
        }
        rounds.push(pairings);
        seats[1..].rotate_right(1);
    }
    rounds
}

/// Rounds a round-robin over `bot_count` bots takes
pub fn round_robin_rounds(bot_count: usize) -> u32 {
    match bot_count {
        0 | 1 => 0,
        n if n % 2 == 0 => (n - 1) as u32,
        n => n as u32,
    }
}

/// Group members in ranking order, using `standings` for their results
pub fn rank_members(bots: &[String], standings: &Standings) -> Vec<TournamentStanding> {
    let mut ranked: Vec<TournamentStanding> = bots
        .iter()
        .map(|bot| {
            standings
                .get(bot)
                .cloned()
                .unwrap_or_else(|| TournamentStanding::new(bot.as_str()))
        })
        .collect();
    ranked.sort_by(compare_standings);
    ranked
}

/// Top `count` members of `group`
pub fn advancing(group: &Group, standings: &Standings, count: usize) -> Vec<String> {
    rank_members(&group.bots, standings)
        .into_iter()
        .take(count)
        .map(|standing| standing.bot_name)
        .collect()
}
