//! Event orchestration: seeded groups, a round-robin group stage, then a
//! round-robin final among the group finalists.

use super::{
    bracket::{self, Pairing},
    models::{
        FINALS_LABEL, FINALS_TIEBREAK_LABEL, GROUP_STAGE_ROUND, Group, PLAYOFF_ROUND, Stage,
        TournamentConfig, TournamentInfo, TournamentStatus,
    },
    scheduler::{MatchScheduler, ScheduledMatch},
};
use crate::{
    bot::BotHandle,
    cancel::CancellationToken,
    events::{ArenaEvent, EventPublisher, notify},
    game::{GameDispatcher, GameError, MatchResult, Side, tiebreak_winner},
    scoring::{
        TournamentStanding, build_standings, calculate_statistics, elapsed,
        generate_final_rankings, get_current_rankings, name_key, update_standings,
    },
};
use chrono::Utc;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use thiserror::Error;

/// Fewest bots an event can run with
pub const MIN_BOTS: usize = 2;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Invalid tournament configuration: {0}")]
    InvalidConfig(String),

    #[error("Insufficient bots: need {needed}, have {current}")]
    InsufficientBots { needed: usize, current: usize },

    #[error("Duplicate team name: {0}")]
    DuplicateBot(String),

    #[error("Bot not in roster: {0}")]
    UnknownBot(String),

    #[error("Tournament not in correct state: expected {expected:?}, got {actual:?}")]
    InvalidState {
        expected: TournamentStatus,
        actual: TournamentStatus,
    },

    #[error("Tournament cancelled")]
    Cancelled,

    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

pub type TournamentResult<T> = Result<T, TournamentError>;

type Roster = HashMap<String, Arc<dyn BotHandle>>;

/// Runs single-game events
#[derive(Clone)]
pub struct TournamentManager {
    dispatcher: Arc<GameDispatcher>,
    publisher: Arc<dyn EventPublisher>,
}

impl TournamentManager {
    /// Create a new tournament manager
    pub fn new(dispatcher: Arc<GameDispatcher>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            dispatcher,
            publisher,
        }
    }

    pub fn dispatcher(&self) -> &Arc<GameDispatcher> {
        &self.dispatcher
    }

    /// Validate the configuration and roster, then seed the groups.
    ///
    /// # Errors
    ///
    /// Fails before any match is played on a bad configuration, an
    /// unsupported game, too few bots, or a blank or duplicate team name.
    pub fn create_tournament(
        &self,
        config: TournamentConfig,
        bots: &[Arc<dyn BotHandle>],
    ) -> TournamentResult<TournamentInfo> {
        config.validate().map_err(TournamentError::InvalidConfig)?;
        self.dispatcher.engine(config.game_type)?;
        let names = roster_names(bots)?;

        let groups = bracket::seed_groups(&names, config.group_count, config.seed);
        let finalists: usize = groups
            .iter()
            .map(|group| group.bots.len().min(config.finalists_per_group))
            .sum();
        let group_rounds = groups
            .iter()
            .map(|group| bracket::round_robin_rounds(group.bots.len()))
            .max()
            .unwrap_or(0);

        let mut info = TournamentInfo::new(config, names, groups);
        info.total_rounds = group_rounds + bracket::round_robin_rounds(finalists);
        log::debug!(
            "Created {} tournament {} with {} bots in {} groups",
            info.game_type,
            info.id,
            info.bots.len(),
            info.groups.len()
        );
        Ok(info)
    }

    /// Create and run an event in one go
    pub async fn run(
        &self,
        config: TournamentConfig,
        bots: &[Arc<dyn BotHandle>],
        cancel: &CancellationToken,
    ) -> TournamentResult<TournamentInfo> {
        let mut info = self.create_tournament(config, bots)?;
        self.run_tournament(&mut info, bots, cancel).await?;
        Ok(info)
    }

    /// Play a pending event to completion.
    ///
    /// Results recorded before a cancellation stay in `info`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the event is pending, `UnknownBot` when a
    /// seeded team has no handle, and `Cancelled` once the signal fires.
    pub async fn run_tournament(
        &self,
        info: &mut TournamentInfo,
        bots: &[Arc<dyn BotHandle>],
        cancel: &CancellationToken,
    ) -> TournamentResult<()> {
        if info.status != TournamentStatus::Pending {
            return Err(TournamentError::InvalidState {
                expected: TournamentStatus::Pending,
                actual: info.status,
            });
        }
        let roster = roster_map(&info.bots, bots)?;
        let scheduler = MatchScheduler::new(
            Arc::clone(&self.dispatcher),
            info.config.max_parallel_matches,
        );

        info.status = TournamentStatus::InProgress;
        info.stage = Stage::GroupStage;
        info.started_at = Some(Utc::now());
        log::info!(
            "{} tournament {} started with {} bots",
            info.game_type,
            info.id,
            info.bots.len()
        );
        self.emit(ArenaEvent::TournamentStarted {
            tournament_id: info.id,
            game_type: info.game_type,
            bots: info.bots.clone(),
        })
        .await;

        self.play_group_stage(info, &roster, &scheduler, cancel)
            .await?;
        let finalists = self.advance_finalists(info);
        let champion = self
            .play_finals(info, &roster, &scheduler, finalists.clone(), cancel)
            .await?;

        if let Some(champion) = &champion {
            for bot in finalists.iter().filter(|bot| *bot != champion) {
                if let Some(standing) = info.standings.get_mut(bot) {
                    standing.eliminate(PLAYOFF_ROUND, champion.clone());
                }
            }
        }

        let finished_at = Utc::now();
        let mut statistics = calculate_statistics(&info.match_results, &info.standings);
        if let Some(started_at) = info.started_at {
            statistics.tournament_duration = elapsed(started_at, finished_at);
        }

        info.rankings = generate_final_rankings(&info.standings, champion.as_deref());
        info.statistics = Some(statistics);
        info.champion = champion;
        info.status = TournamentStatus::Completed;
        info.finished_at = Some(finished_at);

        log::info!(
            "{} tournament {} completed, champion: {}",
            info.game_type,
            info.id,
            info.champion.as_deref().unwrap_or("none")
        );
        self.emit(ArenaEvent::TournamentCompleted {
            tournament_id: info.id,
            game_type: info.game_type,
            champion: info.champion.clone(),
        })
        .await;
        Ok(())
    }

    async fn play_group_stage(
        &self,
        info: &mut TournamentInfo,
        roster: &Roster,
        scheduler: &MatchScheduler,
        cancel: &CancellationToken,
    ) -> TournamentResult<()> {
        let schedules: Vec<(String, Vec<Vec<Pairing>>)> = info
            .groups
            .iter()
            .map(|group| (group.label.clone(), bracket::round_robin(&group.bots)))
            .collect();
        let rounds = schedules
            .iter()
            .map(|(_, rounds)| rounds.len())
            .max()
            .unwrap_or(0);

        for round in 0..rounds {
            let mut batch = Vec::new();
            for (label, group_rounds) in &schedules {
                if let Some(pairings) = group_rounds.get(round) {
                    batch.extend(schedule(roster, pairings, label)?);
                }
            }
            self.play_batch(info, scheduler, Stage::GroupStage, batch, cancel)
                .await?;
        }
        Ok(())
    }

    /// Pick the finalists of every group and knock out everyone else
    fn advance_finalists(&self, info: &mut TournamentInfo) -> Vec<String> {
        let advanced: Vec<Group> = info
            .groups
            .iter()
            .map(|group| {
                Group::new(
                    group.label.clone(),
                    bracket::advancing(group, &info.standings, info.config.finalists_per_group),
                )
            })
            .collect();

        for (group, through) in info.groups.iter().zip(&advanced) {
            let Some(winner) = through.bots.first() else {
                continue;
            };
            for bot in group.bots.iter().filter(|bot| !through.bots.contains(bot)) {
                if let Some(standing) = info.standings.get_mut(bot) {
                    standing.eliminate(GROUP_STAGE_ROUND, winner.clone());
                }
            }
        }

        let finalists: Vec<String> = advanced
            .iter()
            .flat_map(|group| group.bots.iter().cloned())
            .collect();
        log::info!("Tournament {} finalists: {finalists:?}", info.id);
        info.bracket.advanced = advanced;
        info.bracket.finals = Some(Group::new(FINALS_LABEL, finalists.clone()));
        finalists
    }

    async fn play_finals(
        &self,
        info: &mut TournamentInfo,
        roster: &Roster,
        scheduler: &MatchScheduler,
        finalists: Vec<String>,
        cancel: &CancellationToken,
    ) -> TournamentResult<Option<String>> {
        info.stage = Stage::PlayoffGroups;
        for pairings in bracket::round_robin(&finalists) {
            let batch = schedule(roster, &pairings, FINALS_LABEL)?;
            self.play_batch(info, scheduler, Stage::PlayoffGroups, batch, cancel)
                .await?;
        }

        let finals_standings = build_standings(info.matches_labelled(FINALS_LABEL));
        let ranked = bracket::rank_members(&finalists, &finals_standings);
        let champion = match ranked.as_slice() {
            [] => None,
            [first, second, ..] if level(first, second) => {
                let pairing = (first.bot_name.clone(), second.bot_name.clone());
                Some(
                    self.play_tiebreak(info, roster, scheduler, pairing, cancel)
                        .await?,
                )
            }
            [first, ..] => Some(first.bot_name.clone()),
        };
        Ok(champion)
    }

    /// Settle two level finalists with a match that never counts in standings
    async fn play_tiebreak(
        &self,
        info: &mut TournamentInfo,
        roster: &Roster,
        scheduler: &MatchScheduler,
        pairing: Pairing,
        cancel: &CancellationToken,
    ) -> TournamentResult<String> {
        log::info!(
            "Tournament {}: {} and {} are level, playing a tiebreak",
            info.id,
            pairing.0,
            pairing.1
        );
        info.total_rounds += 1;
        info.bracket.tiebreak_played = true;

        let batch = schedule(roster, &[pairing.clone()], FINALS_TIEBREAK_LABEL)?;
        let results = self
            .play_batch(info, scheduler, Stage::PlayoffGroups, batch, cancel)
            .await?;

        let winner = results
            .first()
            .and_then(|result| result.winner_name().map(str::to_string))
            .unwrap_or_else(|| {
                let rounds = results.first().map_or(0, |result| result.rounds_played);
                match tiebreak_winner(&pairing.0, &pairing.1, rounds) {
                    Side::Player1 => pairing.0.clone(),
                    Side::Player2 => pairing.1.clone(),
                }
            });
        Ok(winner)
    }

    /// Run one scheduling batch and record its results in submission order
    async fn play_batch(
        &self,
        info: &mut TournamentInfo,
        scheduler: &MatchScheduler,
        stage: Stage,
        batch: Vec<ScheduledMatch>,
        cancel: &CancellationToken,
    ) -> TournamentResult<Vec<MatchResult>> {
        if cancel.is_cancelled() {
            return Err(TournamentError::Cancelled);
        }

        info.current_round += 1;
        self.emit(ArenaEvent::RoundStarted {
            tournament_id: info.id,
            stage,
            round: info.current_round,
            total_rounds: info.total_rounds,
            matches: batch.len(),
        })
        .await;

        let results = scheduler
            .run_batch(info.game_type, batch, &info.config.settings, cancel)
            .await?;

        for result in &results {
            update_standings(result, &mut info.standings);
            info.match_results.push(result.clone());
            self.emit(ArenaEvent::MatchCompleted {
                tournament_id: info.id,
                result: Box::new(result.clone()),
            })
            .await;
        }

        self.emit(ArenaEvent::StandingsUpdated {
            tournament_id: info.id,
            rankings: get_current_rankings(&info.standings),
        })
        .await;
        Ok(results)
    }

    async fn emit(&self, event: ArenaEvent) {
        notify(self.publisher.as_ref(), event).await;
    }
}

impl std::fmt::Debug for TournamentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TournamentManager")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// Two finalists nobody can separate on points or record
fn level(a: &TournamentStanding, b: &TournamentStanding) -> bool {
    a.total_score == b.total_score && a.wins == b.wins && a.losses == b.losses
}

/// Team names of a roster, rejecting blanks and case-insensitive duplicates
fn roster_names(bots: &[Arc<dyn BotHandle>]) -> TournamentResult<Vec<String>> {
    if bots.len() < MIN_BOTS {
        return Err(TournamentError::InsufficientBots {
            needed: MIN_BOTS,
            current: bots.len(),
        });
    }

    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(bots.len());
    for bot in bots {
        let name = bot.team_name();
        if name.trim().is_empty() {
            return Err(TournamentError::InvalidConfig(
                "bot handle has an empty team name".to_string(),
            ));
        }
        if !seen.insert(name_key(name)) {
            return Err(TournamentError::DuplicateBot(name.to_string()));
        }
        names.push(name.to_string());
    }
    Ok(names)
}

/// Handles for every seeded team
fn roster_map(seeded: &[String], bots: &[Arc<dyn BotHandle>]) -> TournamentResult<Roster> {
    let available: Roster = bots
        .iter()
        .map(|bot| (bot.team_name().to_string(), Arc::clone(bot)))
        .collect();

    seeded
        .iter()
        .map(|name| {
            available
                .get(name)
                .map(|bot| (name.clone(), Arc::clone(bot)))
                .ok_or_else(|| TournamentError::UnknownBot(name.clone()))
        })
        .collect()
}

fn schedule(
    roster: &Roster,
    pairings: &[Pairing],
    label: &str,
) -> TournamentResult<Vec<ScheduledMatch>> {
    pairings
        .iter()
        .map(|(bot1, bot2)| {
            let handle = |name: &String| {
                roster
                    .get(name)
                    .cloned()
                    .ok_or_else(|| TournamentError::UnknownBot(name.clone()))
            };
            Ok(ScheduledMatch::new(handle(bot1)?, handle(bot2)?, label))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bot::presets,
        events::NullPublisher,
        game::{GameType, MatchSettings},
    };
    use std::time::Duration;

    fn manager() -> TournamentManager {
        TournamentManager::new(
            Arc::new(GameDispatcher::default()),
            Arc::new(NullPublisher),
        )
    }

    fn config() -> TournamentConfig {
        TournamentConfig::new(
            GameType::Rpsls,
            MatchSettings::new(3, Duration::from_millis(200)),
        )
        .with_groups(2, 1)
        .with_seed(3)
    }

    #[test]
    fn test_rejects_too_few_bots() {
        let err = manager()
            .create_tournament(config(), &[presets::rock("Solo")])
            .unwrap_err();
        assert!(matches!(
            err,
            TournamentError::InsufficientBots {
                needed: 2,
                current: 1
            }
        ));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let bots = vec![presets::rock("Twin"), presets::paper("twin")];
        let err = manager().create_tournament(config(), &bots).unwrap_err();
        assert!(matches!(err, TournamentError::DuplicateBot(_)));
    }

    #[test]
    fn test_rejects_duplicate_non_ascii_names() {
        let bots = vec![presets::rock("Ödön"), presets::paper("ÖDÖN")];
        let err = manager().create_tournament(config(), &bots).unwrap_err();
        assert!(matches!(err, TournamentError::DuplicateBot(name) if name == "ÖDÖN"));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bots = vec![presets::rock("A"), presets::paper("B")];
        let err = manager()
            .create_tournament(config().with_parallelism(0), &bots)
            .unwrap_err();
        assert!(matches!(err, TournamentError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unregistered_game() {
        let manager = TournamentManager::new(
            Arc::new(GameDispatcher::empty()),
            Arc::new(NullPublisher),
        );
        let bots = vec![presets::rock("A"), presets::paper("B")];
        let err = manager.create_tournament(config(), &bots).unwrap_err();
        assert!(matches!(
            err,
            TournamentError::Game(GameError::UnsupportedGameType(_))
        ));
    }

    #[test]
    fn test_planned_rounds() {
        let bots: Vec<_> = (0..4).map(|i| presets::rock(&format!("R{i}"))).collect();
        let info = manager().create_tournament(config(), &bots).unwrap();
        // Two groups of two (1 round), then a two-bot final (1 round).
        assert_eq!(info.groups.len(), 2);
        assert_eq!(info.total_rounds, 2);
        assert_eq!(info.status, TournamentStatus::Pending);
    }

    #[tokio::test]
    async fn test_cannot_run_twice() {
        let bots = vec![presets::rock("Rock"), presets::paper("Paper")];
        let manager = manager();
        let mut info = manager
            .run(config(), &bots, &CancellationToken::new())
            .await
            .unwrap();
        let err = manager
            .run_tournament(&mut info, &bots, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TournamentError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_missing_handle_is_unknown_bot() {
        let bots = vec![presets::rock("Rock"), presets::paper("Paper")];
        let manager = manager();
        let mut info = manager.create_tournament(config(), &bots).unwrap();
        let err = manager
            .run_tournament(&mut info, &bots[..1], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TournamentError::UnknownBot(name) if name == "Paper"));
    }
}
