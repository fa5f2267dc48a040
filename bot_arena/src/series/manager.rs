//! Sequential multi-event series.

use super::{models::SeriesInfo, standings::calculate_series_standings};
use crate::{
    bot::BotRoster,
    cancel::CancellationToken,
    config::{ArenaConfig, ConfigError},
    events::{ArenaEvent, EventPublisher, notify},
    game::GameDispatcher,
    tournament::{TournamentError, TournamentInfo, TournamentManager},
};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

/// Series errors
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load bots: {0}")]
    Roster(String),

    #[error("Tournament error: {0}")]
    Tournament(#[from] TournamentError),

    /// Carries every event completed before the signal fired, plus the
    /// event that was running with the results it had already recorded
    #[error("Series cancelled after {} completed events", .series.events.len())]
    Cancelled {
        series: Box<SeriesInfo>,
        in_progress: Option<Box<TournamentInfo>>,
    },
}

pub type SeriesResult<T> = Result<T, SeriesError>;

/// Runs one event per configured game, one after another
#[derive(Clone)]
pub struct SeriesManager {
    config: ArenaConfig,
    roster: Arc<dyn BotRoster>,
    tournaments: TournamentManager,
    publisher: Arc<dyn EventPublisher>,
}

impl SeriesManager {
    /// Create a series manager
    ///
    /// # Arguments
    ///
    /// * `config` - Arena configuration, validated when the series runs
    /// * `roster` - Source of bot handles, reloaded before every event
    /// * `dispatcher` - Rule engines available to the events
    /// * `publisher` - Receiver of lifecycle notifications
    pub fn new(
        config: ArenaConfig,
        roster: Arc<dyn BotRoster>,
        dispatcher: Arc<GameDispatcher>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            roster,
            tournaments: TournamentManager::new(dispatcher, Arc::clone(&publisher)),
            publisher,
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Run every configured event in order.
    ///
    /// Events never overlap: the roster is reloaded and the previous event
    /// fully recorded before the next one starts.
    ///
    /// # Errors
    ///
    /// Configuration problems fail before the first match. Cancellation
    /// returns the completed events inside [`SeriesError::Cancelled`]; an
    /// interrupted event comes back separately and never counts toward the
    /// series standings.
    pub async fn run_series(&self, cancel: &CancellationToken) -> SeriesResult<SeriesInfo> {
        self.config.validate()?;

        let mut info = SeriesInfo::new(self.config.game_types.clone());
        let total_steps = info.game_types.len();
        log::info!("Series {} started: {:?}", info.id, info.game_types);
        self.emit(ArenaEvent::SeriesStarted {
            series_id: info.id,
            game_types: info.game_types.clone(),
        })
        .await;

        for (index, game_type) in self.config.game_types.iter().copied().enumerate() {
            if cancel.is_cancelled() {
                return Err(self.cancelled(info, None));
            }

            let bots = self.roster.load_bots().await.map_err(SeriesError::Roster)?;
            log::info!(
                "Series {} step {}/{}: {} with {} bots",
                info.id,
                index + 1,
                total_steps,
                game_type,
                bots.len()
            );

            let config = self.config.tournament_config(game_type, index);
            let mut event = self.tournaments.create_tournament(config, &bots)?;
            match self
                .tournaments
                .run_tournament(&mut event, &bots, cancel)
                .await
            {
                Ok(()) => {}
                Err(TournamentError::Cancelled) => {
                    return Err(self.cancelled(info, Some(event)));
                }
                Err(err) => return Err(err.into()),
            }

            let champion = event.champion.clone();
            info.events.push(event);
            info.standings = calculate_series_standings(&info.events);

            self.emit(ArenaEvent::SeriesStepCompleted {
                series_id: info.id,
                step: index + 1,
                total_steps,
                game_type,
                champion,
            })
            .await;
            self.emit(ArenaEvent::SeriesStandingsUpdated {
                series_id: info.id,
                standings: info.standings.clone(),
            })
            .await;
        }

        info.champion = info
            .standings
            .first()
            .map(|standing| standing.bot_name.clone());
        info.finished_at = Some(Utc::now());
        log::info!(
            "Series {} completed, champion: {}",
            info.id,
            info.champion.as_deref().unwrap_or("none")
        );
        self.emit(ArenaEvent::SeriesCompleted {
            series_id: info.id,
            champion: info.champion.clone(),
        })
        .await;

        Ok(info)
    }

    fn cancelled(&self, info: SeriesInfo, in_progress: Option<TournamentInfo>) -> SeriesError {
        log::warn!(
            "Series {} cancelled after {} of {} events ({} matches recorded in the interrupted event)",
            info.id,
            info.events.len(),
            info.game_types.len(),
            in_progress
                .as_ref()
                .map_or(0, |event| event.match_results.len())
        );
        SeriesError::Cancelled {
            series: Box::new(info),
            in_progress: in_progress.map(Box::new),
        }
    }

    async fn emit(&self, event: ArenaEvent) {
        notify(self.publisher.as_ref(), event).await;
    }
}

impl std::fmt::Debug for SeriesManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
