//! Routes a requested game type to its rule engine.

use super::{
    blotto::BlottoEngine,
    engine::{GameEngine, MatchSettings, forfeit_result},
    entities::{GameType, MatchOutcome, MatchResult},
    errors::{GameError, GameResult},
    penalty::PenaltyEngine,
    rpsls::RpslsEngine,
    security::SecurityEngine,
};
use crate::{bot::handle::BotHandle, cancel::CancellationToken};
use std::{collections::HashMap, sync::Arc};

/// Registry of rule engines keyed by game type
#[derive(Clone)]
pub struct GameDispatcher {
    engines: HashMap<GameType, Arc<dyn GameEngine>>,
}

impl GameDispatcher {
    /// Dispatcher with no engines registered
    pub fn empty() -> Self {
        Self {
            engines: HashMap::new(),
        }
    }

    /// Register (or replace) the engine for its game type
    pub fn register(&mut self, engine: Arc<dyn GameEngine>) {
        self.engines.insert(engine.game_type(), engine);
    }

    /// Whether an engine is registered for `game_type`
    pub fn supports(&self, game_type: GameType) -> bool {
        self.engines.contains_key(&game_type)
    }

    /// Resolve a game name to a registered game type
    pub fn resolve(&self, name: &str) -> GameResult<GameType> {
        let game_type: GameType = name.parse()?;
        if self.supports(game_type) {
            Ok(game_type)
        } else {
            Err(GameError::UnsupportedGameType(name.to_string()))
        }
    }

    /// Engine for `game_type`
    pub fn engine(&self, game_type: GameType) -> GameResult<Arc<dyn GameEngine>> {
        self.engines
            .get(&game_type)
            .cloned()
            .ok_or_else(|| GameError::UnsupportedGameType(game_type.to_string()))
    }

    /// Referee one match.
    ///
    /// # Errors
    ///
    /// Fails fast with `UnsupportedGameType` or `InvalidArgument` before any
    /// bot is called, and with `Cancelled` if the match is aborted.
    /// A bot failing the capability check is not an error: the match is
    /// recorded as forfeited by that side.
    pub async fn execute_match(
        &self,
        game_type: GameType,
        bot1: &dyn BotHandle,
        bot2: &dyn BotHandle,
        settings: &MatchSettings,
        cancel: &CancellationToken,
    ) -> GameResult<MatchResult> {
        let engine = self.engine(game_type)?;
        let (name1, name2) = (bot1.team_name(), bot2.team_name());

        if name1.trim().is_empty() || name2.trim().is_empty() {
            return Err(GameError::InvalidArgument(
                "bot handle has an empty team name".to_string(),
            ));
        }
        if name1 == name2 {
            return Err(GameError::InvalidArgument(format!(
                "{name1} cannot play against itself"
            )));
        }

        let capable = (bot1.supports(game_type), bot2.supports(game_type));
        if capable != (true, true) {
            let mut errors = Vec::new();
            if !capable.0 {
                errors.push(format!("{name1} does not support {game_type}"));
            }
            if !capable.1 {
                errors.push(format!("{name2} does not support {game_type}"));
            }
            let outcome = match capable {
                (false, false) => MatchOutcome::BothError,
                (false, true) => MatchOutcome::Player1Error,
                _ => MatchOutcome::Player2Error,
            };
            log::warn!("{game_type} match {name1} vs {name2} forfeited: {errors:?}");
            return Ok(forfeit_result(name1, name2, game_type, outcome, errors));
        }

        engine.execute(bot1, bot2, settings, cancel).await
    }
}

impl Default for GameDispatcher {
    /// Dispatcher with all four built-in games
    fn default() -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.register(Arc::new(RpslsEngine));
        dispatcher.register(Arc::new(BlottoEngine));
        dispatcher.register(Arc::new(PenaltyEngine));
        dispatcher.register(Arc::new(SecurityEngine));
        dispatcher
    }
}

impl std::fmt::Debug for GameDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut games: Vec<_> = self.engines.keys().collect();
        games.sort();
        f.debug_struct("GameDispatcher")
            .field("games", &games)
            .finish()
    }
}
