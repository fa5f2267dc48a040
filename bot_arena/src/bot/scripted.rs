//! Closure-backed bot used by the runner's demo roster and by tests.

use super::{
    handle::{BotError, BotHandle, BotResult},
    state::GameState,
};
use crate::{cancel::CancellationToken, game::entities::GameType};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

/// Strategy producing a textual answer
pub type TextStrategy = Arc<dyn Fn(&GameState) -> BotResult<String> + Send + Sync>;

/// Strategy producing a troop allocation
pub type AllocationStrategy = Arc<dyn Fn(&GameState) -> BotResult<Vec<i32>> + Send + Sync>;

/// Bot whose answers come from plain functions.
///
/// Defaults: always Rock, an even Blotto split, always Center, attack
/// target 0 / defend evenly.
#[derive(Clone)]
pub struct ScriptedBot {
    team_name: String,
    moves: TextStrategy,
    allocations: AllocationStrategy,
    penalties: TextStrategy,
    security: TextStrategy,
    latency: Duration,
    unsupported: Vec<GameType>,
}

impl ScriptedBot {
    /// Create a bot with default strategies for every game
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            moves: Arc::new(|_| Ok("Rock".to_string())),
            allocations: Arc::new(|_| Ok(vec![20; 5])),
            penalties: Arc::new(|_| Ok("Center".to_string())),
            security: Arc::new(|state| {
                Ok(match state.role() {
                    Some("Defender") => "10,10,10".to_string(),
                    _ => "0".to_string(),
                })
            }),
            latency: Duration::ZERO,
            unsupported: Vec::new(),
        }
    }

    /// Replace the RPSLS strategy
    pub fn with_moves<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&GameState) -> BotResult<String> + Send + Sync + 'static,
    {
        self.moves = Arc::new(strategy);
        self
    }

    /// Replace the Blotto strategy
    pub fn with_allocations<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&GameState) -> BotResult<Vec<i32>> + Send + Sync + 'static,
    {
        self.allocations = Arc::new(strategy);
        self
    }

    /// Replace the penalty kick strategy
    pub fn with_penalties<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&GameState) -> BotResult<String> + Send + Sync + 'static,
    {
        self.penalties = Arc::new(strategy);
        self
    }

    /// Replace the security game strategy
    pub fn with_security<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&GameState) -> BotResult<String> + Send + Sync + 'static,
    {
        self.security = Arc::new(strategy);
        self
    }

    /// Delay every answer by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail the pre-match capability check for `game_type`
    pub fn without_game(mut self, game_type: GameType) -> Self {
        self.unsupported.push(game_type);
        self
    }

    /// Wrap in an `Arc<dyn BotHandle>`
    pub fn into_handle(self) -> Arc<dyn BotHandle> {
        Arc::new(self)
    }

    /// Simulated thinking time; gives up once the match is cancelled
    async fn think(&self, cancel: &CancellationToken) -> BotResult<()> {
        if cancel.is_cancelled() {
            return Err(BotError::Cancelled);
        }
        if self.latency.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = tokio::time::sleep(self.latency) => Ok(()),
            _ = cancel.cancelled() => Err(BotError::Cancelled),
        }
    }
}

impl std::fmt::Debug for ScriptedBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedBot")
            .field("team_name", &self.team_name)
            .field("latency", &self.latency)
            .field("unsupported", &self.unsupported)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BotHandle for ScriptedBot {
    fn team_name(&self) -> &str {
        &self.team_name
    }

    fn supports(&self, game_type: GameType) -> bool {
        !self.unsupported.contains(&game_type)
    }

    async fn make_move(
        &self,
        state: &GameState,
        cancel: &CancellationToken,
    ) -> BotResult<String> {
        self.think(cancel).await?;
        (self.moves)(state)
    }

    async fn allocate_troops(
        &self,
        state: &GameState,
        cancel: &CancellationToken,
    ) -> BotResult<Vec<i32>> {
        self.think(cancel).await?;
        (self.allocations)(state)
    }

    async fn make_penalty_decision(
        &self,
        state: &GameState,
        cancel: &CancellationToken,
    ) -> BotResult<String> {
        self.think(cancel).await?;
        (self.penalties)(state)
    }

    async fn make_security_move(
        &self,
        state: &GameState,
        cancel: &CancellationToken,
    ) -> BotResult<String> {
        self.think(cancel).await?;
        (self.security)(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::state::ROLE_KEY;
    use std::time::Instant;

    #[tokio::test]
    async fn test_defaults() {
        let bot = ScriptedBot::new("Default");
        let cancel = CancellationToken::new();
        let state = GameState::default();

        assert_eq!(bot.team_name(), "Default");
        assert_eq!(bot.make_move(&state, &cancel).await.unwrap(), "Rock");
        assert_eq!(
            bot.allocate_troops(&state, &cancel).await.unwrap(),
            vec![20; 5]
        );
        assert_eq!(
            bot.make_penalty_decision(&state, &cancel).await.unwrap(),
            "Center"
        );
    }

    #[tokio::test]
    async fn test_default_security_answer_depends_on_role() {
        let bot = ScriptedBot::new("Guard");
        let cancel = CancellationToken::new();
        let mut state = GameState::default();
        state
            .state
            .insert(ROLE_KEY.to_string(), "Defender".to_string());

        assert_eq!(
            bot.make_security_move(&state, &cancel).await.unwrap(),
            "10,10,10"
        );
    }

    #[tokio::test]
    async fn test_custom_strategy_errors_propagate() {
        let bot = ScriptedBot::new("Broken")
            .with_moves(|_| Err(BotError::Fault("boom".to_string())));
        let cancel = CancellationToken::new();

        let err = bot
            .make_move(&GameState::default(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, BotError::Fault("boom".to_string()));
    }

    #[tokio::test]
    async fn test_cancelled_while_thinking() {
        let bot = ScriptedBot::new("Ponder").with_latency(Duration::from_secs(5));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = bot
            .make_move(&GameState::default(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, BotError::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_already_cancelled_call_is_refused() {
        let bot = ScriptedBot::new("Instant");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = bot
            .allocate_troops(&GameState::default(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, BotError::Cancelled);
    }

    #[test]
    fn test_without_game() {
        let bot = ScriptedBot::new("Picky").without_game(GameType::ColonelBlotto);
        assert!(!bot.supports(GameType::ColonelBlotto));
        assert!(bot.supports(GameType::Rpsls));
    }
}
