//! Capability interface every competitor exposes to the referees.

use super::state::GameState;
use crate::{cancel::CancellationToken, game::entities::GameType};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by a bot while answering a capability call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BotError {
    /// Bot logic failed
    #[error("bot fault: {0}")]
    Fault(String),

    /// Bot did not answer before its deadline
    #[error("timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Bot gave up because the match was cancelled
    #[error("bot call cancelled")]
    Cancelled,
}

/// Result type for bot capability calls
pub type BotResult<T> = Result<T, BotError>;

/// A validated, resource-limited reference to a competitor's logic.
///
/// The team name is the bot's identity everywhere: map keys, match results,
/// standings. Each capability call receives the bot's own view of the match
/// and the match cancellation token; referees additionally enforce a
/// per-call deadline from the outside.
#[async_trait]
pub trait BotHandle: Send + Sync {
    /// Unique, stable team name
    fn team_name(&self) -> &str;

    /// Basic capability check performed before a match starts
    fn supports(&self, _game_type: GameType) -> bool {
        true
    }

    /// Rock-Paper-Scissors-Lizard-Spock move
    async fn make_move(&self, state: &GameState, cancel: &CancellationToken)
    -> BotResult<String>;

    /// Colonel Blotto troop allocation, one entry per battlefield
    async fn allocate_troops(
        &self,
        state: &GameState,
        cancel: &CancellationToken,
    ) -> BotResult<Vec<i32>>;

    /// Penalty kick direction, interpreted according to the bot's role
    async fn make_penalty_decision(
        &self,
        state: &GameState,
        cancel: &CancellationToken,
    ) -> BotResult<String>;

    /// Security game answer: a target index for attackers, an allocation for defenders
    async fn make_security_move(
        &self,
        state: &GameState,
        cancel: &CancellationToken,
    ) -> BotResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_mentions_timeout() {
        let err = BotError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "timeout after 250ms");
    }

    #[test]
    fn test_fault_message() {
        let err = BotError::Fault("division by zero".to_string());
        assert!(err.to_string().contains("division by zero"));
    }
}
