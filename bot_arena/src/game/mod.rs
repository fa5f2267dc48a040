//! Rule engines that referee a single match between two bots.
//!
//! Four games are built in:
//!
//! - **RPSLS**: Rock-Paper-Scissors-Lizard-Spock, one point per round won
//! - **Colonel Blotto**: 100 troops over 5 battlefields, one point per battlefield
//! - **Penalty Kicks**: shooter vs goalkeeper, roles fixed per match
//! - **Security Game**: attacker vs defender over three valued targets
//!
//! Every engine implements [`GameEngine`] and shares the round protocol in
//! [`engine`]: per-call deadlines, valid/invalid/error classification,
//! default wins for the side that answered correctly, and a hash-based
//! tiebreak when neither did. [`GameDispatcher`] picks the engine for a
//! requested game and checks both bots before the first round.
//!
//! ## Example
//!
//! ```
//! use bot_arena::{
//!     bot::presets,
//!     cancel::CancellationToken,
//!     game::{GameDispatcher, GameType, MatchOutcome, MatchSettings},
//! };
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher = GameDispatcher::default();
//! let (rock, paper) = (presets::rock("Rock"), presets::paper("Paper"));
//! let settings = MatchSettings::new(10, Duration::from_millis(200));
//!
//! let result = dispatcher
//!     .execute_match(GameType::Rpsls, rock.as_ref(), paper.as_ref(), &settings, &CancellationToken::new())
//!     .await
//!     .unwrap();
//! assert_eq!(result.outcome, MatchOutcome::Player2Wins);
//! assert_eq!(result.winner_name(), Some("Paper"));
//! # }
//! ```

pub mod blotto;
pub mod dispatcher;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod penalty;
pub mod rpsls;
pub mod security;
pub mod tiebreak;

pub use dispatcher::GameDispatcher;
pub use engine::{DEFAULT_MOVE_TIMEOUT, GameEngine, MatchSettings};
pub use entities::{GameType, MatchOutcome, MatchResult, Side};
pub use errors::{GameError, GameResult};
pub use tiebreak::tiebreak_winner;
