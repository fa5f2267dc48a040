//! # Bot Arena
//!
//! A referee and tournament engine for head-to-head bot competitions.
//!
//! Independently authored bots play four abstract games against each other.
//! Every match is refereed under per-move deadlines and strict input
//! validation, and every result is reproducible: ties between two failing
//! bots are settled by a stable hash, role coin flips and group seeding are
//! seeded, and match results are recorded in submission order even though
//! matches run in parallel.
//!
//! ## Architecture
//!
//! Data flows from the leaves up:
//!
//! - **Bots** expose one capability per game behind [`bot::BotHandle`]
//! - **Rule engines** referee a single match and return a [`game::MatchResult`]
//! - **The dispatcher** picks the engine for a game and checks both bots
//! - **Scoring** turns results into standings, rankings and statistics
//! - **Tournaments** run one game over a roster: groups, then finals
//! - **Series** run one tournament per game, one after another
//!
//! ## Core Modules
//!
//! - [`bot`]: Bot capability interface, scripted bots and rosters
//! - [`game`]: Rule engines, dispatcher and match results
//! - [`scoring`]: Standings aggregation, rankings and statistics
//! - [`tournament`]: Event orchestration and batch scheduling
//! - [`series`]: Multi-event orchestration and cross-event standings
//! - [`events`]: Lifecycle notifications
//! - [`config`]: Arena configuration
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
//! let (a, b) = (presets::rock("A"), presets::rock("B"));
//! let settings = MatchSettings::new(5, Duration::from_millis(200));
//!
//! let result = dispatcher
//!     .execute_match(GameType::Rpsls, a.as_ref(), b.as_ref(), &settings, &CancellationToken::new())
//!     .await
//!     .unwrap();
//! assert_eq!(result.outcome, MatchOutcome::Draw);
//! # }
//! ```

/// Bot capability interface and built-in bots.
pub mod bot;

/// Cooperative cancellation signal.
pub mod cancel;

/// Arena configuration.
pub mod config;

/// Lifecycle notifications.
pub mod events;

/// Rule engines and match results.
pub mod game;

/// Standings, rankings and statistics.
pub mod scoring;

/// Multi-event series.
pub mod series;

/// Single-game events.
pub mod tournament;

pub use cancel::CancellationToken;
pub use config::{ArenaConfig, ConfigError};
pub use game::{GameDispatcher, GameType, MatchOutcome, MatchResult, MatchSettings};
pub use series::{SeriesInfo, SeriesManager};
pub use tournament::{TournamentInfo, TournamentManager};
