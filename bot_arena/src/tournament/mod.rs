//! Single-game events over a bot roster.
//!
//! This module implements:
//! - Seeded group assignment (snake order over a shuffled roster)
//! - Round-robin scheduling inside each group, one batch per round
//! - Bounded-parallel batch execution with in-order recording
//! - A round-robin final among group finalists, with a tiebreak match
//!   when the top two cannot be separated
//!
//! ## Example
//!
//! ```no_run
//! use bot_arena::{
//!     bot::presets,
//!     cancel::CancellationToken,
//!     events::NullPublisher,
//!     game::{GameDispatcher, GameType, MatchSettings},
//!     tournament::{TournamentConfig, TournamentManager},
//! };
//! use std::{sync::Arc, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = TournamentManager::new(
//!         Arc::new(GameDispatcher::default()),
//!         Arc::new(NullPublisher),
//!     );
//!     let bots = vec![presets::rock("Rock"), presets::paper("Paper"), presets::cycler("Cycler")];
//!     let config = TournamentConfig::new(
//!         GameType::Rpsls,
//!         MatchSettings::new(20, Duration::from_millis(500)),
//!     );
//!
//!     let info = manager.run(config, &bots, &CancellationToken::new()).await?;
//!     println!("Champion: {:?}", info.champion);
//!
//!     Ok(())
//! }
//! ```

pub mod bracket;
pub mod manager;
pub mod models;
pub mod scheduler;

pub use manager::{TournamentError, TournamentManager, TournamentResult};
pub use models::{
    Bracket, FINALS_LABEL, FINALS_TIEBREAK_LABEL, GROUP_STAGE_ROUND, Group, PLAYOFF_ROUND, Stage,
    TournamentConfig, TournamentId, TournamentInfo, TournamentStatus,
};
pub use scheduler::{MatchScheduler, ScheduledMatch};
