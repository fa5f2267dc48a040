//! Multi-event series.
//!
//! This module implements:
//! - Sequential events, one per configured game
//! - Roster reload before every event
//! - Cross-event standings over completed events only
//! - Series champion selection
//!
//! ## Example
//!
//! ```no_run
//! use bot_arena::{
//!     bot::{StaticRoster, presets},
//!     cancel::CancellationToken,
//!     config::ArenaConfig,
//!     events::LogPublisher,
//!     game::GameDispatcher,
//!     series::SeriesManager,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let roster = StaticRoster::new(vec![presets::rock("Rock"), presets::cycler("Cycler")]);
//!     let series = SeriesManager::new(
//!         ArenaConfig::default(),
//!         Arc::new(roster),
//!         Arc::new(GameDispatcher::default()),
//!         Arc::new(LogPublisher),
//!     );
//!
//!     let info = series.run_series(&CancellationToken::new()).await?;
//!     println!("Series champion: {:?}", info.champion);
//!
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod models;
pub mod standings;

pub use manager::{SeriesError, SeriesManager, SeriesResult};
pub use models::{SeriesId, SeriesInfo, SeriesStanding};
pub use standings::calculate_series_standings;
