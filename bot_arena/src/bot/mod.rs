//! Bot module: the capability interface competitors expose, and the
//! built-in bots used for demos and tests.
//!
//! This module implements:
//! - BotHandle: async trait with one capability per game
//! - GameState: the per-bot view handed to every call
//! - ScriptedBot: closure-backed bot with optional latency
//! - Presets: rock, paper, cycler, counter, seeded random, faulty, invalid, sluggish
//! - BotRoster: reloadable source of handles for a series
//!
//! Compiling and sandboxing submitted source code happens upstream; this
//! crate only ever sees finished handles.
//!
//! ## Example
//!
//! ```
//! use bot_arena::bot::{BotHandle, ScriptedBot};
//!
//! let bot = ScriptedBot::new("Rocky")
//!     .with_moves(|_| Ok("Rock".to_string()))
//!     .into_handle();
//! assert_eq!(bot.team_name(), "Rocky");
//! ```

pub mod handle;
pub mod presets;
pub mod roster;
pub mod scripted;
pub mod state;

pub use handle::{BotError, BotHandle, BotResult};
pub use roster::{BotRoster, StaticRoster};
pub use scripted::ScriptedBot;
pub use state::{GameState, ROLE_KEY, RoundRecord, RoundResult};
