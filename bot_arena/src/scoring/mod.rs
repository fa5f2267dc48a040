//! Scoring and standings aggregation.
//!
//! This module implements:
//! - Match points per outcome (win 3, draw 1, loss or double forfeit 0)
//! - Standings accumulation, one match at a time
//! - Live and final rankings
//! - Event statistics
//!
//! Matches labelled as tiebreaks never reach the standings or statistics.

pub mod calculator;
pub mod models;
pub mod rankings;
pub mod statistics;

pub use calculator::{build_standings, calculate_match_score, update_standings};
pub use models::{BotRanking, Standings, TournamentStanding, TournamentStatistics, name_key};
pub use rankings::{generate_final_rankings, get_current_rankings};
pub use statistics::{calculate_statistics, elapsed};
