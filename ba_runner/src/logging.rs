//! Structured logging configuration.
//!
//! Installs a `tracing` subscriber that also receives the library's `log`
//! records, and provides helpers for match timing and event reporting.

use bot_arena::events::ArenaEvent;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are read from the RUST_LOG env var and default to `info`.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log performance metric
///
/// # Arguments
///
/// * `operation` - Operation name
/// * `duration_ms` - Duration in milliseconds
/// * `threshold_ms` - Durations above this are reported as slow
/// * `metadata` - Additional metadata
pub fn log_performance(operation: &str, duration_ms: u64, threshold_ms: u64, metadata: Option<&str>) {
    if duration_ms > threshold_ms {
        tracing::warn!(
            operation = operation,
            duration_ms = duration_ms,
            metadata = metadata,
            "PERFORMANCE: Slow operation"
        );
    } else {
        tracing::debug!(
            operation = operation,
            duration_ms = duration_ms,
            metadata = metadata,
            "Performance metric"
        );
    }
}

/// Report one lifecycle event from the arena
pub fn log_arena_event(event: &ArenaEvent, slow_match_ms: u64) {
    match event {
        ArenaEvent::MatchCompleted { result, .. } => {
            let label = format!(
                "{} {} vs {} -> {}",
                result.game_type, result.bot1_name, result.bot2_name, result.outcome
            );
            log_performance(
                "match",
                result.duration.as_millis() as u64,
                slow_match_ms,
                Some(&label),
            );
            for error in &result.errors {
                tracing::debug!(game = %result.game_type, "{error}");
            }
        }
        ArenaEvent::RoundStarted {
            round,
            total_rounds,
            matches,
            stage,
            ..
        } => {
            tracing::info!(
                round = round,
                total_rounds = total_rounds,
                matches = matches,
                "{stage:?} round started"
            );
        }
        ArenaEvent::TournamentCompleted {
            game_type,
            champion,
            ..
        } => {
            tracing::info!(
                game = %game_type,
                champion = champion.as_deref().unwrap_or("none"),
                "Tournament completed"
            );
        }
        ArenaEvent::SeriesStepCompleted {
            step, total_steps, ..
        } => {
            tracing::info!("Series step {step}/{total_steps} completed");
        }
        other => tracing::debug!(kind = other.kind(), "Arena event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bot_arena::{GameType, tournament::TournamentId};

    #[test]
    fn test_log_performance() {
        log_performance("test_operation", 500, 1000, Some("metadata"));
        log_performance("slow_operation", 2000, 1000, None);
    }

    #[test]
    fn test_log_arena_event() {
        log_arena_event(
            &ArenaEvent::TournamentCompleted {
                tournament_id: TournamentId::nil(),
                game_type: GameType::Rpsls,
                champion: None,
            },
            1000,
        );
    }
}
