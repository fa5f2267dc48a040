//! Command-line bot arena runner.
//!
//! Loads a roster of built-in bots, runs one event per configured game and
//! prints the series standings together with a digest of the results.

mod config;
mod logging;

use std::{sync::Arc, time::Instant};

use anyhow::Error;
use bot_arena::{
    CancellationToken, GameDispatcher, SeriesInfo, SeriesManager,
    bot::{BotHandle, StaticRoster, presets},
    events::ChannelPublisher,
    series::SeriesError,
};
use config::RunnerConfig;
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use sha2::{Digest, Sha256};

const HELP: &str = "\
Run a bot arena series with the built-in bots

USAGE:
  ba_runner [OPTIONS]

OPTIONS:
  --games      LIST        Comma-separated games to play  [default: env ARENA_GAMES or all]
  --seed       N           Seed for group draws and role flips  [default: env ARENA_SEED or 0]
  --with-faulty            Add bots that crash and send invalid moves

FLAGS:
  --json                   Print the full series as JSON
  -h, --help               Print help information

ENVIRONMENT:
  ARENA_MOVE_TIMEOUT_MS    Per-move deadline in milliseconds
  ARENA_MAX_PARALLEL       Matches refereed at once
  ARENA_GROUP_COUNT        Groups in the first stage
  ARENA_FINALISTS_PER_GROUP
                           Bots advancing from each group
  ARENA_RPSLS_ROUNDS       Rounds per RPSLS match (also _BLOTTO_, _PENALTY_, _SECURITY_)
  RUST_LOG                 Log filter [default: info]
";

struct Args {
    games: Option<String>,
    seed: Option<u64>,
    with_faulty: bool,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        games: pargs.opt_value_from_str("--games")?,
        seed: pargs.opt_value_from_str("--seed")?,
        with_faulty: pargs.contains("--with-faulty"),
        json: pargs.contains("--json"),
    };

    logging::init();

    let config = RunnerConfig::from_env(args.games, args.seed)?;
    config.validate()?;

    // First Ctrl-C stops the series after the running batch.
    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    set_handler(move || signal.cancel())?;

    let (publisher, mut events) = ChannelPublisher::new(config.event_buffer);
    let slow_match_ms = config.slow_match_ms;
    let reporter = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            logging::log_arena_event(&event, slow_match_ms);
        }
    });

    let roster = StaticRoster::new(demo_roster(config.arena.seed, args.with_faulty));
    info!(
        "Starting series with {} bots: {:?}",
        roster.len(),
        config.arena.game_types
    );

    let series = SeriesManager::new(
        config.arena.clone(),
        Arc::new(roster),
        Arc::new(GameDispatcher::default()),
        Arc::new(publisher),
    );

    let start = Instant::now();
    let outcome = series.run_series(&cancel).await;
    logging::log_performance(
        "series",
        start.elapsed().as_millis() as u64,
        config.slow_match_ms * 60,
        None,
    );

    // Dropping the manager closes the channel so the reporter drains and exits.
    drop(series);
    reporter.await?;

    let info = match outcome {
        Ok(info) => info,
        Err(SeriesError::Cancelled {
            series,
            in_progress,
        }) => {
            eprintln!(
                "Series cancelled, showing {} completed events",
                series.events.len()
            );
            if let Some(event) = in_progress {
                eprintln!(
                    "Interrupted {} event had {} recorded matches",
                    event.game_type,
                    event.match_results.len()
                );
            }
            *series
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_standings(&info);
    }
    println!("Results digest: {}", results_digest(&info)?);

    Ok(())
}

/// Built-in bots entered into every event
fn demo_roster(seed: u64, with_faulty: bool) -> Vec<Arc<dyn BotHandle>> {
    let mut bots = vec![
        presets::rock("Granite"),
        presets::paper("Parchment"),
        presets::cycler("Cycler"),
        presets::counter("Counter"),
        presets::random("Dice", seed),
        presets::random("Coin", seed.wrapping_add(1)),
    ];
    if with_faulty {
        bots.push(presets::faulty("Gremlin"));
        bots.push(presets::invalid("Rulebreaker"));
    }
    bots
}

fn print_standings(info: &SeriesInfo) {
    for event in &info.events {
        println!(
            "{:<16} champion: {}",
            event.game_type.to_string(),
            event.champion.as_deref().unwrap_or("none")
        );
    }
    println!();
    println!(
        "{:>3}  {:<14} {:>6} {:>4} {:>4} {:>4} {:>6}",
        "#", "Bot", "Score", "W", "L", "D", "Titles"
    );
    for standing in &info.standings {
        println!(
            "{:>3}  {:<14} {:>6} {:>4} {:>4} {:>4} {:>6}",
            standing.placement,
            standing.bot_name,
            standing.total_series_score,
            standing.total_wins,
            standing.total_losses,
            standing.total_draws,
            standing.tournaments_won
        );
    }
    if let Some(champion) = &info.champion {
        println!();
        println!("Series champion: {champion}");
    }
}

/// Hex SHA-256 of the match outcomes, stable across runs with the same seed
fn results_digest(info: &SeriesInfo) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();
    for event in &info.events {
        for result in &event.match_results {
            let line = serde_json::to_string(&(
                &result.group_label,
                &result.bot1_name,
                &result.bot2_name,
                result.outcome,
                result.bot1_score,
                result.bot2_score,
            ))?;
            hasher.update(line.as_bytes());
        }
    }
    hasher.update(serde_json::to_string(&info.standings)?.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bot_arena::{ArenaConfig, GameType};
    use std::time::Duration;

    async fn run(seed: u64) -> SeriesInfo {
        let config = ArenaConfig {
            move_timeout: Duration::from_millis(200),
            max_rounds: GameType::ALL.into_iter().map(|g| (g, 4)).collect(),
            game_types: vec![GameType::Rpsls, GameType::ColonelBlotto],
            seed,
            ..ArenaConfig::default()
        };
        let series = SeriesManager::new(
            config,
            Arc::new(StaticRoster::new(demo_roster(seed, true))),
            Arc::new(GameDispatcher::default()),
            Arc::new(bot_arena::events::NullPublisher),
        );
        series.run_series(&CancellationToken::new()).await.unwrap()
    }

    #[test]
    fn test_demo_roster_names_are_unique() {
        let bots = demo_roster(3, true);
        let mut names: Vec<_> = bots.iter().map(|b| b.team_name().to_lowercase()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), bots.len());
    }

    #[tokio::test]
    async fn test_digest_is_reproducible() {
        let first = results_digest(&run(11).await).unwrap();
        let second = results_digest(&run(11).await).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }
}
