use bot_arena::{
    bot::presets,
    cancel::CancellationToken,
    game::{GameDispatcher, GameType, MatchOutcome, MatchResult, MatchSettings, tiebreak_winner},
    scoring::{build_standings, calculate_statistics, get_current_rankings},
};
use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::{hint::black_box, time::Duration};

/// Round-robin results for `n_bots` bots with a rotating outcome
fn round_robin_results(n_bots: usize) -> Vec<MatchResult> {
    let outcomes = [
        MatchOutcome::Player1Wins,
        MatchOutcome::Player2Wins,
        MatchOutcome::Draw,
        MatchOutcome::Player2Error,
    ];
    let now = Utc::now();
    let mut results = Vec::new();
    for i in 0..n_bots {
        for j in (i + 1)..n_bots {
            results.push(MatchResult {
                bot1_name: format!("bot{i}"),
                bot2_name: format!("bot{j}"),
                game_type: GameType::Rpsls,
                outcome: outcomes[(i + j) % outcomes.len()],
                bot1_score: (i % 7) as i32,
                bot2_score: (j % 5) as i32,
                start_time: now,
                end_time: now,
                duration: Duration::from_millis(3),
                rounds_played: 50,
                match_log: Vec::new(),
                errors: Vec::new(),
                group_label: Some("Group A".to_string()),
            });
        }
    }
    results
}

/// Benchmark standings aggregation for growing rosters
fn bench_build_standings(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_standings");

    for n_bots in [8, 32, 128] {
        let results = round_robin_results(n_bots);
        group.bench_with_input(BenchmarkId::from_parameter(n_bots), &results, |b, results| {
            b.iter(|| build_standings(black_box(results)));
        });
    }

    group.finish();
}

/// Benchmark ranking of already-built standings
fn bench_rankings(c: &mut Criterion) {
    let standings = build_standings(&round_robin_results(128));

    c.bench_function("current_rankings_128_bots", |b| {
        b.iter(|| get_current_rankings(black_box(&standings)));
    });
}

/// Benchmark event statistics
fn bench_statistics(c: &mut Criterion) {
    let results = round_robin_results(64);
    let standings = build_standings(&results);

    c.bench_function("statistics_64_bots", |b| {
        b.iter(|| calculate_statistics(black_box(&results), black_box(&standings)));
    });
}

/// Benchmark the hash tiebreak
fn bench_tiebreak(c: &mut Criterion) {
    c.bench_function("tiebreak_winner", |b| {
        b.iter(|| tiebreak_winner(black_box("Granite"), black_box("Parchment"), black_box(50)));
    });
}

/// Benchmark a full RPSLS match between instant bots
fn bench_rpsls_match(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let dispatcher = GameDispatcher::default();
    let (a, b) = (presets::cycler("Cycler"), presets::counter("Counter"));
    let settings = MatchSettings::new(50, Duration::from_secs(1));
    let cancel = CancellationToken::new();

    c.bench_function("rpsls_match_50_rounds", |bench| {
        bench.iter(|| {
            runtime.block_on(dispatcher.execute_match(
                GameType::Rpsls,
                a.as_ref(),
                b.as_ref(),
                &settings,
                &cancel,
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_build_standings,
    bench_rankings,
    bench_statistics,
    bench_tiebreak,
    bench_rpsls_match
);
criterion_main!(benches);
