//! Shared refereeing machinery for every rule engine.
//!
//! Each round follows the same protocol: build both per-bot views, ask both
//! bots concurrently under their own deadline, classify each answer as
//! valid, invalid or error, resolve the round, then append a log line and a
//! history entry for each side.

use super::{
    entities::{GameType, MatchOutcome, MatchResult, Side},
    errors::{GameError, GameResult},
    tiebreak::{stable_hash, tiebreak_winner},
};
use crate::{
    bot::{
        handle::{BotError, BotHandle, BotResult},
        state::{GameState, RoundRecord, RoundResult},
    },
    cancel::CancellationToken,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, future::Future, time::Duration, time::Instant};

/// Default per-call deadline
pub const DEFAULT_MOVE_TIMEOUT: Duration = Duration::from_secs(1);

/// Per-match settings resolved from the arena configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Rounds to play
    pub rounds: u32,
    /// Deadline for each bot call
    pub move_timeout: Duration,
    /// Seed for role coin flips
    pub seed: u64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            rounds: 10,
            move_timeout: DEFAULT_MOVE_TIMEOUT,
            seed: 0,
        }
    }
}

impl MatchSettings {
    pub fn new(rounds: u32, move_timeout: Duration) -> Self {
        Self {
            rounds,
            move_timeout,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Referee for one game type
#[async_trait]
pub trait GameEngine: Send + Sync {
    /// Game this engine referees
    fn game_type(&self) -> GameType;

    /// Play a full match between two bots.
    ///
    /// Bot faults, timeouts and invalid answers are recorded on the result;
    /// only cancellation aborts the match.
    async fn execute(
        &self,
        bot1: &dyn BotHandle,
        bot2: &dyn BotHandle,
        settings: &MatchSettings,
        cancel: &CancellationToken,
    ) -> GameResult<MatchResult>;
}

/// A bot's answer after classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Answer<T> {
    Valid(T),
    /// Well-formed answer that breaks the game's constraints
    Invalid(String),
    /// Fault or timeout
    Error(String),
}

impl<T> Answer<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// History/log representation
    pub fn describe(&self, show: impl Fn(&T) -> String) -> String {
        match self {
            Self::Valid(value) => show(value),
            Self::Invalid(_) => "INVALID".to_string(),
            Self::Error(_) => "ERROR".to_string(),
        }
    }

    fn failure(&self) -> Option<&str> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(reason) | Self::Error(reason) => Some(reason),
        }
    }
}

/// Fail fast once the overall cancellation signal has fired
pub(crate) fn ensure_active(cancel: &CancellationToken) -> GameResult<()> {
    if cancel.is_cancelled() {
        Err(GameError::Cancelled)
    } else {
        Ok(())
    }
}

/// Ask one bot for its answer under the move deadline and classify it.
///
/// A timeout only ends this call; cancellation ends the whole match.
pub(crate) async fn ask<R, T, F, V>(
    settings: &MatchSettings,
    cancel: &CancellationToken,
    call: F,
    validate: V,
) -> GameResult<Answer<T>>
where
    F: Future<Output = BotResult<R>>,
    V: FnOnce(R) -> Result<T, String>,
{
    ensure_active(cancel)?;

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(GameError::Cancelled),
        outcome = tokio::time::timeout(settings.move_timeout, call) => outcome,
    };
    ensure_active(cancel)?;

    Ok(match outcome {
        Ok(Ok(raw)) => match validate(raw) {
            Ok(value) => Answer::Valid(value),
            Err(reason) => Answer::Invalid(reason),
        },
        Ok(Err(err)) => Answer::Error(err.to_string()),
        Err(_) => Answer::Error(BotError::Timeout(settings.move_timeout).to_string()),
    })
}

/// Winner of a round in which at least one answer is unusable.
///
/// The valid side wins by default; if both failed the hash tiebreak decides.
pub(crate) fn default_winner<A, B>(
    answer1: &Answer<A>,
    answer2: &Answer<B>,
    bot1: &str,
    bot2: &str,
    round: u32,
) -> Side {
    match (answer1.is_valid(), answer2.is_valid()) {
        (true, false) => Side::Player1,
        (false, true) => Side::Player2,
        _ => tiebreak_winner(bot1, bot2, round),
    }
}

/// Unbiased, seeded coin flip used for role assignment.
///
/// Returns true when player 1 takes the first role.
pub(crate) fn coin_flip(settings: &MatchSettings, salt: &str, bot1: &str, bot2: &str) -> bool {
    let seed = settings.seed ^ stable_hash(&[salt, bot1, bot2]);
    StdRng::seed_from_u64(seed).random_bool(0.5)
}

/// Match-local bookkeeping: log, faults, histories and scores
pub(crate) struct MatchRecorder {
    bot1: String,
    bot2: String,
    game_type: GameType,
    start_time: DateTime<Utc>,
    started: Instant,
    log: Vec<String>,
    errors: Vec<String>,
    history1: Vec<RoundRecord>,
    history2: Vec<RoundRecord>,
    score1: i32,
    score2: i32,
    faults1: u32,
    faults2: u32,
    valid1: u32,
    valid2: u32,
    rounds_played: u32,
}

impl MatchRecorder {
    pub fn new(bot1: &str, bot2: &str, game_type: GameType, rounds: u32) -> Self {
        log::debug!("{game_type} match starting: {bot1} vs {bot2}");
        Self {
            bot1: bot1.to_string(),
            bot2: bot2.to_string(),
            game_type,
            start_time: Utc::now(),
            started: Instant::now(),
            log: vec![format!("{game_type}: {bot1} vs {bot2} ({rounds} rounds)")],
            errors: Vec::new(),
            history1: Vec::new(),
            history2: Vec::new(),
            score1: 0,
            score2: 0,
            faults1: 0,
            faults2: 0,
            valid1: 0,
            valid2: 0,
            rounds_played: 0,
        }
    }

    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::Player1 => &self.bot1,
            Side::Player2 => &self.bot2,
        }
    }

    /// Build `side`'s view for `round`, carrying only its own history
    pub fn view(
        &self,
        side: Side,
        round: u32,
        max_rounds: u32,
        aux: &BTreeMap<String, String>,
    ) -> GameState {
        let history = match side {
            Side::Player1 => &self.history1,
            Side::Player2 => &self.history2,
        };
        GameState {
            current_round: round,
            max_rounds,
            state: aux.clone(),
            round_history: history.clone(),
        }
    }

    pub fn log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    /// Count a classified answer, recording it as an error when unusable
    pub fn note<T>(&mut self, side: Side, round: u32, answer: &Answer<T>) {
        match answer.failure() {
            Some(reason) => {
                let entry = format!("Round {round}: {} {reason}", self.name(side));
                self.log.push(entry.clone());
                self.errors.push(entry);
                match side {
                    Side::Player1 => self.faults1 += 1,
                    Side::Player2 => self.faults2 += 1,
                }
            }
            None => match side {
                Side::Player1 => self.valid1 += 1,
                Side::Player2 => self.valid2 += 1,
            },
        }
    }

    pub fn award(&mut self, side: Side, points: i32) {
        match side {
            Side::Player1 => self.score1 += points,
            Side::Player2 => self.score2 += points,
        }
    }

    /// Close a round: log line plus one history entry per perspective
    pub fn complete_round(
        &mut self,
        round: u32,
        move1: String,
        move2: String,
        result1: RoundResult,
        roles: (Option<String>, Option<String>),
    ) {
        let verdict = match result1 {
            RoundResult::Win => self.bot1.clone(),
            RoundResult::Loss => self.bot2.clone(),
            RoundResult::Draw => "draw".to_string(),
        };
        self.log.push(format!(
            "Round {round}: {}={move1} {}={move2} -> {verdict} (score {}-{})",
            self.bot1, self.bot2, self.score1, self.score2
        ));

        self.history1.push(RoundRecord {
            round,
            my_move: move1.clone(),
            opponent_move: move2.clone(),
            result: result1,
            role: roles.0,
        });
        self.history2.push(RoundRecord {
            round,
            my_move: move2,
            opponent_move: move1,
            result: result1.flipped(),
            role: roles.1,
        });
        self.rounds_played = round;
    }

    /// Apply the match-level outcome rules and seal the result
    pub fn finish(mut self) -> MatchResult {
        let outcome = self.outcome();
        self.log.push(format!(
            "Result: {outcome} ({}-{})",
            self.score1, self.score2
        ));
        log::debug!(
            "{} match finished: {} vs {} -> {outcome} ({}-{})",
            self.game_type,
            self.bot1,
            self.bot2,
            self.score1,
            self.score2
        );

        MatchResult {
            bot1_name: self.bot1,
            bot2_name: self.bot2,
            game_type: self.game_type,
            outcome,
            bot1_score: self.score1,
            bot2_score: self.score2,
            start_time: self.start_time,
            end_time: Utc::now(),
            duration: self.started.elapsed(),
            rounds_played: self.rounds_played,
            match_log: self.log,
            errors: self.errors,
            group_label: None,
        }
    }

    fn outcome(&self) -> MatchOutcome {
        if self.rounds_played > 0 && self.valid1 == 0 && self.valid2 == 0 {
            return MatchOutcome::BothError;
        }

        match (self.faults1 > 0, self.faults2 > 0) {
            (true, false) => MatchOutcome::Player2Wins,
            (false, true) => MatchOutcome::Player1Wins,
            (both_faulted, _) => {
                if self.score1 > self.score2 {
                    MatchOutcome::Player1Wins
                } else if self.score2 > self.score1 {
                    MatchOutcome::Player2Wins
                } else if both_faulted {
                    MatchOutcome::win_for(tiebreak_winner(
                        &self.bot1,
                        &self.bot2,
                        self.rounds_played,
                    ))
                } else {
                    MatchOutcome::Draw
                }
            }
        }
    }
}

/// Result for a match that never started because a bot could not take part
pub(crate) fn forfeit_result(
    bot1: &str,
    bot2: &str,
    game_type: GameType,
    outcome: MatchOutcome,
    errors: Vec<String>,
) -> MatchResult {
    let now = Utc::now();
    let mut match_log = vec![format!("{game_type}: {bot1} vs {bot2} (not played)")];
    match_log.extend(errors.iter().cloned());
    match_log.push(format!("Result: {outcome} (0-0)"));

    MatchResult {
        bot1_name: bot1.to_string(),
        bot2_name: bot2.to_string(),
        game_type,
        outcome,
        bot1_score: 0,
        bot2_score: 0,
        start_time: now,
        end_time: now,
        duration: Duration::ZERO,
        rounds_played: 0,
        match_log,
        errors,
        group_label: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> MatchRecorder {
        MatchRecorder::new("Alpha", "Beta", GameType::Rpsls, 3)
    }

    fn play(recorder: &mut MatchRecorder, round: u32, a1: Answer<u8>, a2: Answer<u8>) {
        recorder.note(Side::Player1, round, &a1);
        recorder.note(Side::Player2, round, &a2);
        recorder.complete_round(
            round,
            a1.describe(u8::to_string),
            a2.describe(u8::to_string),
            RoundResult::Draw,
            (None, None),
        );
    }

    #[test]
    fn test_clean_equal_match_is_draw() {
        let mut rec = recorder();
        play(&mut rec, 1, Answer::Valid(1), Answer::Valid(1));
        let result = rec.finish();
        assert_eq!(result.outcome, MatchOutcome::Draw);
        assert!(result.errors.is_empty());
        assert_eq!(result.rounds_played, 1);
    }

    #[test]
    fn test_one_sided_errors_lose_regardless_of_score() {
        let mut rec = recorder();
        play(&mut rec, 1, Answer::Error("boom".into()), Answer::Valid(1));
        rec.award(Side::Player1, 10);
        let result = rec.finish();
        assert_eq!(result.outcome, MatchOutcome::Player2Wins);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Alpha boom"));
    }

    #[test]
    fn test_no_valid_answers_is_both_error() {
        let mut rec = recorder();
        play(&mut rec, 1, Answer::Error("x".into()), Answer::Invalid("y".into()));
        play(&mut rec, 2, Answer::Error("x".into()), Answer::Error("y".into()));
        assert_eq!(rec.finish().outcome, MatchOutcome::BothError);
    }

    #[test]
    fn test_both_faulted_equal_score_uses_tiebreak() {
        let mut rec = recorder();
        play(&mut rec, 1, Answer::Error("x".into()), Answer::Valid(1));
        play(&mut rec, 2, Answer::Valid(1), Answer::Error("y".into()));
        let expected = MatchOutcome::win_for(tiebreak_winner("Alpha", "Beta", 2));
        assert_eq!(rec.finish().outcome, expected);
    }

    #[test]
    fn test_histories_are_per_perspective() {
        let mut rec = recorder();
        rec.complete_round(
            1,
            "Rock".into(),
            "Paper".into(),
            RoundResult::Loss,
            (None, None),
        );
        let aux = BTreeMap::new();
        let view1 = rec.view(Side::Player1, 2, 3, &aux);
        let view2 = rec.view(Side::Player2, 2, 3, &aux);

        assert_eq!(view1.round_history[0].my_move, "Rock");
        assert_eq!(view1.round_history[0].result, RoundResult::Loss);
        assert_eq!(view2.round_history[0].my_move, "Paper");
        assert_eq!(view2.round_history[0].result, RoundResult::Win);
    }

    #[test]
    fn test_default_winner() {
        let valid: Answer<u8> = Answer::Valid(1);
        let broken: Answer<u8> = Answer::Invalid("bad".into());
        assert_eq!(default_winner(&valid, &broken, "A", "B", 1), Side::Player1);
        assert_eq!(default_winner(&broken, &valid, "A", "B", 1), Side::Player2);
        assert_eq!(
            default_winner(&broken, &broken, "A", "B", 4),
            tiebreak_winner("A", "B", 4)
        );
    }

    #[test]
    fn test_coin_flip_is_seeded() {
        let settings = MatchSettings::default().with_seed(42);
        let first = coin_flip(&settings, "penalty", "A", "B");
        assert_eq!(coin_flip(&settings, "penalty", "A", "B"), first);
    }

    #[tokio::test]
    async fn test_ask_times_out() {
        let settings = MatchSettings::new(1, Duration::from_millis(20));
        let cancel = CancellationToken::new();
        let answer: Answer<u8> = ask(
            &settings,
            &cancel,
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(1u8)
            },
            Ok,
        )
        .await
        .unwrap();

        match answer {
            Answer::Error(msg) => assert!(msg.contains("timeout")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ask_classifies_invalid() {
        let settings = MatchSettings::default();
        let cancel = CancellationToken::new();
        let answer: Answer<u8> = ask(&settings, &cancel, async { Ok(9u8) }, |v| {
            if v < 5 { Ok(v) } else { Err(format!("invalid value {v}")) }
        })
        .await
        .unwrap();
        assert_eq!(answer, Answer::Invalid("invalid value 9".to_string()));
    }

    #[tokio::test]
    async fn test_ask_respects_cancellation() {
        let settings = MatchSettings::default();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result: GameResult<Answer<u8>> = ask(&settings, &cancel, async { Ok(1u8) }, Ok).await;
        assert_eq!(result.unwrap_err(), GameError::Cancelled);
    }
}
