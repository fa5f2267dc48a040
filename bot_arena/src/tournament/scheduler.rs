//! Bounded-parallel execution of one scheduling batch.
//!
//! Matches in a batch run concurrently, at most `max_parallel` at a time.
//! Results are handed back in submission order no matter which match
//! finished first, so recording them is reproducible.

use super::manager::{TournamentError, TournamentResult};
use crate::{
    bot::BotHandle,
    cancel::CancellationToken,
    game::{
        GameDispatcher, GameError, GameType, MatchOutcome, MatchResult, MatchSettings,
        engine::forfeit_result,
    },
};
use std::{collections::HashMap, sync::Arc};
use tokio::{
    sync::Semaphore,
    task::{self, JoinSet},
};

/// One match waiting to be played
#[derive(Clone)]
pub struct ScheduledMatch {
    pub bot1: Arc<dyn BotHandle>,
    pub bot2: Arc<dyn BotHandle>,
    /// Group or stage label attached to the result
    pub label: String,
}

impl ScheduledMatch {
    pub fn new(bot1: Arc<dyn BotHandle>, bot2: Arc<dyn BotHandle>, label: impl Into<String>) -> Self {
        Self {
            bot1,
            bot2,
            label: label.into(),
        }
    }
}

impl std::fmt::Debug for ScheduledMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledMatch")
            .field("bot1", &self.bot1.team_name())
            .field("bot2", &self.bot2.team_name())
            .field("label", &self.label)
            .finish()
    }
}

/// Reorder `(submission index, item)` pairs collected in completion order
pub fn in_submission_order<T>(completed: impl IntoIterator<Item = (usize, T)>) -> Vec<T> {
    let mut completed: Vec<(usize, T)> = completed.into_iter().collect();
    completed.sort_by_key(|(index, _)| *index);
    completed.into_iter().map(|(_, item)| item).collect()
}

/// Runs batches of matches with bounded parallelism
#[derive(Debug, Clone)]
pub struct MatchScheduler {
    dispatcher: Arc<GameDispatcher>,
    max_parallel: usize,
}

impl MatchScheduler {
    pub fn new(dispatcher: Arc<GameDispatcher>, max_parallel: usize) -> Self {
        Self {
            dispatcher,
            max_parallel: max_parallel.max(1),
        }
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Play every match of a batch and return the results in submission order.
    ///
    /// A match task that panics is recorded as a double forfeit.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the signal fires before or during the batch,
    /// and `Game` for a match the dispatcher refuses to start.
    pub async fn run_batch(
        &self,
        game_type: GameType,
        matches: Vec<ScheduledMatch>,
        settings: &MatchSettings,
        cancel: &CancellationToken,
    ) -> TournamentResult<Vec<MatchResult>> {
        if cancel.is_cancelled() {
            return Err(TournamentError::Cancelled);
        }

        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let mut tasks = JoinSet::new();
        let mut task_index: HashMap<task::Id, usize> = HashMap::new();

        for (index, scheduled) in matches.iter().cloned().enumerate() {
            let dispatcher = Arc::clone(&self.dispatcher);
            let semaphore = Arc::clone(&semaphore);
            let settings = settings.clone();
            let cancel = cancel.clone();

            let handle = tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Err(GameError::Cancelled);
                };
                dispatcher
                    .execute_match(
                        game_type,
                        scheduled.bot1.as_ref(),
                        scheduled.bot2.as_ref(),
                        &settings,
                        &cancel,
                    )
                    .await
                    .map(|result| result.with_group_label(scheduled.label))
            });
            task_index.insert(handle.id(), index);
        }

        let mut completed = Vec::with_capacity(matches.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, outcome)) => {
                    if let Some(index) = task_index.get(&id) {
                        completed.push((*index, outcome));
                    }
                }
                Err(join_error) => {
                    let Some(&index) = task_index.get(&join_error.id()) else {
                        continue;
                    };
                    let scheduled = &matches[index];
                    let (name1, name2) = (scheduled.bot1.team_name(), scheduled.bot2.team_name());
                    log::error!("{game_type} match {name1} vs {name2} task failed: {join_error}");
                    let forfeit = forfeit_result(
                        name1,
                        name2,
                        game_type,
                        MatchOutcome::BothError,
                        vec![format!("match task failed: {join_error}")],
                    )
                    .with_group_label(scheduled.label.clone());
                    completed.push((index, Ok(forfeit)));
                }
            }
        }

        in_submission_order(completed)
            .into_iter()
            .map(|outcome| {
                outcome.map_err(|err| match err {
                    GameError::Cancelled => TournamentError::Cancelled,
                    other => TournamentError::Game(other),
                })
            })
            .collect()
    }
}
