//! Cooperative cancellation shared by series, events and matches.
//!
//! A [`CancellationToken`] is cheap to clone; every clone observes the same
//! flag. Orchestrators check [`CancellationToken::is_cancelled`] between
//! stages and rule engines race every bot call against
//! [`CancellationToken::cancelled`].

use std::sync::Arc;
use tokio::sync::watch;

/// Shared cancellation signal backed by a `watch` channel
#[derive(Debug, Clone)]
pub struct CancellationToken {
    sender: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Signal cancellation to every clone of this token
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolve once cancellation has been requested
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            // The sender lives as long as `self`, so this branch never resolves.
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
