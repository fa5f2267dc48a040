//! Fire-and-forget event publishers.

use super::messages::ArenaEvent;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Publisher errors
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Publisher channel full, dropped {0} event")]
    ChannelFull(&'static str),

    #[error("Publisher channel closed")]
    Closed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PublishResult<T> = Result<T, PublishError>;

/// Receives lifecycle notifications from the orchestrators
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: ArenaEvent) -> PublishResult<()>;
}

/// Send `event`, logging and swallowing any failure.
///
/// Orchestration state never depends on whether publishing worked.
pub async fn notify(publisher: &dyn EventPublisher, event: ArenaEvent) {
    let kind = event.kind();
    if let Err(err) = publisher.publish(event).await {
        log::warn!("Failed to publish {kind} event: {err}");
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

#[async_trait]
impl EventPublisher for NullPublisher {
    async fn publish(&self, _event: ArenaEvent) -> PublishResult<()> {
        Ok(())
    }
}

/// Writes every event to the log as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: ArenaEvent) -> PublishResult<()> {
        let payload = serde_json::to_string(&event)?;
        log::info!("{}: {payload}", event.kind());
        Ok(())
    }
}

/// Forwards events into a bounded channel without waiting for room
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: mpsc::Sender<ArenaEvent>,
}

impl ChannelPublisher {
    /// Create a publisher and the receiving end of its channel
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ArenaEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EventPublisher for ChannelPublisher {
    async fn publish(&self, event: ArenaEvent) -> PublishResult<()> {
        let kind = event.kind();
        self.sender.try_send(event).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => PublishError::ChannelFull(kind),
            mpsc::error::TrySendError::Closed(_) => PublishError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameType;
    use uuid::Uuid;

    fn event() -> ArenaEvent {
        ArenaEvent::SeriesStarted {
            series_id: Uuid::new_v4(),
            game_types: vec![GameType::Rpsls],
        }
    }

    #[tokio::test]
    async fn test_channel_publisher_delivers() {
        let (publisher, mut receiver) = ChannelPublisher::new(4);
        publisher.publish(event()).await.unwrap();
        let received = receiver.recv().await.unwrap();
        assert_eq!(received.kind(), "series_started");
    }

    #[tokio::test]
    async fn test_channel_publisher_full() {
        let (publisher, _receiver) = ChannelPublisher::new(1);
        publisher.publish(event()).await.unwrap();
        let err = publisher.publish(event()).await.unwrap_err();
        assert!(matches!(err, PublishError::ChannelFull("series_started")));
    }

    #[tokio::test]
    async fn test_channel_publisher_closed() {
        let (publisher, receiver) = ChannelPublisher::new(1);
        drop(receiver);
        let err = publisher.publish(event()).await.unwrap_err();
        assert!(matches!(err, PublishError::Closed));
    }

    #[tokio::test]
    async fn test_notify_swallows_failures() {
        let (publisher, receiver) = ChannelPublisher::new(1);
        drop(receiver);
        notify(&publisher, event()).await;
    }

    #[tokio::test]
    async fn test_log_and_null_publishers_succeed() {
        assert!(LogPublisher.publish(event()).await.is_ok());
        assert!(NullPublisher.publish(event()).await.is_ok());
    }
}
