//! Lifecycle notifications for series, events and matches.
//!
//! Orchestrators report progress through an [`EventPublisher`]. Delivery is
//! best effort: [`notify`] logs a failed publish and carries on.

pub mod messages;
pub mod publisher;

pub use messages::ArenaEvent;
pub use publisher::{
    ChannelPublisher, EventPublisher, LogPublisher, NullPublisher, PublishError, PublishResult,
    notify,
};
