//! Source of bot handles for a series.

use super::handle::BotHandle;
use async_trait::async_trait;
use std::sync::Arc;

/// Supplies the competing bots.
///
/// Series call [`BotRoster::load_bots`] before every event, which lets an
/// upstream pipeline hand out fresh handles with reset resource tracking.
#[async_trait]
pub trait BotRoster: Send + Sync {
    /// Load the current roster
    async fn load_bots(&self) -> Result<Vec<Arc<dyn BotHandle>>, String>;
}

/// Fixed set of already-loaded bots
#[derive(Clone, Default)]
pub struct StaticRoster {
    bots: Vec<Arc<dyn BotHandle>>,
}

impl StaticRoster {
    /// Create a roster from handles
    pub fn new(bots: Vec<Arc<dyn BotHandle>>) -> Self {
        Self { bots }
    }

    /// Number of bots
    pub fn len(&self) -> usize {
        self.bots.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }
}

#[async_trait]
impl BotRoster for StaticRoster {
    async fn load_bots(&self) -> Result<Vec<Arc<dyn BotHandle>>, String> {
        Ok(self.bots.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::presets;

    #[tokio::test]
    async fn test_static_roster_returns_same_bots() {
        let roster = StaticRoster::new(vec![presets::rock("A"), presets::paper("B")]);
        let bots = roster.load_bots().await.unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(bots[0].team_name(), "A");
        assert_eq!(bots[1].team_name(), "B");
    }
}
