// Priority Resolver Port
// Maps a player's rank onto a queue priority tier

use crate::domain::{PlayerId, Priority};
use crate::port::CollaboratorError;
use async_trait::async_trait;

#[async_trait]
pub trait PriorityResolver: Send + Sync {
    /// Priority tier of the player's highest rank (lower = served first)
    async fn priority_tier(&self, player_id: PlayerId) -> Result<Priority, CollaboratorError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Mock resolver: fixed tiers per player, error for everyone else
    pub struct MockPriorityResolver {
        tiers: Arc<Mutex<HashMap<PlayerId, Priority>>>,
        fallback: Option<Priority>,
    }

    impl MockPriorityResolver {
        /// Unknown players resolve with an error
        pub fn new() -> Self {
            Self {
                tiers: Arc::new(Mutex::new(HashMap::new())),
                fallback: None,
            }
        }

        /// Unknown players resolve to `tier`
        pub fn with_fallback(tier: Priority) -> Self {
            Self {
                tiers: Arc::new(Mutex::new(HashMap::new())),
                fallback: Some(tier),
            }
        }

        pub fn set_tier(&self, player_id: PlayerId, tier: Priority) {
            self.tiers.lock().unwrap().insert(player_id, tier);
        }
    }

    impl Default for MockPriorityResolver {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl PriorityResolver for MockPriorityResolver {
        async fn priority_tier(&self, player_id: PlayerId) -> Result<Priority, CollaboratorError> {
            self.tiers
                .lock()
                .unwrap()
                .get(&player_id)
                .copied()
                .or(self.fallback)
                .ok_or_else(|| CollaboratorError::BadResponse(format!("no rank for {}", player_id)))
        }
    }
}
