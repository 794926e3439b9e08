// Transfer Gateway Port
// Moves a player to a backend server; the proxy performs the actual connect

use crate::domain::PlayerId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of a transfer request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum TransferOutcome {
    Success,
    Failure(String),
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success)
    }
}

/// Transfer Gateway trait
///
/// Implementations:
/// - HttpTransferGateway: asks the proxy bridge to connect the player
#[async_trait]
pub trait TransferGateway: Send + Sync {
    /// Hand `player_id` to the server named `destination`.
    ///
    /// Failures are reported in the outcome, never hidden.
    async fn transfer(&self, player_id: PlayerId, destination: &str) -> TransferOutcome;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Mock gateway behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed
        Success,
        /// Always fail with reason
        Fail(String),
        /// Never complete
        Hang,
    }

    /// Mock Transfer Gateway for testing
    pub struct MockTransferGateway {
        behavior: Arc<Mutex<MockBehavior>>,
        per_player: Arc<Mutex<HashMap<PlayerId, MockBehavior>>>,
        transfers: Arc<Mutex<Vec<(PlayerId, String)>>>,
    }

    impl MockTransferGateway {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                per_player: Arc::new(Mutex::new(HashMap::new())),
                transfers: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(reason: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(reason.into()))
        }

        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        /// Override the behavior for a single player
        pub fn set_player_behavior(&self, player_id: PlayerId, behavior: MockBehavior) {
            self.per_player.lock().unwrap().insert(player_id, behavior);
        }

        /// Every transfer request seen so far, in call order
        pub fn transfers(&self) -> Vec<(PlayerId, String)> {
            self.transfers.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.transfers.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TransferGateway for MockTransferGateway {
        async fn transfer(&self, player_id: PlayerId, destination: &str) -> TransferOutcome {
            self.transfers
                .lock()
                .unwrap()
                .push((player_id, destination.to_string()));

            let behavior = self
                .per_player
                .lock()
                .unwrap()
                .get(&player_id)
                .cloned()
                .unwrap_or_else(|| self.behavior.lock().unwrap().clone());

            match behavior {
                MockBehavior::Success => TransferOutcome::Success,
                MockBehavior::Fail(reason) => TransferOutcome::Failure(reason),
                MockBehavior::Hang => std::future::pending().await,
            }
        }
    }
}
