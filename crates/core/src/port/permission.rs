// Permission Port
// Backed by the rank store behind the proxy; only ever asked, never blocked on

use crate::domain::PlayerId;
use crate::port::CollaboratorError;
use async_trait::async_trait;

/// Permission lookup for a player
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    /// Whether `player_id` holds `permission`
    ///
    /// # Errors
    /// - CollaboratorError if the lookup itself failed; callers treat this as
    ///   "not granted"
    async fn has_permission(
        &self,
        player_id: PlayerId,
        permission: &str,
    ) -> Result<bool, CollaboratorError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Mock checker behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Answer from the grant set
        Answer,
        /// Every lookup errors
        Fail(String),
        /// Every lookup hangs forever
        Hang,
        /// Answer after a delay
        Delay(Duration),
    }

    /// Mock PermissionChecker for testing
    pub struct MockPermissionChecker {
        grants: Arc<Mutex<HashSet<(PlayerId, String)>>>,
        behavior: Arc<Mutex<MockBehavior>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockPermissionChecker {
        pub fn new() -> Self {
            Self {
                grants: Arc::new(Mutex::new(HashSet::new())),
                behavior: Arc::new(Mutex::new(MockBehavior::Answer)),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn new_failing(message: impl Into<String>) -> Self {
            let checker = Self::new();
            checker.set_behavior(MockBehavior::Fail(message.into()));
            checker
        }

        pub fn new_hanging() -> Self {
            let checker = Self::new();
            checker.set_behavior(MockBehavior::Hang);
            checker
        }

        pub fn grant(&self, player_id: PlayerId, permission: impl Into<String>) {
            self.grants
                .lock()
                .unwrap()
                .insert((player_id, permission.into()));
        }

        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    impl Default for MockPermissionChecker {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl PermissionChecker for MockPermissionChecker {
        async fn has_permission(
            &self,
            player_id: PlayerId,
            permission: &str,
        ) -> Result<bool, CollaboratorError> {
            *self.call_count.lock().unwrap() += 1;
            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Answer => {}
                MockBehavior::Fail(msg) => return Err(CollaboratorError::Unreachable(msg)),
                MockBehavior::Hang => std::future::pending::<()>().await,
                MockBehavior::Delay(delay) => tokio::time::sleep(delay).await,
            }

            Ok(self
                .grants
                .lock()
                .unwrap()
                .contains(&(player_id, permission.to_string())))
        }
    }
}
