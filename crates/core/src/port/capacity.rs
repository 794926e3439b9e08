// Capacity Probe Port
// Occupancy is a property of the destination server, not of the line

use crate::port::CollaboratorError;
use async_trait::async_trait;

#[async_trait]
pub trait CapacityProbe: Send + Sync {
    /// Players currently connected to `destination`
    async fn online_players(&self, destination: &str) -> Result<usize, CollaboratorError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    /// Mock probe with settable per-server counts (unknown servers are empty)
    #[derive(Default)]
    pub struct MockCapacityProbe {
        online: Arc<Mutex<HashMap<String, usize>>>,
        failing: Arc<Mutex<bool>>,
        hanging: Arc<Mutex<HashSet<String>>>,
    }

    impl MockCapacityProbe {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_online(&self, destination: impl Into<String>, count: usize) {
            self.online.lock().unwrap().insert(destination.into(), count);
        }

        pub fn set_failing(&self, failing: bool) {
            *self.failing.lock().unwrap() = failing;
        }

        /// Lookups for `destination` never answer
        pub fn set_hanging(&self, destination: impl Into<String>) {
            self.hanging.lock().unwrap().insert(destination.into());
        }
    }

    #[async_trait]
    impl CapacityProbe for MockCapacityProbe {
        async fn online_players(&self, destination: &str) -> Result<usize, CollaboratorError> {
            let hangs = self.hanging.lock().unwrap().contains(destination);
            if hangs {
                std::future::pending::<()>().await;
            }
            if *self.failing.lock().unwrap() {
                return Err(CollaboratorError::Unreachable(format!(
                    "{} did not answer",
                    destination
                )));
            }
            Ok(self
                .online
                .lock()
                .unwrap()
                .get(destination)
                .copied()
                .unwrap_or(0))
        }
    }
}
