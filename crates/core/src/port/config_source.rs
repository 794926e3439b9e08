// Queue Config Source Port
// Re-read on the reload command; the daemon backs it with its config file

use crate::domain::QueueConfigSet;
use crate::error::Result;

pub trait QueueConfigSource: Send + Sync {
    /// Load the current queue configuration
    fn load(&self) -> Result<QueueConfigSet>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Serves whatever config was last stored
    pub struct StaticConfigSource {
        config: Arc<Mutex<QueueConfigSet>>,
    }

    impl StaticConfigSource {
        pub fn new(config: QueueConfigSet) -> Self {
            Self {
                config: Arc::new(Mutex::new(config)),
            }
        }

        pub fn replace(&self, config: QueueConfigSet) {
            *self.config.lock().unwrap() = config;
        }
    }

    impl QueueConfigSource for StaticConfigSource {
        fn load(&self) -> Result<QueueConfigSet> {
            Ok(self.config.lock().unwrap().clone())
        }
    }
}
