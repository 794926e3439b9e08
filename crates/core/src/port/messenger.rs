// Messenger Port (fire-and-forget chat feedback)

use crate::domain::PlayerId;

pub trait Messenger: Send + Sync {
    /// Queue a chat message for a player; delivery is not awaited
    fn send_message(&self, player_id: PlayerId, text: &str);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every message instead of delivering it
    #[derive(Default)]
    pub struct RecordingMessenger {
        sent: Arc<Mutex<Vec<(PlayerId, String)>>>,
    }

    impl RecordingMessenger {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn messages_for(&self, player_id: PlayerId) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .filter(|(id, _)| *id == player_id)
                .map(|(_, text)| text.clone())
                .collect()
        }

        pub fn last_for(&self, player_id: PlayerId) -> Option<String> {
            self.messages_for(player_id).pop()
        }

        pub fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl Messenger for RecordingMessenger {
        fn send_message(&self, player_id: PlayerId, text: &str) {
            self.sent.lock().unwrap().push((player_id, text.to_string()));
        }
    }
}
