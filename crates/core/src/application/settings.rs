// Reloadable runtime settings (global queue settings + message templates)

use crate::domain::{GlobalQueueSettings, MessageTemplates, QueueConfigSet};
use std::sync::{Arc, PoisonError, RwLock};

/// Immutable view handed to readers
#[derive(Debug, Clone, Default)]
pub struct SettingsSnapshot {
    pub queue: GlobalQueueSettings,
    pub messages: MessageTemplates,
}

/// Settings swapped atomically on reload; readers keep the snapshot they took
#[derive(Debug, Default)]
pub struct RuntimeSettings {
    current: RwLock<Arc<SettingsSnapshot>>,
}

impl RuntimeSettings {
    pub fn new(queue: GlobalQueueSettings, messages: MessageTemplates) -> Self {
        Self {
            current: RwLock::new(Arc::new(SettingsSnapshot { queue, messages })),
        }
    }

    pub fn from_config(config: &QueueConfigSet) -> Self {
        Self::new(config.queue.clone(), config.messages.clone())
    }

    pub fn snapshot(&self) -> Arc<SettingsSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace(&self, queue: GlobalQueueSettings, messages: MessageTemplates) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) =
            Arc::new(SettingsSnapshot { queue, messages });
    }
}
