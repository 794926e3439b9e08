// Queue Domain Model

use crate::domain::entry::{Priority, DEFAULT_PRIORITY_TIER};
use crate::domain::error::QueueError;
use crate::domain::messages::MessageTemplates;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Queue identifier (matches the destination server name)
pub type QueueName = String;

const MAX_QUEUE_NAME_LEN: usize = 64;

/// Per-queue configuration as loaded from the config source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum concurrent occupancy on the destination server
    #[serde(default = "default_max_players")]
    pub max_players: usize,

    #[serde(default = "default_auto_send")]
    pub auto_send: bool,

    /// Pacing between non-priority transfers
    #[serde(default = "default_send_delay_seconds")]
    pub send_delay_seconds: u64,

    /// Tiers 1..=priority_slots are treated as priority tiers
    #[serde(default)]
    pub priority_slots: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_max_players() -> usize {
    100
}

fn default_auto_send() -> bool {
    true
}

fn default_send_delay_seconds() -> u64 {
    1
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_players: default_max_players(),
            auto_send: default_auto_send(),
            send_delay_seconds: default_send_delay_seconds(),
            priority_slots: 0,
        }
    }
}

impl QueueSettings {
    /// Validate settings for the queue `name`
    pub fn validate(&self, name: &str) -> Result<(), QueueError> {
        let invalid = |reason: &str| QueueError::InvalidSettings {
            queue: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("queue name cannot be empty"));
        }
        if name.len() > MAX_QUEUE_NAME_LEN {
            return Err(invalid("queue name too long"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(invalid(
                "queue name must be alphanumeric (underscores and dashes allowed)",
            ));
        }
        if self.max_players == 0 {
            return Err(invalid("max_players must be at least 1"));
        }
        Ok(())
    }
}

/// Network-wide queue settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalQueueSettings {
    /// Positions beyond this are rendered as "<max>+"
    #[serde(default = "default_max_position_display")]
    pub max_position_display: usize,

    /// Period of position reminders sent to queued players (0 disables)
    #[serde(default = "default_update_interval_seconds")]
    pub update_interval_seconds: u64,

    /// Tier -> label, e.g. 1 = "Owner"
    #[serde(default, deserialize_with = "deserialize_priority_levels")]
    pub priority_levels: BTreeMap<Priority, String>,
}

fn default_max_position_display() -> usize {
    100
}

fn default_update_interval_seconds() -> u64 {
    10
}

impl Default for GlobalQueueSettings {
    fn default() -> Self {
        Self {
            max_position_display: default_max_position_display(),
            update_interval_seconds: default_update_interval_seconds(),
            priority_levels: BTreeMap::new(),
        }
    }
}

/// Config sources only carry string keys, so tiers arrive as "1", "2", ...
fn deserialize_priority_levels<'de, D>(deserializer: D) -> Result<BTreeMap<Priority, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(tier, label)| {
            tier.trim()
                .parse::<Priority>()
                .map(|tier| (tier, label))
                .map_err(|_| serde::de::Error::custom(format!("invalid priority tier: {}", tier)))
        })
        .collect()
}

impl GlobalQueueSettings {
    /// Lowest configured tier (highest number); used when a rank is unknown
    pub fn default_tier(&self) -> Priority {
        self.priority_levels
            .keys()
            .next_back()
            .copied()
            .unwrap_or(DEFAULT_PRIORITY_TIER)
    }

    /// Map a resolved tier onto a configured one; unlabelled tiers fall back
    /// to the default tier
    pub fn normalize_tier(&self, tier: Priority) -> Priority {
        if tier == 0 {
            return self.default_tier();
        }
        if self.priority_levels.is_empty() || self.priority_levels.contains_key(&tier) {
            tier
        } else {
            self.default_tier()
        }
    }

    pub fn label_for(&self, tier: Priority) -> &str {
        self.priority_levels
            .get(&tier)
            .map(String::as_str)
            .unwrap_or("Default")
    }

    /// Render a position honouring `max_position_display`
    pub fn display_position(&self, position: usize) -> String {
        if self.max_position_display > 0 && position > self.max_position_display {
            format!("{}+", self.max_position_display)
        } else {
            position.to_string()
        }
    }
}

/// Everything the reload command re-reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfigSet {
    #[serde(default)]
    pub queue: GlobalQueueSettings,

    #[serde(default)]
    pub queues: BTreeMap<QueueName, QueueSettings>,

    #[serde(default)]
    pub messages: MessageTemplates,
}

/// A loaded queue with its runtime state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueDefinition {
    pub name: QueueName,
    pub max_players: usize,
    pub auto_send: bool,
    pub send_delay: Duration,
    pub priority_slots: u32,
    pub paused: bool,
}

impl QueueDefinition {
    pub fn from_settings(name: impl Into<String>, settings: &QueueSettings) -> Self {
        Self {
            name: name.into(),
            max_players: settings.max_players,
            auto_send: settings.auto_send,
            send_delay: Duration::from_secs(settings.send_delay_seconds),
            priority_slots: settings.priority_slots,
            paused: false,
        }
    }

    /// Apply reloaded settings, keeping runtime state (paused flag)
    pub fn apply(&mut self, settings: &QueueSettings) {
        self.max_players = settings.max_players;
        self.auto_send = settings.auto_send;
        self.send_delay = Duration::from_secs(settings.send_delay_seconds);
        self.priority_slots = settings.priority_slots;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> GlobalQueueSettings {
        let mut settings = GlobalQueueSettings::default();
        settings.priority_levels.insert(1, "Owner".to_string());
        settings.priority_levels.insert(2, "Admin".to_string());
        settings.priority_levels.insert(10, "Member".to_string());
        settings
    }

    #[test]
    fn test_default_tier_is_lowest_configured() {
        assert_eq!(levels().default_tier(), 10);
        assert_eq!(
            GlobalQueueSettings::default().default_tier(),
            DEFAULT_PRIORITY_TIER
        );
    }

    #[test]
    fn test_unlabelled_tier_falls_back() {
        let settings = levels();
        assert_eq!(settings.normalize_tier(2), 2);
        assert_eq!(settings.normalize_tier(7), 10);
        assert_eq!(settings.normalize_tier(0), 10);
        assert_eq!(settings.label_for(7), "Default");
        assert_eq!(settings.label_for(1), "Owner");
    }

    #[test]
    fn test_display_position_caps() {
        let mut settings = GlobalQueueSettings::default();
        settings.max_position_display = 50;
        assert_eq!(settings.display_position(12), "12");
        assert_eq!(settings.display_position(50), "50");
        assert_eq!(settings.display_position(51), "50+");
    }

    #[test]
    fn test_priority_levels_from_string_keys() {
        let json = serde_json::json!({
            "priority_levels": { "1": "Owner", "3": "VIP" }
        });
        let settings: GlobalQueueSettings = serde_json::from_value(json).unwrap();
        assert_eq!(settings.priority_levels.get(&3).map(String::as_str), Some("VIP"));
        assert_eq!(settings.max_position_display, 100);
    }

    #[test]
    fn test_validate_queue_names() {
        let settings = QueueSettings::default();
        assert!(settings.validate("practice").is_ok());
        assert!(settings.validate("bed-wars_2").is_ok());
        assert!(settings.validate("").is_err());
        assert!(settings.validate("bad queue!").is_err());
        assert!(settings.validate(&"a".repeat(65)).is_err());

        let closed = QueueSettings {
            max_players: 0,
            ..QueueSettings::default()
        };
        assert!(closed.validate("practice").is_err());
    }

    #[test]
    fn test_apply_keeps_paused() {
        let mut def = QueueDefinition::from_settings("practice", &QueueSettings::default());
        def.paused = true;
        def.apply(&QueueSettings {
            max_players: 10,
            ..QueueSettings::default()
        });
        assert!(def.paused);
        assert_eq!(def.max_players, 10);
    }
}
