// Queue Entry Domain Model

use serde::{Deserialize, Serialize};

/// Player identifier (Minecraft UUID)
pub type PlayerId = uuid::Uuid;

/// Priority tier (lower number = served first)
pub type Priority = u32;

/// Tier assigned when no priority levels are configured
pub const DEFAULT_PRIORITY_TIER: Priority = 50;

/// A player waiting in a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub priority: Priority,
    /// Epoch ms at which the player entered the line
    pub joined_at: i64,
    /// Registry-wide insertion counter, breaks same-millisecond ties
    pub sequence: u64,
}

/// Total order of a line: (priority, joined_at, sequence) ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct EntryKey {
    priority: Priority,
    joined_at: i64,
    sequence: u64,
}

impl QueueEntry {
    pub fn new(
        player_id: PlayerId,
        player_name: impl Into<String>,
        priority: Priority,
        joined_at: i64,
        sequence: u64,
    ) -> Self {
        Self {
            player_id,
            player_name: player_name.into(),
            priority,
            joined_at,
            sequence,
        }
    }

    pub(crate) fn key(&self) -> EntryKey {
        EntryKey {
            priority: self.priority,
            joined_at: self.joined_at,
            sequence: self.sequence,
        }
    }

    /// Whether this entry sits in one of the reserved priority tiers (1..=slots)
    pub fn is_priority_tier(&self, priority_slots: u32) -> bool {
        self.priority <= priority_slots
    }
}
