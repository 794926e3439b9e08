// Player-facing outcomes of controller operations

use crate::application::dispatch::TransferResolution;
use crate::domain::{JoinError, PlayerId, Position, Priority, QueueName};
use serde::{Deserialize, Serialize};

/// Who issued a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "player_id", rename_all = "snake_case")]
pub enum Actor {
    /// Operator console or RPC caller without a player identity
    Console,
    Player(PlayerId),
}

impl Actor {
    pub fn player_id(&self) -> Option<PlayerId> {
        match self {
            Actor::Console => None,
            Actor::Player(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JoinOutcome {
    /// Waiting in line
    Queued {
        queue: QueueName,
        tier: Priority,
        tier_label: String,
        position: Position,
    },
    /// Skipped the line; the transfer is already running
    Bypassed { queue: QueueName },
    Rejected { error: JoinError },
    /// The player left before the admission checks finished
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LeaveOutcome {
    Left { queue: QueueName },
    NotQueued,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PauseOutcome {
    Paused { queue: QueueName },
    AlreadyPaused { queue: QueueName },
    Unpaused { queue: QueueName },
    AlreadyUnpaused { queue: QueueName },
}

impl PauseOutcome {
    /// True when the call changed the queue state
    pub fn changed(&self) -> bool {
        matches!(self, PauseOutcome::Paused { .. } | PauseOutcome::Unpaused { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    Sent {
        queue: QueueName,
        player_id: PlayerId,
        player_name: String,
        resolution: TransferResolution,
    },
    /// Nobody was waiting
    Empty { queue: QueueName },
}
