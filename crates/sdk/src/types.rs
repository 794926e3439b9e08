//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types served by the daemon.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct JoinRequest {
    pub player_id: Uuid,
    pub player_name: String,
    pub queue: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerRequest {
    pub player_id: Uuid,
}

/// Pause, unpause and send
#[derive(Debug, Clone, Serialize)]
pub struct QueueCommandRequest {
    pub queue: String,
    /// Issuing player; `None` for console/operator calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Position {
    pub position: usize,
    pub total: usize,
}

/// Why a join was refused
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum JoinRejection {
    QueueNotFound { queue: String },
    AlreadyQueued { queue: String },
    QueuePaused { queue: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JoinOutcome {
    Queued {
        queue: String,
        tier: u32,
        tier_label: String,
        position: Position,
    },
    Bypassed {
        queue: String,
    },
    Rejected {
        error: JoinRejection,
    },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LeaveOutcome {
    Left { queue: String },
    NotQueued,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PauseOutcome {
    Paused { queue: String },
    AlreadyPaused { queue: String },
    Unpaused { queue: String },
    AlreadyUnpaused { queue: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum TransferResolution {
    Transferred,
    Requeued { position: Position },
    Cancelled,
    Dropped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    Sent {
        queue: String,
        player_id: Uuid,
        player_name: String,
        resolution: TransferResolution,
    },
    Empty {
        queue: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionResponse {
    pub player_id: Uuid,
    pub queue: Option<String>,
    pub position: Option<usize>,
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisconnectResponse {
    pub player_id: Uuid,
    pub removed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueStatusView {
    pub name: String,
    pub paused: bool,
    pub auto_send: bool,
    pub max_players: usize,
    pub send_delay_seconds: u64,
    pub priority_slots: u32,
    pub waiting: usize,
    pub in_flight: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub queues: Vec<QueueStatusView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReloadResponse {
    pub loaded: Vec<String>,
    pub dropped: Vec<String>,
    pub evicted: usize,
    pub rejected: Vec<String>,
}
