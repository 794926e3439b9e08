//! RPC Request/Response Types
//!
//! Method parameters and results. Player-facing outcomes are serialized
//! straight from the core outcome enums.

use radium_core::domain::{PlayerId, QueueStatus, ReloadReport};
use serde::{Deserialize, Serialize};

/// queue.join.v1
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub player_id: PlayerId,
    pub player_name: String,
    pub queue: String,
}

/// queue.leave.v1, queue.position.v1, player.disconnect.v1
#[derive(Debug, Deserialize)]
pub struct PlayerRequest {
    pub player_id: PlayerId,
}

/// queue.pause.v1, queue.unpause.v1, queue.send.v1
#[derive(Debug, Deserialize)]
pub struct QueueCommandRequest {
    pub queue: String,
    /// Issuing player; absent for console calls
    #[serde(default)]
    pub actor: Option<PlayerId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionResponse {
    pub player_id: PlayerId,
    pub queue: Option<String>,
    pub position: Option<usize>,
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisconnectResponse {
    pub player_id: PlayerId,
    pub removed: bool,
}

/// One row of queue.status.v1
#[derive(Debug, Clone, Serialize)]
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

impl From<QueueStatus> for QueueStatusView {
    fn from(status: QueueStatus) -> Self {
        let def = status.definition;
        Self {
            name: def.name,
            paused: def.paused,
            auto_send: def.auto_send,
            max_players: def.max_players,
            send_delay_seconds: def.send_delay.as_secs(),
            priority_slots: def.priority_slots,
            waiting: status.waiting,
            in_flight: status.in_flight,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub queues: Vec<QueueStatusView>,
}

/// admin.reload.v1
#[derive(Debug, Clone, Serialize)]
pub struct ReloadResponse {
    pub loaded: Vec<String>,
    pub dropped: Vec<String>,
    pub evicted: usize,
    pub rejected: Vec<String>,
}

impl From<ReloadReport> for ReloadResponse {
    fn from(report: ReloadReport) -> Self {
        Self {
            loaded: report.loaded,
            dropped: report.dropped,
            evicted: report.evicted.len(),
            rejected: report.rejected,
        }
    }
}
