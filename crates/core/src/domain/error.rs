// Domain Error Types

use crate::domain::entry::PlayerId;
use crate::domain::queue::QueueName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a player cannot be admitted into a queue
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum JoinError {
    #[error("Queue not found: {queue}")]
    QueueNotFound { queue: QueueName },

    #[error("Player is already queued for {queue}")]
    AlreadyQueued { queue: QueueName },

    #[error("Queue is paused: {queue}")]
    QueuePaused { queue: QueueName },
}

/// Errors for operations that address a queue by name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue not found: {0}")]
    NotFound(QueueName),

    #[error("Invalid queue settings for {queue}: {reason}")]
    InvalidSettings { queue: QueueName, reason: String },
}

/// The reverse index and the lines disagree.
///
/// Registry mutations update both under one write lock, so this only ever
/// surfaces from `QueueRegistry::verify_consistency` as a programming error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryInconsistency {
    #[error("Index maps player {player} to {queue} but that line has no entry for them")]
    DanglingIndex { player: PlayerId, queue: QueueName },

    #[error("Index maps player {player} to unknown queue {queue}")]
    UnknownQueue { player: PlayerId, queue: QueueName },

    #[error("Player {player} is in line {queue} without an index entry")]
    Unindexed { player: PlayerId, queue: QueueName },

    #[error("Player {player} is in line {queue} but indexed to {indexed}")]
    Mismatched {
        player: PlayerId,
        queue: QueueName,
        indexed: QueueName,
    },
}
