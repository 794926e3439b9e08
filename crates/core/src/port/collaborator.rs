// Collaborator errors shared by the outbound ports

use thiserror::Error;

/// Failure talking to an external collaborator (proxy bridge, rank store)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("Collaborator unreachable: {0}")]
    Unreachable(String),

    #[error("Unexpected response: {0}")]
    BadResponse(String),

    #[error("Timed out after {0}ms")]
    Timeout(u64),
}
