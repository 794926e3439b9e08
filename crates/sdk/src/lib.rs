//! Radium SDK - Rust Client Library
//!
//! Client for the Radium queue daemon's JSON-RPC surface.
//!
//! # Example
//!
//! ```no_run
//! use radium_sdk::{JoinOutcome, RadiumQueueClient};
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RadiumQueueClient::connect("http://127.0.0.1:9640").await?;
//!
//!     let player = Uuid::new_v4();
//!     if let JoinOutcome::Queued { position, .. } = client.join(player, "Steve", "practice").await? {
//!         println!("Position {} of {}", position.position, position.total);
//!     }
//!
//!     client.leave(player).await?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::RadiumQueueClient;
pub use error::{Result, SdkError};
pub use types::{
    DisconnectResponse, JoinOutcome, JoinRejection, JoinRequest, LeaveOutcome, PauseOutcome,
    PlayerRequest, Position, PositionResponse, QueueCommandRequest, QueueStatusView,
    ReloadResponse, SendOutcome, StatusResponse, TransferResolution,
};
