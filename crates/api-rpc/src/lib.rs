//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 command surface of the Radium queue daemon.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
pub use jsonrpsee::server::ServerHandle;
