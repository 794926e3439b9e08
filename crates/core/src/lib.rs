// Radium Core - Queue Domain, Admission Control & Ports
// NO infrastructure dependencies: HTTP/RPC adapters live in their own crates

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
