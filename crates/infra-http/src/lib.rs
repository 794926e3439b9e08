// Radium Infrastructure - Proxy Bridge Adapters
// Implements: PermissionChecker, PriorityResolver, TransferGateway, Messenger, CapacityProbe

pub mod capacity;
pub mod client;
pub mod messenger;
pub mod permission;
pub mod priority;
pub mod transfer;

pub use capacity::HttpCapacityProbe;
pub use client::BridgeClient;
pub use messenger::HttpMessenger;
pub use permission::HttpPermissionChecker;
pub use priority::HttpPriorityResolver;
pub use transfer::HttpTransferGateway;
