// Port Layer - Interfaces for external collaborators

pub mod capacity;
pub mod collaborator;
pub mod config_source;
pub mod messenger;
pub mod permission;
pub mod priority;
pub mod time_provider; // For deterministic testing
pub mod transfer;

// Re-exports
pub use capacity::CapacityProbe;
pub use collaborator::CollaboratorError;
pub use config_source::QueueConfigSource;
pub use messenger::Messenger;
pub use permission::PermissionChecker;
pub use priority::PriorityResolver;
pub use time_provider::TimeProvider;
pub use transfer::{TransferGateway, TransferOutcome};
