// Domain Layer - Queue entities, the priority line and the registry

pub mod entry;
pub mod error;
pub mod line;
pub mod messages;
pub mod queue;
pub mod registry;

// Re-exports
pub use entry::{PlayerId, Priority, QueueEntry, DEFAULT_PRIORITY_TIER};
pub use error::{JoinError, QueueError, RegistryInconsistency};
pub use line::{Position, PriorityLine};
pub use messages::MessageTemplates;
pub use queue::{
    GlobalQueueSettings, QueueConfigSet, QueueDefinition, QueueName, QueueSettings,
};
pub use registry::{
    AdmissionTicket, InFlightTransfer, QueueRegistry, QueueStatus, ReloadReport, RequeueResult,
};
