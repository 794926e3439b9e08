// Application Layer - Admission control and background queue tasks

pub mod admission;
pub mod constants;
pub mod dispatch;
pub mod feedback;
pub mod notifier;
pub mod promotion;
pub mod settings;
mod shutdown;

// Re-exports
pub use admission::{
    Actor, AdmissionController, JoinOutcome, LeaveOutcome, PauseOutcome, SendOutcome,
};
pub use dispatch::{TransferDispatcher, TransferResolution};
pub use feedback::Feedback;
pub use notifier::PositionNotifier;
pub use promotion::PromotionSweep;
pub use settings::{RuntimeSettings, SettingsSnapshot};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::port::CollaboratorError;
use std::future::Future;
use std::time::Duration;

/// Bound a collaborator call; an elapsed timer becomes `CollaboratorError::Timeout`
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, CollaboratorError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout(limit.as_millis() as u64)),
    }
}
