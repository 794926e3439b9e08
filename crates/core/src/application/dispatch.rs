// Transfer dispatch - runs one transfer per task and resolves the in-flight marker

use crate::application::bounded;
use crate::application::feedback::Feedback;
use crate::domain::{InFlightTransfer, Position, QueueRegistry, RequeueResult};
use crate::port::{CollaboratorError, TransferGateway, TransferOutcome};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// How a dispatched transfer ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum TransferResolution {
    Transferred,
    /// Failed and put back in line
    Requeued { position: Position },
    /// The player left while the transfer was in flight
    Cancelled,
    /// Failed and could not be put back (queue removed or player elsewhere)
    Dropped { reason: String },
}

/// Hands in-flight entries to the gateway without blocking the caller
#[derive(Clone)]
pub struct TransferDispatcher {
    registry: Arc<QueueRegistry>,
    gateway: Arc<dyn TransferGateway>,
    feedback: Feedback,
    timeout: Duration,
}

impl TransferDispatcher {
    pub fn new(
        registry: Arc<QueueRegistry>,
        gateway: Arc<dyn TransferGateway>,
        feedback: Feedback,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            gateway,
            feedback,
            timeout,
        }
    }

    /// Start the transfer on its own task.
    ///
    /// A panicking gateway only takes down that task; the in-flight marker
    /// is cleared again when the player leaves.
    pub fn dispatch(&self, transfer: InFlightTransfer) -> JoinHandle<TransferResolution> {
        let this = self.clone();
        tokio::spawn(async move { this.run(transfer).await })
    }

    /// Perform the transfer inline and resolve it
    pub async fn run(&self, transfer: InFlightTransfer) -> TransferResolution {
        let player_id = transfer.entry.player_id;
        let destination = transfer.queue.as_str();

        self.feedback
            .send(player_id, |m| &m.sending, &[("queue", destination)]);

        let gateway = Arc::clone(&self.gateway);
        let outcome = bounded(self.timeout, async move {
            Ok::<_, CollaboratorError>(gateway.transfer(player_id, destination).await)
        })
        .await
        .unwrap_or_else(|e| TransferOutcome::Failure(e.to_string()));

        match outcome {
            TransferOutcome::Success => {
                if self.registry.finish_transfer(&transfer) {
                    info!(player = %player_id, queue = %destination, "Player transferred");
                    TransferResolution::Transferred
                } else {
                    info!(player = %player_id, queue = %destination, "Transfer completed after player left");
                    TransferResolution::Cancelled
                }
            }
            TransferOutcome::Failure(reason) => self.resolve_failure(&transfer, reason),
        }
    }

    fn resolve_failure(&self, transfer: &InFlightTransfer, reason: String) -> TransferResolution {
        let player_id = transfer.entry.player_id;
        let queue = transfer.queue.as_str();

        match self.registry.requeue_after_failure(transfer) {
            RequeueResult::Requeued(position) => {
                warn!(
                    player = %player_id,
                    queue = %queue,
                    reason = %reason,
                    position = position.position,
                    "Transfer failed, player requeued"
                );
                self.feedback.send_position(
                    player_id,
                    |m| &m.transfer_failed,
                    queue,
                    position,
                    &[("reason", reason.as_str())],
                );
                TransferResolution::Requeued { position }
            }
            RequeueResult::Cancelled => {
                info!(player = %player_id, queue = %queue, "Transfer failed after player left");
                TransferResolution::Cancelled
            }
            RequeueResult::QueueGone | RequeueResult::AlreadyQueued(_) => {
                warn!(player = %player_id, queue = %queue, reason = %reason, "Transfer failed, player not requeued");
                self.feedback.send(
                    player_id,
                    |m| &m.transfer_failed_final,
                    &[("queue", queue), ("reason", reason.as_str())],
                );
                TransferResolution::Dropped { reason }
            }
        }
    }
}
