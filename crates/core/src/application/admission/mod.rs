//! Admission Controller - the single entry point for queue commands.
//!
//! A join reserves a ticket in the registry, runs the bypass checks and the
//! priority lookup concurrently (each bounded by the collaborator timeout),
//! then either hands the player straight to the transfer dispatcher or
//! completes the ticket into a line entry. If the player leaves while the
//! checks run, the ticket is gone and completing it is a no-op.

mod outcome;

pub use outcome::{Actor, JoinOutcome, LeaveOutcome, PauseOutcome, SendOutcome};

use crate::application::bounded;
use crate::application::constants::{queue_bypass_permission, ADMIN_PERMISSION, BYPASS_PERMISSION};
use crate::application::dispatch::TransferDispatcher;
use crate::application::feedback::Feedback;
use crate::domain::{
    AdmissionTicket, JoinError, PlayerId, Position, Priority, QueueConfigSet, QueueError,
    QueueName, QueueRegistry, QueueStatus, ReloadReport,
};
use crate::error::{AppError, Result};
use crate::port::{PermissionChecker, PriorityResolver};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Releases the reservation if the join future is dropped mid-check.
///
/// Abandoning a ticket that was already completed or cancelled is a no-op.
struct TicketGuard<'a> {
    registry: &'a QueueRegistry,
    ticket: AdmissionTicket,
}

impl Drop for TicketGuard<'_> {
    fn drop(&mut self) {
        if self.registry.abandon_admission(&self.ticket) {
            debug!(player = %self.ticket.player_id, queue = %self.ticket.queue, "Join abandoned mid-check");
        }
    }
}

pub struct AdmissionController {
    registry: Arc<QueueRegistry>,
    permissions: Arc<dyn PermissionChecker>,
    priorities: Arc<dyn PriorityResolver>,
    dispatcher: TransferDispatcher,
    feedback: Feedback,
    timeout: Duration,
}

impl AdmissionController {
    pub fn new(
        registry: Arc<QueueRegistry>,
        permissions: Arc<dyn PermissionChecker>,
        priorities: Arc<dyn PriorityResolver>,
        dispatcher: TransferDispatcher,
        feedback: Feedback,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            permissions,
            priorities,
            dispatcher,
            feedback,
            timeout,
        }
    }

    pub fn registry(&self) -> &Arc<QueueRegistry> {
        &self.registry
    }

    /// Admit a player into `queue`, or send them straight through if they
    /// hold a bypass permission
    pub async fn join(&self, player_id: PlayerId, player_name: &str, queue: &str) -> JoinOutcome {
        let ticket = match self.registry.reserve_admission(player_id, player_name, queue) {
            Ok(ticket) => ticket,
            Err(error) => {
                self.reject(player_id, &error);
                return JoinOutcome::Rejected { error };
            }
        };
        let guard = TicketGuard {
            registry: &self.registry,
            ticket,
        };
        let ticket = &guard.ticket;

        let queue_permission = queue_bypass_permission(queue);
        let (global, scoped, tier) = tokio::join!(
            self.check_permission(player_id, BYPASS_PERMISSION),
            self.check_permission(player_id, &queue_permission),
            self.resolve_tier(player_id),
        );

        if global || scoped {
            return match self.registry.admit_for_transfer(ticket, tier) {
                Ok(Some(transfer)) => {
                    info!(player = %player_id, queue = %queue, "Player bypassed queue");
                    self.feedback
                        .send(player_id, |m| &m.bypassed, &[("queue", queue)]);
                    // detached; the dispatcher resolves the marker itself
                    let _ = self.dispatcher.dispatch(transfer);
                    JoinOutcome::Bypassed {
                        queue: queue.to_string(),
                    }
                }
                Ok(None) => {
                    debug!(player = %player_id, queue = %queue, "Join cancelled before bypass");
                    JoinOutcome::Cancelled
                }
                Err(error) => {
                    self.reject(player_id, &error);
                    JoinOutcome::Rejected { error }
                }
            };
        }

        match self.registry.complete_admission(ticket, tier) {
            Ok(Some(position)) => {
                let label = self.feedback.settings().snapshot().queue.label_for(tier).to_string();
                info!(
                    player = %player_id,
                    queue = %queue,
                    tier = tier,
                    position = position.position,
                    "Player queued"
                );
                self.feedback.send_position(
                    player_id,
                    |m| &m.joined,
                    queue,
                    position,
                    &[("tier", label.as_str())],
                );
                JoinOutcome::Queued {
                    queue: queue.to_string(),
                    tier,
                    tier_label: label,
                    position,
                }
            }
            Ok(None) => {
                debug!(player = %player_id, queue = %queue, "Join cancelled before admission");
                JoinOutcome::Cancelled
            }
            Err(error) => {
                self.reject(player_id, &error);
                JoinOutcome::Rejected { error }
            }
        }
    }

    /// Explicit leave command
    pub fn leave(&self, player_id: PlayerId) -> LeaveOutcome {
        match self.registry.remove_player(&player_id) {
            Some(queue) => {
                info!(player = %player_id, queue = %queue, "Player left queue");
                self.feedback
                    .send(player_id, |m| &m.left, &[("queue", queue.as_str())]);
                LeaveOutcome::Left { queue }
            }
            None => {
                self.feedback.send(player_id, |m| &m.not_queued, &[]);
                LeaveOutcome::NotQueued
            }
        }
    }

    /// Player went offline; remove silently
    pub fn disconnect(&self, player_id: PlayerId) -> bool {
        match self.registry.remove_player(&player_id) {
            Some(queue) => {
                debug!(player = %player_id, queue = %queue, "Removed disconnected player");
                true
            }
            None => false,
        }
    }

    pub async fn pause(&self, actor: Actor, queue: &str) -> Result<PauseOutcome> {
        self.authorize(actor).await?;
        let outcome = if self.registry.pause(queue)? {
            PauseOutcome::Paused {
                queue: queue.to_string(),
            }
        } else {
            PauseOutcome::AlreadyPaused {
                queue: queue.to_string(),
            }
        };
        self.report_pause(actor, &outcome, queue);
        Ok(outcome)
    }

    pub async fn unpause(&self, actor: Actor, queue: &str) -> Result<PauseOutcome> {
        self.authorize(actor).await?;
        let outcome = if self.registry.unpause(queue)? {
            PauseOutcome::Unpaused {
                queue: queue.to_string(),
            }
        } else {
            PauseOutcome::AlreadyUnpaused {
                queue: queue.to_string(),
            }
        };
        self.report_pause(actor, &outcome, queue);
        Ok(outcome)
    }

    fn report_pause(&self, actor: Actor, outcome: &PauseOutcome, queue: &str) {
        let Some(player_id) = actor.player_id() else {
            return;
        };
        let vars = [("queue", queue)];
        match outcome {
            PauseOutcome::Paused { .. } => self.feedback.send(player_id, |m| &m.paused, &vars),
            PauseOutcome::AlreadyPaused { .. } => {
                self.feedback.send(player_id, |m| &m.already_paused, &vars)
            }
            PauseOutcome::Unpaused { .. } => self.feedback.send(player_id, |m| &m.unpaused, &vars),
            PauseOutcome::AlreadyUnpaused { .. } => {
                self.feedback.send(player_id, |m| &m.already_unpaused, &vars)
            }
        }
    }

    /// Force the head of a line into transfer, ignoring capacity, pacing
    /// and the paused flag. Waits for the transfer to resolve.
    pub async fn send_next(&self, actor: Actor, queue: &str) -> Result<SendOutcome> {
        self.authorize(actor).await?;
        if self.registry.definition(queue).is_none() {
            return Err(QueueError::NotFound(queue.to_string()).into());
        }
        let Some(transfer) = self.registry.take_for_transfer(queue) else {
            return Ok(SendOutcome::Empty {
                queue: queue.to_string(),
            });
        };

        let player_id = transfer.entry.player_id;
        let player_name = transfer.entry.player_name.clone();
        info!(player = %player_id, queue = %queue, "Manual send");
        let resolution = self.dispatcher.run(transfer).await;
        Ok(SendOutcome::Sent {
            queue: queue.to_string(),
            player_id,
            player_name,
            resolution,
        })
    }

    pub fn position(&self, player_id: PlayerId) -> Option<(QueueName, Position)> {
        let queue = self.registry.current_queue_of(&player_id)?;
        let position = self.registry.position_of(&player_id)?;
        Some((queue, position))
    }

    pub fn statuses(&self) -> Vec<QueueStatus> {
        self.registry.statuses()
    }

    /// Swap in a reloaded configuration and tell evicted players why
    pub fn apply_config(&self, config: &QueueConfigSet) -> ReloadReport {
        self.feedback
            .settings()
            .replace(config.queue.clone(), config.messages.clone());
        let report = self.registry.load_definitions(&config.queues);

        for (queue, entry) in &report.evicted {
            self.feedback.send(
                entry.player_id,
                |m| &m.queue_removed,
                &[("queue", queue.as_str())],
            );
        }
        report
    }

    fn reject(&self, player_id: PlayerId, error: &JoinError) {
        debug!(player = %player_id, error = %error, "Join rejected");
        match error {
            JoinError::QueueNotFound { queue } => {
                self.feedback
                    .send(player_id, |m| &m.queue_not_found, &[("queue", queue.as_str())])
            }
            JoinError::AlreadyQueued { queue } => {
                self.feedback
                    .send(player_id, |m| &m.already_queued, &[("queue", queue.as_str())])
            }
            JoinError::QueuePaused { queue } => {
                self.feedback
                    .send(player_id, |m| &m.queue_paused, &[("queue", queue.as_str())])
            }
        }
    }

    /// Permission lookup that treats errors and timeouts as "denied"
    async fn check_permission(&self, player_id: PlayerId, permission: &str) -> bool {
        match bounded(
            self.timeout,
            self.permissions.has_permission(player_id, permission),
        )
        .await
        {
            Ok(granted) => granted,
            Err(e) => {
                warn!(player = %player_id, permission = %permission, error = %e, "Permission check failed, denying");
                false
            }
        }
    }

    /// Rank lookup mapped onto the configured tiers; falls back to the default tier
    async fn resolve_tier(&self, player_id: PlayerId) -> Priority {
        let settings = self.feedback.settings().snapshot();
        match bounded(self.timeout, self.priorities.priority_tier(player_id)).await {
            Ok(tier) => settings.queue.normalize_tier(tier),
            Err(e) => {
                warn!(player = %player_id, error = %e, "Priority lookup failed, using default tier");
                settings.queue.default_tier()
            }
        }
    }

    async fn authorize(&self, actor: Actor) -> Result<()> {
        let Actor::Player(player_id) = actor else {
            return Ok(());
        };
        if self.check_permission(player_id, ADMIN_PERMISSION).await {
            return Ok(());
        }
        self.feedback.send(player_id, |m| &m.no_permission, &[]);
        Err(AppError::Forbidden(format!(
            "{} requires {}",
            player_id, ADMIN_PERMISSION
        )))
    }
}
