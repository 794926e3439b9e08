// Queue engine constants (no magic values)
use std::time::Duration;

/// Period of the promotion sweep (1s)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on any single collaborator call (permission, rank, probe, transfer)
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(3);

/// Permission that skips every queue
pub const BYPASS_PERMISSION: &str = "radium.queue.bypass";

/// Prefix of the per-queue bypass permission, e.g. `radium.queue.bypass.practice`
pub const QUEUE_BYPASS_PERMISSION_PREFIX: &str = "radium.queue.bypass.";

/// Permission required for pause/unpause/send when issued by a player
pub const ADMIN_PERMISSION: &str = "radium.queue.admin";

/// Per-queue bypass permission key
pub fn queue_bypass_permission(queue: &str) -> String {
    format!("{}{}", QUEUE_BYPASS_PERMISSION_PREFIX, queue)
}
