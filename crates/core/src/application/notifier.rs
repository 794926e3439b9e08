// Position Notifier - periodic "you are N of M" reminders

use crate::application::feedback::Feedback;
use crate::application::shutdown::ShutdownToken;
use crate::domain::QueueRegistry;
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Re-checked this often while reminders are disabled (interval 0)
const DISABLED_RECHECK: Duration = Duration::from_secs(5);

pub struct PositionNotifier {
    registry: Arc<QueueRegistry>,
    feedback: Feedback,
}

impl PositionNotifier {
    pub fn new(registry: Arc<QueueRegistry>, feedback: Feedback) -> Self {
        Self { registry, feedback }
    }

    /// Run until shutdown. The interval is re-read every cycle so a reload
    /// takes effect without a restart.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!("Position notifier started");
        loop {
            if shutdown.is_shutdown() {
                break;
            }
            let seconds = self.feedback.settings().snapshot().queue.update_interval_seconds;
            let (wait, enabled) = if seconds == 0 {
                (DISABLED_RECHECK, false)
            } else {
                (Duration::from_secs(seconds), true)
            };

            tokio::select! {
                _ = sleep(wait) => {
                    if enabled {
                        let notified = self.notify_all();
                        debug!(notified = notified, "Position reminders sent");
                    }
                }
                _ = shutdown.wait() => break,
            }
        }
        info!("Position notifier stopped");
        Ok(())
    }

    /// Message every waiting player their current position
    pub fn notify_all(&self) -> usize {
        let waiting = self.registry.waiting_players();
        for (queue, entry, position) in &waiting {
            self.feedback.send_position(
                entry.player_id,
                |m| &m.position_update,
                queue,
                *position,
                &[],
            );
        }
        waiting.len()
    }
}
