//! Promotion sweep - periodically moves line heads into transfer.
//!
//! Every tick, each queue that auto-sends and is not paused gets:
//! - a capacity probe: free = max_players - online - in_flight
//! - up to `priority_slots` priority-tier heads sent immediately
//! - at most one other head per `send_delay`
//!
//! Probes for different queues run concurrently. A probe error or timeout
//! skips the queue until the next tick.

use crate::application::bounded;
use crate::application::dispatch::TransferDispatcher;
use crate::application::shutdown::ShutdownToken;
use crate::domain::{QueueDefinition, QueueName, QueueRegistry};
use crate::error::Result;
use crate::port::CapacityProbe;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

pub struct PromotionSweep {
    registry: Arc<QueueRegistry>,
    capacity: Arc<dyn CapacityProbe>,
    dispatcher: TransferDispatcher,
    interval: Duration,
    timeout: Duration,
    /// Last paced (non-priority) send per queue
    last_paced: Mutex<HashMap<QueueName, Instant>>,
}

impl PromotionSweep {
    pub fn new(
        registry: Arc<QueueRegistry>,
        capacity: Arc<dyn CapacityProbe>,
        dispatcher: TransferDispatcher,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            capacity,
            dispatcher,
            interval,
            timeout,
            last_paced: Mutex::new(HashMap::new()),
        }
    }

    /// Run the sweep until shutdown
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!(interval_ms = self.interval.as_millis() as u64, "Promotion sweep started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if shutdown.is_shutdown() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    let sent = self.tick().await;
                    if sent > 0 {
                        debug!(sent = sent, "Promotion tick");
                    }
                }
                _ = shutdown.wait() => break,
            }
        }
        info!("Promotion sweep stopped");
        Ok(())
    }

    /// One pass over every queue; returns how many players were dispatched.
    ///
    /// Capacity probes run concurrently, so a slow destination only holds
    /// back its own queue.
    pub async fn tick(&self) -> usize {
        let names = self.registry.queue_names();
        self.last_paced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|name, _| names.contains(name));

        let mut probes = JoinSet::new();
        for name in names {
            if !self.is_eligible(&name) {
                continue;
            }
            let capacity = self.capacity.clone();
            let timeout = self.timeout;
            probes.spawn(async move {
                let online = bounded(timeout, capacity.online_players(&name)).await;
                (name, online)
            });
        }

        let mut sent = 0;
        while let Some(joined) = probes.join_next().await {
            let (name, online) = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, "Capacity probe task failed");
                    continue;
                }
            };
            let online = match online {
                Ok(online) => online,
                Err(e) => {
                    warn!(queue = %name, error = %e, "Capacity probe failed, skipping queue this tick");
                    continue;
                }
            };
            // re-read: the queue may have been paused or reloaded during the probe
            if !self.is_eligible(&name) {
                continue;
            }
            if let Some(definition) = self.registry.definition(&name) {
                sent += self.promote(&definition, online);
            }
        }
        debug_assert!(self.registry.verify_consistency().is_ok());
        sent
    }

    fn is_eligible(&self, name: &str) -> bool {
        match self.registry.definition(name) {
            Some(definition) => {
                definition.auto_send
                    && !definition.paused
                    && self.registry.peek_next(name).is_some()
            }
            None => false,
        }
    }

    fn promote(&self, definition: &QueueDefinition, online: usize) -> usize {
        let name = definition.name.as_str();
        let in_flight = self.registry.in_flight_count(name);
        let mut free = definition
            .max_players
            .saturating_sub(online.saturating_add(in_flight));
        if free == 0 {
            return 0;
        }

        let mut last_paced = self
            .last_paced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied();
        let mut priority_sent = 0usize;
        let mut sent = 0;

        while free > 0 {
            let now = Instant::now();
            let paced_ready = last_paced
                .map_or(true, |at| now.duration_since(at) >= definition.send_delay);
            let mut via_priority = false;

            let taken = self.registry.take_next_if(name, |def, head| {
                if head.is_priority_tier(def.priority_slots)
                    && priority_sent < def.priority_slots as usize
                {
                    via_priority = true;
                    true
                } else {
                    paced_ready
                }
            });
            let Some(transfer) = taken else {
                break;
            };

            if via_priority {
                priority_sent += 1;
            } else {
                last_paced = Some(now);
            }
            debug!(
                player = %transfer.entry.player_id,
                queue = %name,
                priority = transfer.entry.priority,
                via_priority = via_priority,
                "Promoting player"
            );
            // detached; the dispatcher resolves the marker itself
            let _ = self.dispatcher.dispatch(transfer);
            free -= 1;
            sent += 1;
        }

        if let Some(at) = last_paced {
            self.last_paced
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(name.to_string(), at);
        }
        sent
    }
}
