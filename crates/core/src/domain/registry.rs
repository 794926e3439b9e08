//! Queue Registry - every named queue plus the player -> queue reverse index.
//!
//! All state sits behind a single `RwLock` so the lines, the reverse index,
//! pending admissions and in-flight transfers always change together. No
//! method holds the lock across an await point; async work (permission
//! checks, transfers) happens outside and re-enters through a ticket or an
//! in-flight marker that is re-validated before it is applied.

use crate::domain::entry::{PlayerId, Priority, QueueEntry};
use crate::domain::error::{JoinError, QueueError, RegistryInconsistency};
use crate::domain::line::{Position, PriorityLine};
use crate::domain::queue::{QueueDefinition, QueueName, QueueSettings};
use crate::port::TimeProvider;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Reservation held by a player while their bypass checks run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionTicket {
    pub id: u64,
    pub player_id: PlayerId,
    pub player_name: String,
    pub queue: QueueName,
}

/// A player handed to the transfer gateway and not yet resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightTransfer {
    pub id: u64,
    pub queue: QueueName,
    pub entry: QueueEntry,
}

/// Result of putting a player back after a failed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequeueResult {
    Requeued(Position),
    /// The player left while the transfer was in flight
    Cancelled,
    QueueGone,
    AlreadyQueued(QueueName),
}

/// Point-in-time view of one queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    pub definition: QueueDefinition,
    pub waiting: usize,
    pub in_flight: usize,
}

/// What a reload changed
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReloadReport {
    pub loaded: Vec<QueueName>,
    pub dropped: Vec<QueueName>,
    /// Players removed because their queue was dropped or disabled
    pub evicted: Vec<(QueueName, QueueEntry)>,
    /// Definitions skipped because they failed validation
    pub rejected: Vec<String>,
}

#[derive(Debug)]
struct QueueSlot {
    definition: QueueDefinition,
    line: PriorityLine,
}

#[derive(Debug, Default)]
struct RegistryState {
    queues: BTreeMap<QueueName, QueueSlot>,
    index: HashMap<PlayerId, QueueName>,
    pending: HashMap<PlayerId, AdmissionTicket>,
    in_flight: HashMap<PlayerId, InFlightTransfer>,
    next_sequence: u64,
    next_ticket: u64,
    /// Latest join timestamp handed out; stamps never go below it
    last_joined_at: i64,
}

impl RegistryState {
    fn next_sequence(&mut self) -> u64 {
        let seq = self.next_sequence;
        self.next_sequence += 1;
        seq
    }

    /// Clamp a wall-clock reading so join timestamps never run backwards
    fn stamp(&mut self, now_millis: i64) -> i64 {
        self.last_joined_at = self.last_joined_at.max(now_millis);
        self.last_joined_at
    }

    fn next_ticket(&mut self) -> u64 {
        let id = self.next_ticket;
        self.next_ticket += 1;
        id
    }

    /// Queue the player is currently bound to in any stage
    fn occupied_queue(&self, player_id: &PlayerId) -> Option<&QueueName> {
        self.index
            .get(player_id)
            .or_else(|| self.pending.get(player_id).map(|t| &t.queue))
            .or_else(|| self.in_flight.get(player_id).map(|t| &t.queue))
    }

    fn check_admission(&self, player_id: &PlayerId, queue: &str) -> Result<(), JoinError> {
        let slot = self
            .queues
            .get(queue)
            .ok_or_else(|| JoinError::QueueNotFound {
                queue: queue.to_string(),
            })?;
        if let Some(current) = self.occupied_queue(player_id) {
            return Err(JoinError::AlreadyQueued {
                queue: current.clone(),
            });
        }
        if slot.definition.paused {
            return Err(JoinError::QueuePaused {
                queue: queue.to_string(),
            });
        }
        Ok(())
    }

    fn insert_entry(&mut self, queue: &str, entry: QueueEntry) -> Result<Position, JoinError> {
        let player_id = entry.player_id;
        let slot = self
            .queues
            .get_mut(queue)
            .ok_or_else(|| JoinError::QueueNotFound {
                queue: queue.to_string(),
            })?;
        let position = slot.line.insert(entry);
        self.index.insert(player_id, queue.to_string());
        Ok(position)
    }
}

/// Owner of all queue state; construct once and share via `Arc`
pub struct QueueRegistry {
    state: RwLock<RegistryState>,
    time_provider: Arc<dyn TimeProvider>,
}

impl QueueRegistry {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            time_provider,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace all definitions from configuration.
    ///
    /// Surviving queues keep their line and paused flag. Queues that are no
    /// longer configured, or are disabled, are dropped and their players are
    /// evicted into the report. A loaded queue whose new settings are invalid
    /// keeps its previous definition. Pending admissions are left alone; they
    /// re-check their queue when they complete.
    pub fn load_definitions(&self, configs: &BTreeMap<QueueName, QueueSettings>) -> ReloadReport {
        let mut report = ReloadReport::default();
        let mut state = self.write();

        let mut wanted: BTreeMap<&QueueName, &QueueSettings> = BTreeMap::new();
        let mut retained: Vec<&QueueName> = Vec::new();
        for (name, settings) in configs {
            if !settings.enabled {
                debug!(queue = %name, "Skipping disabled queue");
                continue;
            }
            if let Err(e) = settings.validate(name) {
                warn!(queue = %name, error = %e, "Rejecting queue definition");
                report.rejected.push(e.to_string());
                if state.queues.contains_key(name) {
                    // keep the running definition and its line
                    retained.push(name);
                }
                continue;
            }
            wanted.insert(name, settings);
        }

        let stale: Vec<QueueName> = state
            .queues
            .keys()
            .filter(|name| !wanted.contains_key(name) && !retained.contains(name))
            .cloned()
            .collect();
        for name in stale {
            if let Some(mut slot) = state.queues.remove(&name) {
                for entry in slot.line.drain() {
                    state.index.remove(&entry.player_id);
                    report.evicted.push((name.clone(), entry));
                }
            }
            report.dropped.push(name);
        }

        for (name, settings) in wanted {
            match state.queues.get_mut(name) {
                Some(slot) => slot.definition.apply(settings),
                None => {
                    state.queues.insert(
                        name.clone(),
                        QueueSlot {
                            definition: QueueDefinition::from_settings(name.clone(), settings),
                            line: PriorityLine::new(),
                        },
                    );
                }
            }
            report.loaded.push(name.clone());
        }

        info!(
            loaded = report.loaded.len(),
            dropped = report.dropped.len(),
            evicted = report.evicted.len(),
            rejected = report.rejected.len(),
            "Queue definitions loaded"
        );
        report
    }

    /// Insert a player into a queue directly
    pub fn join(
        &self,
        player_id: PlayerId,
        player_name: impl Into<String>,
        queue: &str,
        priority: Priority,
    ) -> Result<Position, JoinError> {
        let now = self.time_provider.now_millis();
        let mut state = self.write();
        state.check_admission(&player_id, queue)?;

        let joined_at = state.stamp(now);
        let sequence = state.next_sequence();
        let entry = QueueEntry::new(player_id, player_name, priority, joined_at, sequence);
        state.insert_entry(queue, entry)
    }

    /// Reserve a slot for a player whose admission needs async checks first.
    ///
    /// While the ticket is live the player counts as queued, so a second
    /// join is rejected with `AlreadyQueued`.
    pub fn reserve_admission(
        &self,
        player_id: PlayerId,
        player_name: impl Into<String>,
        queue: &str,
    ) -> Result<AdmissionTicket, JoinError> {
        let mut state = self.write();
        state.check_admission(&player_id, queue)?;

        let ticket = AdmissionTicket {
            id: state.next_ticket(),
            player_id,
            player_name: player_name.into(),
            queue: queue.to_string(),
        };
        state.pending.insert(player_id, ticket.clone());
        Ok(ticket)
    }

    /// Turn a live ticket into a line entry.
    ///
    /// Returns `Ok(None)` when the ticket was cancelled (player left) in the
    /// meantime. The queue is re-validated since it may have been paused or
    /// dropped while the checks ran.
    pub fn complete_admission(
        &self,
        ticket: &AdmissionTicket,
        priority: Priority,
    ) -> Result<Option<Position>, JoinError> {
        let now = self.time_provider.now_millis();
        let mut state = self.write();
        if !Self::take_ticket(&mut state, ticket) {
            return Ok(None);
        }

        let slot = state
            .queues
            .get(&ticket.queue)
            .ok_or_else(|| JoinError::QueueNotFound {
                queue: ticket.queue.clone(),
            })?;
        if slot.definition.paused {
            return Err(JoinError::QueuePaused {
                queue: ticket.queue.clone(),
            });
        }

        let joined_at = state.stamp(now);
        let sequence = state.next_sequence();
        let entry = QueueEntry::new(
            ticket.player_id,
            ticket.player_name.clone(),
            priority,
            joined_at,
            sequence,
        );
        state.insert_entry(&ticket.queue, entry).map(Some)
    }

    /// Turn a live ticket straight into an in-flight transfer (bypass path).
    ///
    /// Like `complete_admission`, returns `Ok(None)` for a cancelled ticket
    /// and re-checks that the queue still exists.
    pub fn admit_for_transfer(
        &self,
        ticket: &AdmissionTicket,
        priority: Priority,
    ) -> Result<Option<InFlightTransfer>, JoinError> {
        let now = self.time_provider.now_millis();
        let mut state = self.write();
        if !Self::take_ticket(&mut state, ticket) {
            return Ok(None);
        }
        if !state.queues.contains_key(&ticket.queue) {
            return Err(JoinError::QueueNotFound {
                queue: ticket.queue.clone(),
            });
        }
        let joined_at = state.stamp(now);
        let sequence = state.next_sequence();
        let transfer = InFlightTransfer {
            id: state.next_ticket(),
            queue: ticket.queue.clone(),
            entry: QueueEntry::new(
                ticket.player_id,
                ticket.player_name.clone(),
                priority,
                joined_at,
                sequence,
            ),
        };
        state.in_flight.insert(ticket.player_id, transfer.clone());
        Ok(Some(transfer))
    }

    /// Drop a ticket without admitting the player
    pub fn abandon_admission(&self, ticket: &AdmissionTicket) -> bool {
        let mut state = self.write();
        Self::take_ticket(&mut state, ticket)
    }

    fn take_ticket(state: &mut RegistryState, ticket: &AdmissionTicket) -> bool {
        match state.pending.get(&ticket.player_id) {
            Some(live) if live.id == ticket.id => {
                state.pending.remove(&ticket.player_id);
                true
            }
            _ => false,
        }
    }

    /// Remove a player from whatever stage they are in
    pub fn leave(&self, player_id: &PlayerId) -> bool {
        self.remove_player(player_id).is_some()
    }

    /// Like `leave`, but reports the queue the player was bound to
    pub fn remove_player(&self, player_id: &PlayerId) -> Option<QueueName> {
        let mut state = self.write();

        if let Some(queue) = state.index.remove(player_id) {
            if let Some(slot) = state.queues.get_mut(&queue) {
                slot.line.remove(player_id);
            }
            return Some(queue);
        }
        if let Some(ticket) = state.pending.remove(player_id) {
            return Some(ticket.queue);
        }
        state.in_flight.remove(player_id).map(|t| t.queue)
    }

    /// Pause a queue; `Ok(false)` if it was already paused
    pub fn pause(&self, queue: &str) -> Result<bool, QueueError> {
        self.set_paused(queue, true)
    }

    /// Unpause a queue; `Ok(false)` if it was not paused
    pub fn unpause(&self, queue: &str) -> Result<bool, QueueError> {
        self.set_paused(queue, false)
    }

    fn set_paused(&self, queue: &str, paused: bool) -> Result<bool, QueueError> {
        let mut state = self.write();
        let slot = state
            .queues
            .get_mut(queue)
            .ok_or_else(|| QueueError::NotFound(queue.to_string()))?;
        if slot.definition.paused == paused {
            return Ok(false);
        }
        slot.definition.paused = paused;
        info!(queue = %queue, paused = paused, "Queue pause state changed");
        Ok(true)
    }

    pub fn position_of(&self, player_id: &PlayerId) -> Option<Position> {
        let state = self.read();
        let queue = state.index.get(player_id)?;
        state.queues.get(queue)?.line.position_of(player_id)
    }

    pub fn current_queue_of(&self, player_id: &PlayerId) -> Option<QueueName> {
        self.read().index.get(player_id).cloned()
    }

    pub fn definition(&self, queue: &str) -> Option<QueueDefinition> {
        self.read().queues.get(queue).map(|slot| slot.definition.clone())
    }

    /// Copy of the head of a line
    pub fn peek_next(&self, queue: &str) -> Option<QueueEntry> {
        self.read().queues.get(queue)?.line.peek_next().cloned()
    }

    /// Take the head of a line into transfer if `accept` approves it.
    ///
    /// The decision and the removal happen under one lock, so the entry
    /// judged is the entry taken.
    pub fn take_next_if<F>(&self, queue: &str, accept: F) -> Option<InFlightTransfer>
    where
        F: FnOnce(&QueueDefinition, &QueueEntry) -> bool,
    {
        let mut state = self.write();
        let slot = state.queues.get_mut(queue)?;
        let head = slot.line.peek_next()?;
        if !accept(&slot.definition, head) {
            return None;
        }
        let entry = slot.line.take_next()?;
        let player_id = entry.player_id;
        state.index.remove(&player_id);

        let transfer = InFlightTransfer {
            id: state.next_ticket(),
            queue: queue.to_string(),
            entry,
        };
        state.in_flight.insert(player_id, transfer.clone());
        Some(transfer)
    }

    /// Take the head of a line into transfer unconditionally
    pub fn take_for_transfer(&self, queue: &str) -> Option<InFlightTransfer> {
        self.take_next_if(queue, |_, _| true)
    }

    /// Clear the in-flight marker after a successful transfer.
    ///
    /// Returns false if the player already left.
    pub fn finish_transfer(&self, transfer: &InFlightTransfer) -> bool {
        let mut state = self.write();
        Self::take_in_flight(&mut state, transfer)
    }

    /// Put a player back in line after a failed transfer: same queue and
    /// tier, fresh join timestamp.
    pub fn requeue_after_failure(&self, transfer: &InFlightTransfer) -> RequeueResult {
        let now = self.time_provider.now_millis();
        let mut state = self.write();
        if !Self::take_in_flight(&mut state, transfer) {
            return RequeueResult::Cancelled;
        }
        if !state.queues.contains_key(&transfer.queue) {
            return RequeueResult::QueueGone;
        }
        if let Some(current) = state.occupied_queue(&transfer.entry.player_id) {
            return RequeueResult::AlreadyQueued(current.clone());
        }

        let joined_at = state.stamp(now);
        let sequence = state.next_sequence();
        let entry = QueueEntry {
            joined_at,
            sequence,
            ..transfer.entry.clone()
        };
        match state.insert_entry(&transfer.queue, entry) {
            Ok(position) => RequeueResult::Requeued(position),
            Err(_) => RequeueResult::QueueGone,
        }
    }

    fn take_in_flight(state: &mut RegistryState, transfer: &InFlightTransfer) -> bool {
        match state.in_flight.get(&transfer.entry.player_id) {
            Some(live) if live.id == transfer.id => {
                state.in_flight.remove(&transfer.entry.player_id);
                true
            }
            _ => false,
        }
    }

    pub fn in_flight_count(&self, queue: &str) -> usize {
        self.read()
            .in_flight
            .values()
            .filter(|t| t.queue == queue)
            .count()
    }

    pub fn queue_status(&self, queue: &str) -> Option<QueueStatus> {
        let state = self.read();
        let slot = state.queues.get(queue)?;
        Some(QueueStatus {
            definition: slot.definition.clone(),
            waiting: slot.line.len(),
            in_flight: state.in_flight.values().filter(|t| t.queue == queue).count(),
        })
    }

    /// Status of every queue, ordered by name
    pub fn statuses(&self) -> Vec<QueueStatus> {
        let state = self.read();
        state
            .queues
            .iter()
            .map(|(name, slot)| QueueStatus {
                definition: slot.definition.clone(),
                waiting: slot.line.len(),
                in_flight: state.in_flight.values().filter(|t| &t.queue == name).count(),
            })
            .collect()
    }

    pub fn queue_names(&self) -> Vec<QueueName> {
        self.read().queues.keys().cloned().collect()
    }

    /// Ordered copy of one line
    pub fn snapshot(&self, queue: &str) -> Option<Vec<QueueEntry>> {
        self.read().queues.get(queue).map(|slot| slot.line.snapshot())
    }

    /// Every waiting player with their position, line by line
    pub fn waiting_players(&self) -> Vec<(QueueName, QueueEntry, Position)> {
        let state = self.read();
        let mut out = Vec::new();
        for (name, slot) in &state.queues {
            let total = slot.line.len();
            for (i, entry) in slot.line.snapshot().into_iter().enumerate() {
                out.push((
                    name.clone(),
                    entry,
                    Position {
                        position: i + 1,
                        total,
                    },
                ));
            }
        }
        out
    }

    /// Check that the reverse index and the lines agree
    pub fn verify_consistency(&self) -> Result<(), RegistryInconsistency> {
        let state = self.read();

        for (player, queue) in &state.index {
            let slot = state
                .queues
                .get(queue)
                .ok_or_else(|| RegistryInconsistency::UnknownQueue {
                    player: *player,
                    queue: queue.clone(),
                })?;
            if !slot.line.contains(player) {
                return Err(RegistryInconsistency::DanglingIndex {
                    player: *player,
                    queue: queue.clone(),
                });
            }
        }

        for (name, slot) in &state.queues {
            for player in slot.line.players() {
                match state.index.get(player) {
                    None => {
                        return Err(RegistryInconsistency::Unindexed {
                            player: *player,
                            queue: name.clone(),
                        })
                    }
                    Some(indexed) if indexed != name => {
                        return Err(RegistryInconsistency::Mismatched {
                            player: *player,
                            queue: name.clone(),
                            indexed: indexed.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}
