//! Priority Line - ordered waiting set for one destination.
//!
//! Entries live in a `BTreeMap` keyed by `(priority, joined_at, sequence)`, so
//! ordering is structural: an insert never computes an index and iteration
//! always yields the line's total order. A `HashMap` index gives O(1) lookup
//! of a player's key for removal and ranking.
//!
//! The line has no interior locking. It is only reachable through
//! `QueueRegistry`, whose write lock serializes every mutation.

use crate::domain::entry::{EntryKey, PlayerId, QueueEntry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 1-based rank of a player together with the line length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub position: usize,
    pub total: usize,
}

#[derive(Debug, Default)]
pub struct PriorityLine {
    entries: BTreeMap<EntryKey, QueueEntry>,
    index: HashMap<PlayerId, EntryKey>,
}

impl PriorityLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry at its ordered position - O(log n).
    ///
    /// An existing entry for the same player is replaced.
    pub fn insert(&mut self, entry: QueueEntry) -> Position {
        self.remove(&entry.player_id);

        let key = entry.key();
        let player_id = entry.player_id;
        self.entries.insert(key, entry);
        self.index.insert(player_id, key);

        Position {
            position: self.rank_of(&key),
            total: self.entries.len(),
        }
    }

    /// Remove a player's entry; absent players are a no-op
    pub fn remove(&mut self, player_id: &PlayerId) -> Option<QueueEntry> {
        let key = self.index.remove(player_id)?;
        self.entries.remove(&key)
    }

    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.index.contains_key(player_id)
    }

    pub fn get(&self, player_id: &PlayerId) -> Option<&QueueEntry> {
        self.index.get(player_id).and_then(|key| self.entries.get(key))
    }

    /// Current rank of a player, or None if absent
    pub fn position_of(&self, player_id: &PlayerId) -> Option<Position> {
        let key = self.index.get(player_id)?;
        Some(Position {
            position: self.rank_of(key),
            total: self.entries.len(),
        })
    }

    /// Head of line without removing it
    pub fn peek_next(&self) -> Option<&QueueEntry> {
        self.entries.values().next()
    }

    /// Remove and return the head of line
    pub fn take_next(&mut self) -> Option<QueueEntry> {
        let (_, entry) = self.entries.pop_first()?;
        self.index.remove(&entry.player_id);
        Some(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned, point-in-time copy of the line in order
    pub fn snapshot(&self) -> Vec<QueueEntry> {
        self.entries.values().cloned().collect()
    }

    /// Drain every entry in order, leaving the line empty
    pub fn drain(&mut self) -> Vec<QueueEntry> {
        self.index.clear();
        std::mem::take(&mut self.entries).into_values().collect()
    }

    /// Iterate players in line order
    pub(crate) fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.entries.values().map(|entry| &entry.player_id)
    }

    fn rank_of(&self, key: &EntryKey) -> usize {
        self.entries.range(..*key).count() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, priority: u32, joined_at: i64, sequence: u64) -> QueueEntry {
        QueueEntry::new(PlayerId::new_v4(), name, priority, joined_at, sequence)
    }

    fn names(line: &PriorityLine) -> Vec<String> {
        line.snapshot().into_iter().map(|e| e.player_name).collect()
    }

    #[test]
    fn test_practice_scenario_order() {
        let mut line = PriorityLine::new();
        line.insert(entry("A", 3, 0, 0));
        line.insert(entry("B", 1, 1, 1));
        line.insert(entry("C", 1, 2, 2));

        assert_eq!(names(&line), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_insert_reports_position() {
        let mut line = PriorityLine::new();
        let first = line.insert(entry("A", 5, 10, 0));
        assert_eq!(first, Position { position: 1, total: 1 });

        let second = line.insert(entry("B", 5, 20, 1));
        assert_eq!(second, Position { position: 2, total: 2 });

        let jumper = line.insert(entry("C", 1, 30, 2));
        assert_eq!(jumper, Position { position: 1, total: 3 });
    }

    #[test]
    fn test_position_tracks_current_order() {
        let mut line = PriorityLine::new();
        let a = entry("A", 5, 10, 0);
        let a_id = a.player_id;
        line.insert(a);
        line.insert(entry("B", 5, 20, 1));
        assert_eq!(line.position_of(&a_id).map(|p| p.position), Some(1));

        line.insert(entry("C", 2, 30, 2));
        assert_eq!(line.position_of(&a_id), Some(Position { position: 2, total: 3 }));
        assert_eq!(line.position_of(&PlayerId::new_v4()), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut line = PriorityLine::new();
        let a = entry("A", 1, 0, 0);
        let a_id = a.player_id;
        line.insert(a);

        assert!(line.remove(&a_id).is_some());
        assert!(line.remove(&a_id).is_none());
        assert!(line.is_empty());
        assert!(!line.contains(&a_id));
    }

    #[test]
    fn test_take_next_pops_head() {
        let mut line = PriorityLine::new();
        line.insert(entry("late-vip", 1, 50, 3));
        line.insert(entry("early-default", 9, 0, 0));
        line.insert(entry("early-vip", 1, 10, 1));

        assert_eq!(line.peek_next().map(|e| e.player_name.as_str()), Some("early-vip"));
        let head = line.take_next().unwrap();
        assert_eq!(head.player_name, "early-vip");
        assert!(!line.contains(&head.player_id));
        assert_eq!(line.take_next().unwrap().player_name, "late-vip");
        assert_eq!(line.take_next().unwrap().player_name, "early-default");
        assert!(line.take_next().is_none());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut line = PriorityLine::new();
        line.insert(entry("A", 1, 0, 0));
        let snapshot = line.snapshot();

        line.insert(entry("B", 1, 1, 1));
        line.take_next();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].player_name, "A");
        assert_eq!(names(&line), vec!["B"]);
    }

    #[test]
    fn test_reinsert_replaces_existing_entry() {
        let mut line = PriorityLine::new();
        let mut a = entry("A", 3, 0, 0);
        line.insert(a.clone());
        line.insert(entry("B", 3, 5, 1));

        a.joined_at = 10;
        a.sequence = 2;
        let pos = line.insert(a);
        assert_eq!(pos, Position { position: 2, total: 2 });
        assert_eq!(names(&line), vec!["B", "A"]);
    }

    #[test]
    fn test_ordering_holds_for_many_inserts() {
        let mut line = PriorityLine::new();
        for i in 0..200u64 {
            let priority = ((i * 7919) % 13) as u32 + 1;
            let joined_at = ((i * 104_729) % 1_000) as i64;
            line.insert(entry(&format!("p{}", i), priority, joined_at, i));
        }

        let snapshot = line.snapshot();
        assert_eq!(snapshot.len(), 200);
        for pair in snapshot.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                (a.priority, a.joined_at, a.sequence) < (b.priority, b.joined_at, b.sequence),
                "line out of order: {:?} before {:?}",
                a,
                b
            );
        }
    }
}
