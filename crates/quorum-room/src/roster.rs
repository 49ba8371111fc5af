//! The roster: who is in the room, and under what name.
//!
//! Entries keep join order. Two invariants hold after every operation:
//! the roster never exceeds its capacity, and no two current entries
//! share a pseudonym. Names are drawn uniformly at random from the
//! unused part of the pool and return to it when their holder leaves.

use quorum_protocol::{Player, PlayerId};
use rand::Rng;

use crate::RoomError;

/// Ordered participant set with pseudonym allocation.
///
/// Owned exclusively by the room actor; nothing else mutates it.
pub struct Roster {
    capacity: usize,
    pool: Vec<String>,
    entries: Vec<Player>,
}

impl Roster {
    /// Creates an empty roster with the given capacity and name pool.
    pub fn new(capacity: usize, pool: Vec<String>) -> Self {
        Self {
            capacity,
            pool,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Admits a participant, allocating a pseudonym for them.
    ///
    /// # Errors
    /// - [`RoomError::RoomFull`] — no slot left.
    /// - [`RoomError::AlreadyAdmitted`] — the id is already rostered.
    /// - [`RoomError::NamePoolExhausted`] — no free name; startup
    ///   validation makes this unreachable unless the roster was built
    ///   with a pool smaller than its capacity.
    pub fn try_admit(&mut self, id: PlayerId) -> Result<Player, RoomError> {
        if self.entries.len() >= self.capacity {
            return Err(RoomError::RoomFull);
        }
        if self.contains(id) {
            return Err(RoomError::AlreadyAdmitted(id));
        }
        let name = self.draw_name().ok_or(RoomError::NamePoolExhausted)?;
        let player = Player { id, name };
        self.entries.push(player.clone());
        Ok(player)
    }

    /// Removes a participant, freeing their pseudonym.
    ///
    /// Returns the removed entry, or `None` if the id is not rostered —
    /// disconnect notifications can race removal done by teardown, so
    /// an absent id is not an error.
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let index = self.entries.iter().position(|p| p.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Removes every participant.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of current participants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody is rostered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if every slot is taken.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Returns `true` if the id is currently rostered.
    pub fn contains(&self, id: PlayerId) -> bool {
        self.entries.iter().any(|p| p.id == id)
    }

    /// Returns an independent copy of the current entries, in join
    /// order. Later roster mutations do not affect the copy.
    pub fn snapshot(&self) -> Vec<Player> {
        self.entries.clone()
    }

    /// Draws a random pseudonym not currently in use.
    fn draw_name(&self) -> Option<String> {
        let free: Vec<&String> = self
            .pool
            .iter()
            .filter(|name| !self.entries.iter().any(|p| &p.name == *name))
            .collect();
        if free.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..free.len());
        Some(free[index].clone())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn pool(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_admit_assigns_name_from_pool() {
        let mut roster = Roster::new(2, pool(&["Max", "Moritz"]));
        let player = roster.try_admit(pid(1)).expect("should admit");
        assert!(["Max", "Moritz"].contains(&player.name.as_str()));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_admit_beyond_capacity_is_rejected() {
        let mut roster = Roster::new(2, pool(&["A", "B", "C"]));
        roster.try_admit(pid(1)).unwrap();
        roster.try_admit(pid(2)).unwrap();

        let result = roster.try_admit(pid(3));

        assert!(matches!(result, Err(RoomError::RoomFull)));
        assert_eq!(roster.len(), 2, "rejection must not mutate the roster");
    }

    #[test]
    fn test_admit_same_id_twice_is_rejected() {
        let mut roster = Roster::new(3, pool(&["A", "B", "C"]));
        roster.try_admit(pid(1)).unwrap();

        let result = roster.try_admit(pid(1));

        assert!(matches!(result, Err(RoomError::AlreadyAdmitted(p)) if p == pid(1)));
    }

    #[test]
    fn test_names_are_pairwise_distinct() {
        let mut roster = Roster::new(4, pool(&["A", "B", "C", "D"]));
        for i in 1..=4 {
            roster.try_admit(pid(i)).unwrap();
        }
        let names: HashSet<String> =
            roster.snapshot().into_iter().map(|p| p.name).collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_exhausted_pool_fails_allocation() {
        // A pool smaller than capacity is a config error; the roster
        // still refuses to duplicate names rather than guessing.
        let mut roster = Roster::new(2, pool(&["Max"]));
        roster.try_admit(pid(1)).unwrap();

        let result = roster.try_admit(pid(2));

        assert!(matches!(result, Err(RoomError::NamePoolExhausted)));
    }

    #[test]
    fn test_name_is_reused_after_release() {
        // Capacity 1, single-name pool: the second participant gets the
        // same name once the first has left.
        let mut roster = Roster::new(1, pool(&["Max"]));
        let first = roster.try_admit(pid(1)).unwrap();
        assert_eq!(first.name, "Max");

        roster.remove(pid(1)).expect("should remove");
        let second = roster.try_admit(pid(2)).unwrap();
        assert_eq!(second.name, "Max");
    }

    #[test]
    fn test_remove_absent_id_is_a_noop() {
        let mut roster = Roster::new(2, pool(&["A", "B"]));
        roster.try_admit(pid(1)).unwrap();

        assert!(roster.remove(pid(99)).is_none());
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_mutation() {
        let mut roster = Roster::new(2, pool(&["A", "B"]));
        roster.try_admit(pid(1)).unwrap();
        roster.try_admit(pid(2)).unwrap();

        let snapshot = roster.snapshot();
        roster.remove(pid(1));
        roster.clear();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, pid(1));
        assert_eq!(snapshot[1].id, pid(2));
    }

    #[test]
    fn test_entries_keep_join_order() {
        let mut roster = Roster::new(3, pool(&["A", "B", "C"]));
        roster.try_admit(pid(7)).unwrap();
        roster.try_admit(pid(3)).unwrap();
        roster.try_admit(pid(5)).unwrap();

        let ids: Vec<PlayerId> = roster.snapshot().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![pid(7), pid(3), pid(5)]);
    }

    #[test]
    fn test_capacity_invariant_holds_across_churn() {
        let mut roster = Roster::new(2, pool(&["A", "B", "C"]));
        for round in 0..10u64 {
            let _ = roster.try_admit(pid(round * 2));
            let _ = roster.try_admit(pid(round * 2 + 1));
            let _ = roster.try_admit(pid(1000 + round));
            assert!(roster.len() <= 2);
            roster.remove(pid(round * 2));
            assert!(roster.len() <= 2);
        }
    }
}
