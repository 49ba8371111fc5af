//! Per-session subscription table.
//!
//! Built once per session from the roster snapshot and the event names
//! the game declared, then dropped wholesale at teardown. Because the
//! table is an arena tied to the session, a listener from a previous
//! game can never fire into the next one, and nothing depends on the
//! order entries were registered in.

use std::collections::HashSet;

use quorum_protocol::{Player, PlayerId};

/// The set of `(participant, event name)` pairs the bound game listens
/// to. Inbound envelopes not matching a pair are dropped by the room.
pub(crate) struct SubscriptionTable {
    entries: HashSet<(PlayerId, String)>,
}

impl SubscriptionTable {
    /// Registers every declared event name for every snapshotted
    /// participant — exactly once per pair.
    pub(crate) fn subscribe_all(players: &[Player], events: &[String]) -> Self {
        let mut entries = HashSet::with_capacity(players.len() * events.len());
        for player in players {
            for event in events {
                entries.insert((player.id, event.clone()));
            }
        }
        Self { entries }
    }

    /// Returns `true` if `player` subscribed to `event` this session.
    pub(crate) fn is_subscribed(&self, player: PlayerId, event: &str) -> bool {
        self.entries.contains(&(player, event.to_owned()))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(ids: &[u64]) -> Vec<Player> {
        ids.iter()
            .map(|&id| Player {
                id: PlayerId(id),
                name: format!("p{id}"),
            })
            .collect()
    }

    fn events(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_subscribe_all_covers_every_pair_once() {
        let table =
            SubscriptionTable::subscribe_all(&players(&[1, 2]), &events(&["move", "chat"]));
        assert_eq!(table.len(), 4);
        assert!(table.is_subscribed(PlayerId(1), "move"));
        assert!(table.is_subscribed(PlayerId(2), "chat"));
    }

    #[test]
    fn test_undeclared_event_is_not_subscribed() {
        let table = SubscriptionTable::subscribe_all(&players(&[1]), &events(&["move"]));
        assert!(!table.is_subscribed(PlayerId(1), "chat"));
    }

    #[test]
    fn test_unsnapshotted_participant_is_not_subscribed() {
        let table = SubscriptionTable::subscribe_all(&players(&[1]), &events(&["move"]));
        assert!(!table.is_subscribed(PlayerId(2), "move"));
    }

    #[test]
    fn test_empty_event_list_subscribes_nothing() {
        let table = SubscriptionTable::subscribe_all(&players(&[1, 2]), &[]);
        assert_eq!(table.len(), 0);
    }
}
