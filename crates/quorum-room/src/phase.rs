//! The room lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The coarse state of the room.
///
/// Unlike a one-shot match lifecycle, the room cycles:
///
/// ```text
/// Lobby ──(roster reaches capacity)──→ InGame
///   ↑                                    │
///   └──(game ends / participant drops)───┘
/// ```
///
/// - **Lobby**: accepting joins until the roster hits capacity. Also
///   the state the room returns to after every session, with an empty
///   roster and no bound game.
/// - **InGame**: a game-logic unit is bound and receiving events. No
///   admissions. Any rostered disconnect aborts back to `Lobby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    InGame,
}

impl Phase {
    /// Returns `true` if the room is accepting new participants.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` if a game-logic unit is bound and running.
    pub fn is_in_game(&self) -> bool {
        matches!(self, Self::InGame)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::InGame => write!(f, "InGame"),
        }
    }
}
