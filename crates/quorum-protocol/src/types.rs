//! Core wire types for Quorum.
//!
//! Every message on the wire is an [`Envelope`]: a named event plus an
//! opaque JSON payload. The lobby reserves a handful of event names for
//! itself (see [`system`]); everything else belongs to whatever game
//! logic is bound for the current session, which declares its own event
//! names at bind time. That is why the payload is a `serde_json::Value`
//! and not a closed enum — the protocol layer cannot know the shape of
//! game traffic in advance.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a participant.
///
/// Newtype over the transport-assigned connection id: you can't
/// accidentally pass a raw counter where a participant is expected, and
/// `fn remove(player: PlayerId)` reads better than `fn remove(id: u64)`.
///
/// `#[serde(transparent)]` serializes this as the bare number, so
/// `PlayerId(42)` is just `42` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A participant as visible to other participants and to the game logic:
/// the transport identity plus the pseudonym the lobby assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Transport-assigned identity, stable for one connection.
    pub id: PlayerId,
    /// Display name drawn from the configured pseudonym pool. Unique
    /// among currently connected participants.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Envelope — the top-level wire format
// ---------------------------------------------------------------------------

/// The top-level message wrapper: a named event and its payload.
///
/// ```text
/// { "event": "click", "data": { "times": 3 } }
/// ```
///
/// `data` defaults to JSON `null` when absent, so bare notifications
/// (`{ "event": "ready" }`) parse without a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// The event name. Routing key for the dispatch layer.
    pub event: String,
    /// Opaque payload, interpreted only by the bound game logic (or by
    /// the client, for the reserved lobby events).
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Builds an envelope from an event name and payload.
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// Reserved lobby events
// ---------------------------------------------------------------------------

/// Event names the lobby emits itself. Game logic must not reuse these.
pub mod system {
    /// Sent to a participant right after admission. Payload: [`super::Welcome`].
    pub const WELCOME: &str = "lobby/welcome";
    /// Sent to a rejected connection just before it is closed.
    /// Payload: [`super::Rejected`].
    pub const REJECTED: &str = "lobby/rejected";
}

/// Payload of [`system::WELCOME`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Welcome {
    /// The admitted participant's own identity, pseudonym included.
    pub you: Player,
    /// Everyone currently in the room, in join order (including `you`).
    pub players: Vec<Player>,
}

/// Why an admission attempt was turned away.
///
/// These are the only two non-fatal rejection reasons; anything else
/// that stops an admission is a server-side configuration error and is
/// not reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// Every slot in the lobby is taken.
    RoomFull,
    /// A session is already running; the room admits nobody mid-game.
    GameInProgress,
}

/// Payload of [`system::REJECTED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejected {
    /// Why the connection was not admitted.
    pub reason: RejectReason,
}

// =========================================================================
// Tests
// =========================================================================
