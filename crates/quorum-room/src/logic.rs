//! The game-logic seam — the extension point game developers implement.
//!
//! The room knows nothing about any game's rules. At session start it
//! asks a [`GameLogicFactory`] for a fresh [`GameLogic`] instance,
//! handing it the roster snapshot, the opaque settings value, and a
//! [`GameContext`] carrying the three primitives a game may use:
//! broadcast to everyone, send to one participant, end the session.

use quorum_protocol::{Player, PlayerId};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::room::RoomCommand;

/// A bound game-logic unit, living for exactly one session.
///
/// The room calls [`events`](Self::events) once at bind time to build
/// the subscription table, [`start_game`](Self::start_game) once after
/// every subscription is in place, and
/// [`handle_event`](Self::handle_event) for each inbound event a
/// participant sends under one of the declared names. All calls happen
/// on the room actor, one at a time — implementations need no internal
/// locking.
pub trait GameLogic: Send + 'static {
    /// The inbound event names this game listens for. Read once at bind
    /// time; changing the returned set later has no effect.
    fn events(&self) -> Vec<String>;

    /// Called once, after the roster snapshot is subscribed. The usual
    /// place to broadcast an initial state to everyone.
    fn start_game(&mut self);

    /// Called with `(event, sender, payload)` for every subscribed
    /// inbound event. `event` is always one of [`events`](Self::events).
    fn handle_event(&mut self, event: &str, sender: PlayerId, data: Value);
}

/// Builds a fresh [`GameLogic`] instance per session.
///
/// Invoked exactly once per session start — never cached, so no state
/// can leak from one game into the next. Construction must have no
/// side effects beyond returning the instance. An implementation that
/// wants disk-fresh settings can reload them here; the room passes its
/// configured settings value through unmodified.
///
/// Errors are reported as strings: a failed build is a fatal
/// configuration problem surfaced in the server log, not a condition
/// the game can recover from.
pub trait GameLogicFactory: Send + 'static {
    /// The game type this factory builds.
    type Logic: GameLogic;

    /// Constructs the game for one session.
    fn build(
        &self,
        ctx: GameContext,
        players: Vec<Player>,
        settings: Value,
    ) -> Result<Self::Logic, String>;
}

/// Messaging primitives handed to the game logic at construction.
///
/// Cheap to clone; all methods enqueue work on the room's mailbox, so
/// they can be called from inside a handler without re-entering the
/// room. Effects are applied in call order, after the currently running
/// unit of work completes.
#[derive(Clone)]
pub struct GameContext {
    commands: mpsc::UnboundedSender<RoomCommand>,
}

impl GameContext {
    pub(crate) fn new(commands: mpsc::UnboundedSender<RoomCommand>) -> Self {
        Self { commands }
    }

    /// Delivers `data` under `event` to every rostered participant.
    ///
    /// Each participant's channel preserves send order; no ordering is
    /// guaranteed across participants.
    pub fn broadcast(&self, event: impl Into<String>, data: Value) {
        let _ = self.commands.send(RoomCommand::Broadcast {
            event: event.into(),
            data,
        });
    }

    /// Delivers `data` under `event` to exactly one participant.
    ///
    /// A direct message racing a disconnect is dropped and logged, not
    /// an error.
    pub fn send_to(&self, player: PlayerId, event: impl Into<String>, data: Value) {
        let _ = self.commands.send(RoomCommand::Direct {
            player,
            event: event.into(),
            data,
        });
    }

    /// Ends the session: every participant channel is closed, the
    /// roster cleared, and the room returns to the lobby.
    pub fn end_session(&self) {
        let _ = self.commands.send(RoomCommand::EndSession);
    }
}
