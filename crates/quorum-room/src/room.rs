//! Room actor: an isolated Tokio task that owns the session state.
//!
//! The actor owns the roster, the phase flag, every participant's
//! outbound channel, and the bound game. The outside world — connection
//! handlers and the game logic alike — talks to it exclusively through
//! its mpsc mailbox, and each command runs to completion before the
//! next is taken, so the capacity and name-uniqueness invariants hold
//! even when connects and disconnects arrive concurrently.

use std::collections::HashMap;

use quorum_protocol::{system, Envelope, Player, PlayerId, Welcome};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::bridge::SubscriptionTable;
use crate::{GameContext, GameLogic, GameLogicFactory, Phase, RoomConfig, RoomError, Roster};

/// An outbound instruction from the room to a participant's connection
/// handler.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// Deliver this envelope to the participant.
    Event(Envelope),
    /// Close the participant's transport channel. Sent on teardown —
    /// there is no graceful drain.
    Close,
}

/// Channel sender for delivering outbound instructions to a participant.
pub type PlayerSender = mpsc::UnboundedSender<Outbound>;

/// Commands processed by the room actor.
///
/// Join carries a `oneshot` reply channel so admission is synchronous
/// for the caller; disconnects and game traffic are fire-and-forget
/// because the room never queues, delays, or rejects them.
pub(crate) enum RoomCommand {
    /// Admit a participant into the lobby.
    Join {
        player_id: PlayerId,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<Player, RoomError>>,
    },

    /// A participant's transport closed.
    Leave { player_id: PlayerId },

    /// An inbound envelope from a participant.
    Inbound {
        player_id: PlayerId,
        envelope: Envelope,
    },

    /// Game logic: deliver to every rostered participant.
    Broadcast { event: String, data: Value },

    /// Game logic: deliver to one participant.
    Direct {
        player: PlayerId,
        event: String,
        data: Value,
    },

    /// Game logic: the game is over, tear down to the lobby.
    EndSession,

    /// Request the current room metadata.
    Info { reply: oneshot::Sender<RoomInfo> },
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Number of participants currently rostered.
    pub player_count: usize,
    /// Configured capacity.
    pub capacity: usize,
}

/// Handle to the running room actor. Cheap to clone — one lives in
/// every connection handler.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::UnboundedSender<RoomCommand>,
}

impl RoomHandle {
    /// Requests admission for a participant.
    ///
    /// On success the assigned [`Player`] identity is returned and a
    /// `lobby/welcome` envelope has already been queued on `sender`.
    pub async fn join(
        &self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<Player, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                sender,
                reply: reply_tx,
            })
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Reports a participant's disconnect. Unconditional and immediate:
    /// never queued behind game traffic semantics, never rejected.
    pub fn leave(&self, player_id: PlayerId) {
        let _ = self.sender.send(RoomCommand::Leave { player_id });
    }

    /// Delivers an inbound envelope from a participant.
    pub fn deliver(&self, player_id: PlayerId, envelope: Envelope) {
        let _ = self.sender.send(RoomCommand::Inbound {
            player_id,
            envelope,
        });
    }

    /// Requests the current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }
}

/// The bound game plus its per-session dispatch state. Allocated fresh
/// at every session start and dropped wholesale at teardown, so nothing
/// survives into the next game.
struct ActiveSession<F: GameLogicFactory> {
    logic: F::Logic,
    subscriptions: SubscriptionTable,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<F: GameLogicFactory> {
    config: RoomConfig,
    factory: F,
    phase: Phase,
    roster: Roster,
    /// Per-participant outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    session: Option<ActiveSession<F>>,
    /// Sender side of our own mailbox, cloned into [`GameContext`].
    commands: mpsc::UnboundedSender<RoomCommand>,
    receiver: mpsc::UnboundedReceiver<RoomCommand>,
}

impl<F: GameLogicFactory> RoomActor<F> {
    /// Runs the actor loop until every handle is dropped.
    async fn run(mut self) {
        tracing::info!(capacity = self.config.capacity, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { player_id } => {
                    self.handle_leave(player_id);
                }
                RoomCommand::Inbound {
                    player_id,
                    envelope,
                } => {
                    self.handle_inbound(player_id, envelope);
                }
                RoomCommand::Broadcast { event, data } => {
                    self.broadcast(event, data);
                }
                RoomCommand::Direct {
                    player,
                    event,
                    data,
                } => {
                    self.direct(player, event, data);
                }
                RoomCommand::EndSession => {
                    self.handle_end_session();
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::info!("room actor stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<Player, RoomError> {
        if !self.phase.is_joinable() {
            return Err(RoomError::GameInProgress);
        }

        let player = self.roster.try_admit(player_id).inspect_err(|e| {
            if matches!(e, RoomError::NamePoolExhausted) {
                // Unreachable when the config passed validation.
                tracing::error!(
                    %player_id,
                    "pseudonym pool exhausted below capacity — misconfigured pool"
                );
            }
        })?;
        self.senders.insert(player_id, sender);

        tracing::info!(
            %player_id,
            name = %player.name,
            players = self.roster.len(),
            "participant joined"
        );

        let welcome = Welcome {
            you: player.clone(),
            players: self.roster.snapshot(),
        };
        self.send_to_player(player_id, system::WELCOME, to_value(&welcome));

        // The filling admission starts the session synchronously, before
        // this command's reply is sent.
        if self.roster.is_full() {
            self.start_session();
        }

        Ok(player)
    }

    fn handle_leave(&mut self, player_id: PlayerId) {
        let Some(player) = self.roster.remove(player_id) else {
            // Disconnect raced a teardown that already removed them.
            tracing::debug!(%player_id, "leave for unrostered participant, ignoring");
            return;
        };
        self.senders.remove(&player_id);

        tracing::info!(
            %player_id,
            name = %player.name,
            players = self.roster.len(),
            "participant left"
        );

        // A running game cannot continue with a missing participant.
        if self.phase.is_in_game() {
            tracing::info!(%player_id, "participant left mid-game, aborting session");
            self.reset_to_lobby();
        }
    }

    fn handle_inbound(&mut self, player_id: PlayerId, envelope: Envelope) {
        let Some(session) = &mut self.session else {
            tracing::debug!(
                %player_id,
                event = %envelope.event,
                "inbound event outside a session, ignoring"
            );
            return;
        };

        if !self.roster.contains(player_id) {
            tracing::warn!(
                %player_id,
                event = %envelope.event,
                "event from non-member, ignoring"
            );
            return;
        }

        if !session.subscriptions.is_subscribed(player_id, &envelope.event) {
            tracing::debug!(
                %player_id,
                event = %envelope.event,
                "event not subscribed this session, ignoring"
            );
            return;
        }

        session
            .logic
            .handle_event(&envelope.event, player_id, envelope.data);
    }

    /// Binds a fresh game to the roster snapshot and enters `InGame`.
    ///
    /// Order matters: snapshot, bind, subscribe, then `start_game` —
    /// the game must never observe a half-built session. On a bind
    /// failure the room never leaves `Lobby`; it resets to empty so the
    /// next connections can retry the start.
    fn start_session(&mut self) {
        let players = self.roster.snapshot();
        let ctx = GameContext::new(self.commands.clone());

        match self
            .factory
            .build(ctx, players.clone(), self.config.settings.clone())
        {
            Ok(logic) => {
                let events = logic.events();
                let subscriptions = SubscriptionTable::subscribe_all(&players, &events);
                self.phase = Phase::InGame;
                self.session = Some(ActiveSession {
                    logic,
                    subscriptions,
                });
                tracing::info!(players = players.len(), "session started");
                if let Some(session) = &mut self.session {
                    session.logic.start_game();
                }
            }
            Err(reason) => {
                tracing::error!(%reason, "game logic failed to load, resetting to lobby");
                self.reset_to_lobby();
            }
        }
    }

    fn handle_end_session(&mut self) {
        if !self.phase.is_in_game() {
            // An end-session effect queued just before an abort landed.
            tracing::debug!("end-session outside a game, ignoring");
            return;
        }
        tracing::info!("game ended");
        self.reset_to_lobby();
    }

    /// Unconditional teardown: sever every participant channel, clear
    /// the roster, drop the session arena, re-enter the lobby.
    fn reset_to_lobby(&mut self) {
        for (_, sender) in self.senders.drain() {
            let _ = sender.send(Outbound::Close);
        }
        self.roster.clear();
        self.session = None;
        self.phase = Phase::Lobby;
        tracing::info!("room reset to lobby");
    }

    /// Delivers an event to every rostered participant. Per-channel
    /// send order is preserved; there is no cross-channel ordering.
    fn broadcast(&self, event: String, data: Value) {
        for player in self.roster.snapshot() {
            self.send_to_player(player.id, event.as_str(), data.clone());
        }
    }

    /// Delivers an event to one participant. A target that already left
    /// is logged and skipped — a direct message racing a disconnect is
    /// not an error.
    fn direct(&self, player: PlayerId, event: String, data: Value) {
        if !self.roster.contains(player) {
            tracing::debug!(%player, %event, "direct message to absent participant, dropping");
            return;
        }
        self.send_to_player(player, event, data);
    }

    /// Queues an envelope on a participant's channel. Silently drops if
    /// the receiver is gone (connection handler already exited).
    fn send_to_player(&self, player_id: PlayerId, event: impl Into<String>, data: Value) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(Outbound::Event(Envelope::new(event, data)));
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            phase: self.phase,
            player_count: self.roster.len(),
            capacity: self.config.capacity,
        }
    }
}

/// Serializes a payload struct into a JSON value. Serialization of
/// plain data structs does not fail in practice; a failure degrades to
/// a null payload and an error log.
fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::error!(error = %e, "payload serialization failed");
        Value::Null
    })
}

/// Spawns the room actor task and returns a handle to it.
///
/// The configuration should have been checked with
/// [`RoomConfig::validate`] first; the actor trusts its capacity and
/// name pool.
pub fn spawn_room<F: GameLogicFactory>(config: RoomConfig, factory: F) -> RoomHandle {
    let (tx, rx) = mpsc::unbounded_channel();

    let actor = RoomActor::<F> {
        roster: Roster::new(config.capacity, config.names.clone()),
        config,
        factory,
        phase: Phase::Lobby,
        senders: HashMap::new(),
        session: None,
        commands: tx.clone(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { sender: tx }
}
