//! Session lifecycle and event dispatch for the Quorum lobby.
//!
//! This crate is the core of the system: the roster/state machine that
//! decides who may join, when a session starts and ends, how a pluggable
//! game-logic unit is bound to the connected participants, and how named
//! events are routed between participants and that unit.
//!
//! The room runs as an isolated Tokio task (actor model). All mutable
//! state — roster, phase, outbound channels, the bound game — is owned
//! by that task and mutated only through its mailbox, so concurrent
//! connects, disconnects, and game messages can never interleave
//! mid-operation.
//!
//! # Key types
//!
//! - [`GameLogic`] / [`GameLogicFactory`] — the traits game developers implement
//! - [`GameContext`] — broadcast/direct/end-session primitives handed to the game
//! - [`RoomHandle`] — send commands to the running room actor
//! - [`Roster`] — ordered participant set with pseudonym allocation
//! - [`Phase`] — lifecycle state machine (`Lobby` / `InGame`)
//! - [`RoomConfig`] — capacity, pseudonym pool, opaque game settings

mod bridge;
mod config;
mod error;
mod logic;
mod phase;
mod room;
mod roster;

pub use config::RoomConfig;
pub use error::RoomError;
pub use logic::{GameContext, GameLogic, GameLogicFactory};
pub use phase::Phase;
pub use room::{spawn_room, Outbound, PlayerSender, RoomHandle, RoomInfo};
pub use roster::Roster;
