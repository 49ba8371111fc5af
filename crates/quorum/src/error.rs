//! Unified error type for the Quorum server.

use quorum_protocol::ProtocolError;
use quorum_room::RoomError;
use quorum_transport::TransportError;

/// Top-level error that wraps all layer-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so `?` converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (rejection, misconfiguration).
    #[error(transparent)]
    Room(#[from] RoomError),
}
