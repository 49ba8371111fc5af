//! Per-connection handler: admission, outbound pump, inbound routing.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. Connecting IS the admission attempt — there is no handshake
//! step. The flow is:
//!   1. Ask the room to admit the connection
//!   2. Rejected → send `lobby/rejected`, close, done
//!   3. Admitted → pump room outbound to the socket (writer task) while
//!      decoding inbound frames into the room (this task)
//!   4. Socket closes → report the disconnect, unconditionally

use std::sync::Arc;

use quorum_protocol::{system, Codec, Envelope, PlayerId, ProtocolError, Rejected, RejectReason};
use quorum_room::{Outbound, RoomError};
use quorum_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::LobbyError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec + Clone>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), LobbyError> {
    let player_id = PlayerId(conn.id().into_inner());
    let (tx, rx) = mpsc::unbounded_channel();

    let player = match state.room.join(player_id, tx).await {
        Ok(player) => player,
        Err(e) => return reject(&conn, &state.codec, player_id, e).await,
    };
    tracing::info!(%player_id, name = %player.name, "participant connected");

    let conn = Arc::new(conn);

    // Writer task: pumps room outbound onto the socket. Exits when the
    // room severs the channel (teardown) or the socket dies.
    let writer = tokio::spawn(pump_outbound(
        Arc::clone(&conn),
        state.codec.clone(),
        rx,
        player_id,
    ));

    // Read loop: decode inbound frames into the room.
    loop {
        match conn.recv().await {
            Ok(Some(data)) => match state.codec.decode::<Envelope>(&data) {
                Ok(envelope) => state.room.deliver(player_id, envelope),
                Err(e) => {
                    tracing::debug!(%player_id, error = %e, "undecodable frame, ignoring");
                }
            },
            Ok(None) => {
                tracing::info!(%player_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        }
    }

    // A closed transport is a disconnect, whatever the phase. The room
    // drops our sender in response, which ends the writer task.
    state.room.leave(player_id);
    let _ = writer.await;
    Ok(())
}

/// Forwards outbound instructions from the room to the socket.
async fn pump_outbound<C: Codec>(
    conn: Arc<WebSocketConnection>,
    codec: C,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    player_id: PlayerId,
) {
    while let Some(out) = rx.recv().await {
        match out {
            Outbound::Event(envelope) => {
                let bytes = match codec.encode(&envelope) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::error!(%player_id, error = %e, "outbound encode failed");
                        continue;
                    }
                };
                if conn.send(&bytes).await.is_err() {
                    break;
                }
            }
            Outbound::Close => break,
        }
    }
    // Whether the room ordered the close or just dropped the channel,
    // the transport is severed here.
    let _ = conn.close().await;
}

/// Reports a rejected admission to the connection, then closes it.
///
/// Only the two expected rejection reasons go on the wire; anything
/// else stopping an admission is a server-side problem that belongs in
/// the log, not in a client payload.
async fn reject<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    player_id: PlayerId,
    err: RoomError,
) -> Result<(), LobbyError> {
    let reason = match err {
        RoomError::RoomFull => Some(RejectReason::RoomFull),
        RoomError::GameInProgress => Some(RejectReason::GameInProgress),
        other => {
            tracing::error!(%player_id, error = %other, "admission failed");
            None
        }
    };

    if let Some(reason) = reason {
        tracing::info!(%player_id, ?reason, "admission rejected");
        let data =
            serde_json::to_value(Rejected { reason }).map_err(ProtocolError::Encode)?;
        let bytes = codec.encode(&Envelope::new(system::REJECTED, data))?;
        // Best effort: the peer may already be gone.
        let _ = conn.send(&bytes).await;
    }

    let _ = conn.close().await;
    Ok(())
}
