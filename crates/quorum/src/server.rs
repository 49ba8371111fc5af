//! `LobbyServer` builder and accept loop.
//!
//! This is the entry point for running a Quorum lobby. It ties the
//! layers together: transport → protocol → room. Exactly one room is
//! spawned per server; its handle is shared with every connection
//! handler task.

use std::sync::Arc;

use quorum_protocol::{Codec, JsonCodec};
use quorum_room::{spawn_room, GameLogicFactory, RoomConfig, RoomHandle};
use quorum_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::LobbyError;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) room: RoomHandle,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a lobby server.
///
/// # Example
///
/// ```rust,ignore
/// let server = LobbyServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .room_config(RoomConfig { capacity: 4, ..RoomConfig::default() })
///     .build(MyGameFactory)
///     .await?;
/// server.run().await
/// ```
pub struct LobbyServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl LobbyServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration (capacity, pseudonym pool, settings).
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Validates the configuration, binds the transport, spawns the
    /// room actor, and returns the server.
    ///
    /// Uses `JsonCodec` and the WebSocket transport. A pseudonym pool
    /// smaller than the capacity is refused here — before a single
    /// connection is accepted.
    pub async fn build<F: GameLogicFactory>(
        self,
        factory: F,
    ) -> Result<LobbyServer<JsonCodec>, LobbyError> {
        self.room_config.validate()?;

        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let room = spawn_room(self.room_config, factory);

        let state = Arc::new(ServerState {
            room,
            codec: JsonCodec,
        });

        Ok(LobbyServer { transport, state })
    }
}

impl Default for LobbyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running lobby server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct LobbyServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl<C> LobbyServer<C>
where
    C: Codec + Clone,
{
    /// Creates a new builder.
    pub fn builder() -> LobbyServerBuilder {
        LobbyServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Every accepted connection is an admission attempt; each gets its
    /// own handler task. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), LobbyError> {
        tracing::info!("Quorum lobby running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
