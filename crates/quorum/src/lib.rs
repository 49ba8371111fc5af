//! # Quorum
//!
//! A single-room game lobby server: admits a fixed number of WebSocket
//! participants, assigns each a pseudonym from a configured pool, binds
//! an externally supplied game once the room fills, routes named events
//! between participants and the game, and resets to an empty lobby when
//! the game ends or a participant drops.
//!
//! Game developers implement [`GameLogic`] and [`GameLogicFactory`]
//! (from `quorum-room`); this crate supplies the server loop that wires
//! the transport, protocol, and room layers together.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quorum::prelude::*;
//!
//! # struct MyFactory;
//! # struct MyGame;
//! # impl GameLogic for MyGame {
//! #     fn events(&self) -> Vec<String> { vec![] }
//! #     fn start_game(&mut self) {}
//! #     fn handle_event(&mut self, _: &str, _: PlayerId, _: serde_json::Value) {}
//! # }
//! # impl GameLogicFactory for MyFactory {
//! #     type Logic = MyGame;
//! #     fn build(&self, _: GameContext, _: Vec<Player>, _: serde_json::Value)
//! #         -> Result<MyGame, String> { Ok(MyGame) }
//! # }
//! #[tokio::main]
//! async fn main() -> Result<(), LobbyError> {
//!     let server = LobbyServerBuilder::new()
//!         .bind("0.0.0.0:8080")
//!         .room_config(RoomConfig::default())
//!         .build(MyFactory)
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod logging;
mod server;

pub use error::LobbyError;
pub use logging::init_logging;
pub use server::{LobbyServer, LobbyServerBuilder};

/// The names most servers and games need, in one import.
pub mod prelude {
    pub use crate::{init_logging, LobbyError, LobbyServer, LobbyServerBuilder};
    pub use quorum_protocol::{
        system, Codec, Envelope, JsonCodec, Player, PlayerId, Rejected, RejectReason, Welcome,
    };
    pub use quorum_room::{
        GameContext, GameLogic, GameLogicFactory, Phase, RoomConfig, RoomError, RoomHandle,
        RoomInfo,
    };
}
