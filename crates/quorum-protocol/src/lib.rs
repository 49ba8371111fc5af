//! Wire protocol for Quorum.
//!
//! This crate defines the "language" that clients and the lobby speak:
//!
//! - **Types** ([`Envelope`], [`Player`], [`RejectReason`], etc.) — the
//!   structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the room
//! (participant identity). It doesn't know about connections or game
//! rules — it only knows how to serialize and deserialize named events.
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope) → Room (participant context)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    system, Envelope, Player, PlayerId, Rejected, RejectReason, Welcome,
};
