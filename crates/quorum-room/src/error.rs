//! Error types for the room layer.

use quorum_protocol::PlayerId;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// Every lobby slot is taken.
    #[error("room is full")]
    RoomFull,

    /// A session is running; the room admits nobody mid-game.
    #[error("game already in progress")]
    GameInProgress,

    /// The participant is already on the roster.
    #[error("participant {0} already admitted")]
    AlreadyAdmitted(PlayerId),

    /// No free pseudonym left for a new participant. Startup validation
    /// guarantees the pool covers the capacity, so hitting this at
    /// runtime means the configuration was bypassed.
    #[error("pseudonym pool exhausted (pool must be at least room capacity)")]
    NamePoolExhausted,

    /// The room configuration is unusable (zero capacity, short or
    /// duplicated name pool).
    #[error("invalid room configuration: {0}")]
    InvalidConfig(String),

    /// The room actor is gone; its command channel is closed.
    #[error("room is unavailable")]
    Unavailable,
}
