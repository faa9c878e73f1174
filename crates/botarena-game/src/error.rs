//! Error types for the game layer.

use botarena_protocol::ProtocolError;

/// Errors from [`MessageSender`](crate::MessageSender).
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The caller passed an argument the protocol forbids, such as an
    /// empty recipient list. This is a bug in the calling game.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The envelope (usually a game-provided body) couldn't be encoded.
    #[error(transparent)]
    Encode(ProtocolError),

    /// The outbound queue is gone; the connection has been torn down.
    #[error("outbound channel closed")]
    ChannelClosed,
}

/// Errors a [`Game`](crate::Game) callback can return.
///
/// Every variant is fatal for the session. Rule violations by bots are
/// not errors: they end in disqualification.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// `START` named a module this game doesn't implement.
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// `START` carried a roster this game can't be played with.
    #[error("game needs {expected} bots, got {actual}")]
    RosterSize { expected: usize, actual: usize },

    /// Sending a message failed.
    #[error(transparent)]
    Send(#[from] SendError),
}
