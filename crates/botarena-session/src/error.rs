//! Error types for the session layer.

use botarena_game::{GameError, SendError};

/// Errors that end a session.
///
/// Malformed messages and messages without a required sender are not in
/// here: the dispatcher answers those with an `ERROR` and carries on.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The platform sent `ERROR`. The platform gives up on us after this,
    /// so the process should exit.
    #[error("platform error: {0}")]
    Platform(String),

    /// The connection closed (or failed) under
    /// [`ClosePolicy::FailFast`](crate::ClosePolicy::FailFast).
    #[error("connection lost: {code} ({reason})")]
    ConnectionLost { code: u16, reason: String },

    /// A game callback failed.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The dispatcher couldn't queue a reply.
    #[error(transparent)]
    Send(#[from] SendError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SessionError::ConnectionLost {
            code: 1006,
            reason: "reset".into(),
        };
        assert_eq!(err.to_string(), "connection lost: 1006 (reset)");
        assert_eq!(
            SessionError::Platform("bad token".into()).to_string(),
            "platform error: bad token"
        );
    }

    #[test]
    fn test_game_error_is_transparent() {
        let err: SessionError = GameError::UnknownModule("chess".into()).into();
        assert_eq!(err.to_string(), "unknown module: chess");
    }
}
