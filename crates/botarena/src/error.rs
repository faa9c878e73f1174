//! Unified error type for a botarena game process.

use botarena_session::SessionError;
use botarena_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps the errors a [`GameClient`](crate::GameClient)
/// run can end with.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configuration couldn't be loaded or is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A transport-level error (the initial connect).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session ended: platform error, lost connection or a game failure.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    /// The process exit code for this error.
    ///
    /// | code | meaning |
    /// |------|---------|
    /// | 1 | couldn't connect, or any other failure |
    /// | 2 | the platform sent `ERROR` |
    /// | 3 | connection lost under `fail-fast` |
    /// | 4 | configuration error |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 4,
            Self::Session(SessionError::Platform(_)) => 2,
            Self::Session(SessionError::ConnectionLost { .. }) => 3,
            Self::Transport(_) | Self::Session(_) => 1,
        }
    }
}
