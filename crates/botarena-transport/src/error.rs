/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The initial connection to the platform could not be established.
    #[error("connect to {url} failed: {source}")]
    ConnectFailed {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
