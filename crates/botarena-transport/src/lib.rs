//! Transport abstraction layer for botarena.
//!
//! Provides the [`Connection`] trait the session runner reads from and
//! writes to. The platform speaks text frames over a single WebSocket,
//! so the trait works on `&str`/`String` and reports the close
//! handshake as an [`Inbound::Closed`] frame.
//!
//! Reconnection is not handled here: a closed connection stays closed.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket client via `tokio-tungstenite`
//! - `tls`: `wss://` support via rustls

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;

/// Whether this build can open `wss://` connections.
pub const TLS_ENABLED: bool = cfg!(feature = "tls");
#[cfg(feature = "websocket")]
pub use websocket::WebSocketConnection;

use std::fmt;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Why the remote side ended the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    /// WebSocket close code (1000 = normal, 1006 = abnormal/no frame).
    pub code: u16,
    /// Free-form reason sent with the close frame.
    pub reason: String,
}

impl CloseInfo {
    /// The stream ended without a close frame.
    pub fn abnormal() -> Self {
        Self {
            code: 1006,
            reason: "connection dropped without close frame".into(),
        }
    }
}

impl fmt::Display for CloseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.reason)
    }
}

/// One inbound event from the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A text frame.
    Text(String),
    /// The connection is closed; no more frames will arrive.
    Closed(CloseInfo),
}

/// A single connection that can send and receive text frames.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one text frame to the remote peer.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the next frame from the remote peer.
    ///
    /// Returns `Ok(Inbound::Closed(_))` when the connection is closed,
    /// cleanly or not; `Err` only for read failures.
    async fn recv(&self) -> Result<Inbound, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
