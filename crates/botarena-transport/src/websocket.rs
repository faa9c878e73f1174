//! WebSocket client transport using `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::MaybeTlsStream;

use crate::{CloseInfo, Connection, ConnectionId, Inbound, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// A client WebSocket connection to the platform.
pub struct WebSocketConnection {
    id: ConnectionId,
    ws: Arc<Mutex<WsStream>>,
}

impl WebSocketConnection {
    /// Opens a connection to `url` (`ws://` or, with the `tls` feature,
    /// `wss://`) and waits for the handshake to complete.
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        #[cfg(feature = "tls")]
        install_crypto_provider();

        let (ws, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| TransportError::ConnectFailed {
                url: url.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e),
            })?;

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, url, "WebSocket connected");

        Ok(Self {
            id,
            ws: Arc::new(Mutex::new(ws)),
        })
    }
}

/// rustls needs a process-wide crypto provider before the first `wss://`
/// handshake. Installing twice is a no-op.
#[cfg(feature = "tls")]
fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        tracing::trace!("crypto provider already installed");
    }
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, text: &str) -> Result<(), Self::Error> {
        use futures_util::SinkExt;
        self.ws
            .lock()
            .await
            .send(Message::text(text.to_owned()))
            .await
            .map_err(|e| {
                TransportError::SendFailed(std::io::Error::new(std::io::ErrorKind::BrokenPipe, e))
            })
    }

    async fn recv(&self) -> Result<Inbound, Self::Error> {
        use futures_util::StreamExt;
        loop {
            let msg = self.ws.lock().await.next().await;
            match msg {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Inbound::Text(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(data))) => match String::from_utf8(data.to_vec()) {
                    Ok(text) => return Ok(Inbound::Text(text)),
                    Err(_) => {
                        let len = data.len();
                        tracing::warn!(id = %self.id, len, "skipping non-UTF-8 binary frame");
                        continue;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    let info = match frame {
                        Some(frame) => CloseInfo {
                            code: u16::from(frame.code),
                            reason: frame.reason.as_str().to_owned(),
                        },
                        None => CloseInfo {
                            code: 1005,
                            reason: String::new(),
                        },
                    };
                    return Ok(Inbound::Closed(info));
                }
                None => return Ok(Inbound::Closed(CloseInfo::abnormal())),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.ws.lock().await.close(None).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(std::io::ErrorKind::BrokenPipe, e))
        })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
