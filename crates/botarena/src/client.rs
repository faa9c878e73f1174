//! `GameClient` and the session loop.
//!
//! This is the entry point for running a game against the platform. It
//! ties together all the layers: transport → protocol → session → game.

use botarena_game::{Game, MessageSender, OutboundReceiver};
use botarena_session::{Dispatcher, SessionError};
use botarena_transport::{Connection, Inbound, TransportError, WebSocketConnection};

use crate::{ClientError, Config};

/// Runs one game against the platform.
///
/// # Example
///
/// ```rust,ignore
/// use botarena::prelude::*;
///
/// let config = Config::resolve(&ConfigOverrides::default())?;
/// GameClient::new(config, MyGame::default()).run().await
/// ```
pub struct GameClient<G: Game> {
    config: Config,
    game: G,
}

impl<G: Game> GameClient<G> {
    pub fn new(config: Config, game: G) -> Self {
        Self { config, game }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connects to the configured endpoint and runs until the session ends.
    ///
    /// Returns `Ok(())` only when the connection closes under the
    /// `best-effort` close policy.
    pub async fn run(self) -> Result<(), ClientError> {
        self.config.validate()?;
        let url = self.config.endpoint();
        tracing::info!(%url, "connecting to platform");
        let conn = WebSocketConnection::connect(&url).await?;
        self.run_with(conn).await
    }

    /// Runs the session over an already open connection.
    pub async fn run_with<C>(self, conn: C) -> Result<(), ClientError>
    where
        C: Connection<Error = TransportError>,
    {
        let token = self.config.token()?.to_owned();
        let (sender, mut outbound) = MessageSender::channel();
        let mut dispatcher = Dispatcher::new(self.game, sender, token)
            .with_close_policy(self.config.platform.on_close);

        tracing::info!(conn_id = %conn.id(), "connected");
        let result = pump(&conn, &mut dispatcher, &mut outbound).await;

        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "close failed");
        }
        tracing::info!(conn_id = %conn.id(), ok = result.is_ok(), "session ended");
        result.map_err(ClientError::from)
    }
}

/// Reads one frame, dispatches it to completion, flushes every reply,
/// then reads the next.
async fn pump<C, G>(
    conn: &C,
    dispatcher: &mut Dispatcher<G>,
    outbound: &mut OutboundReceiver,
) -> Result<(), SessionError>
where
    C: Connection<Error = TransportError>,
    G: Game,
{
    dispatcher.on_open()?;
    flush(conn, dispatcher, outbound).await?;

    loop {
        match conn.recv().await {
            Ok(Inbound::Text(text)) => {
                tracing::trace!(len = text.len(), "received frame");
                let outcome = dispatcher.on_message(&text);
                // Replies queued before a fatal error still go out; the
                // dispatch error wins over a failed flush.
                let flushed = flush(conn, dispatcher, outbound).await;
                outcome?;
                flushed?;
            }
            Ok(Inbound::Closed(info)) => return dispatcher.on_close(info.code, &info.reason),
            Err(e) => return dispatcher.on_error(&e),
        }
    }
}

async fn flush<C, G>(
    conn: &C,
    dispatcher: &mut Dispatcher<G>,
    outbound: &mut OutboundReceiver,
) -> Result<(), SessionError>
where
    C: Connection<Error = TransportError>,
    G: Game,
{
    while let Ok(text) = outbound.try_recv() {
        if let Err(e) = conn.send(&text).await {
            dispatcher.on_error(&e)?;
        }
    }
    Ok(())
}
