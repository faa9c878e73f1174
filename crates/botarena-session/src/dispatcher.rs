//! Routes decoded platform messages to the game.

use std::error::Error as StdError;

use botarena_game::{Game, GameContext, GamePhase, MessageSender};
use botarena_protocol::{BotIdentity, Codec, Envelope, JsonCodec, Payload};

use crate::{ClosePolicy, SessionError, SessionState};

/// Sent back to the platform when a message needed a sender and had none.
pub const MISSING_SENDER: &str = "needed a sender but none was provided";

/// Drives one game through the messages of one connection.
///
/// Every method runs to completion before the runner hands over the next
/// event, so game callbacks never overlap.
pub struct Dispatcher<G: Game> {
    game: G,
    ctx: GameContext,
    codec: JsonCodec,
    token: String,
    state: SessionState,
    close_policy: ClosePolicy,
}

impl<G: Game> Dispatcher<G> {
    /// Creates a dispatcher that registers with `token` and replies
    /// through `sender`.
    pub fn new(game: G, sender: MessageSender, token: impl Into<String>) -> Self {
        Self {
            game,
            ctx: GameContext::new(sender),
            codec: JsonCodec,
            token: token.into(),
            state: SessionState::Disconnected,
            close_policy: ClosePolicy::default(),
        }
    }

    pub fn with_close_policy(mut self, policy: ClosePolicy) -> Self {
        self.close_policy = policy;
        self
    }

    // -----------------------------------------------------------------------
    // Transport events
    // -----------------------------------------------------------------------

    /// The connection is up: register with the platform.
    pub fn on_open(&mut self) -> Result<(), SessionError> {
        self.ctx.sender().send(Payload::Register(self.token.clone()))?;
        self.state = SessionState::AwaitingRegistration;
        tracing::info!("registration sent");
        Ok(())
    }

    /// Decodes one text frame and dispatches it.
    ///
    /// A frame that doesn't decode is answered with an `ERROR` and
    /// dropped; the session goes on.
    pub fn on_message(&mut self, text: &str) -> Result<(), SessionError> {
        let envelope: Envelope = match self.codec.decode(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable message");
                self.ctx
                    .sender()
                    .send(Payload::Error(format!("could not decode message: {e}")))?;
                return Ok(());
            }
        };
        self.dispatch(envelope)
    }

    /// Calls the game callback matching `envelope`'s payload.
    pub fn dispatch(&mut self, envelope: Envelope) -> Result<(), SessionError> {
        let Envelope { payload, sender, .. } = envelope;
        tracing::debug!(tag = payload.tag(), "dispatching");

        match payload {
            Payload::Error(message) => {
                tracing::error!(target: "platform", %message, "platform reported an error");
                return Err(SessionError::Platform(message));
            }
            Payload::Register(_) => {
                self.state = SessionState::Registered;
                tracing::info!("registration acknowledged");
            }
            Payload::Start(descriptor) => {
                tracing::info!(
                    module = %descriptor.module_name,
                    bots = descriptor.bots.len(),
                    "round started"
                );
                self.ctx.install(descriptor);
                self.game.on_start(&mut self.ctx)?;
            }
            Payload::Interrupt => {
                tracing::info!("round interrupted by the platform");
                self.game.on_interrupt(&mut self.ctx)?;
                self.ctx.set_phase(GamePhase::Idle);
            }
            Payload::BotDisconnected(bot) => {
                self.game.on_bot_disconnected(&mut self.ctx, &bot)?;
                self.ctx.set_phase(GamePhase::Idle);
            }
            Payload::Move(data) => {
                let Some(bot) = self.resolve_sender(sender)? else {
                    return Ok(());
                };
                // Turn order is the game's call, whatever the phase says.
                self.game.on_move_received(&mut self.ctx, &bot, data)?;
            }
            Payload::GameUpdate(data) => {
                let Some(bot) = self.resolve_sender(sender)? else {
                    return Ok(());
                };
                self.game.on_update_received(&mut self.ctx, &bot, data)?;
            }
            Payload::Finished(scores) => {
                tracing::debug!(entries = scores.len(), "platform echoed FINISHED");
            }
            Payload::Disqualify(bot) => {
                tracing::debug!(target: "platform", %bot, "disqualification echoed");
            }
            Payload::Log(message) => {
                tracing::debug!(target: "platform", %message);
            }
            other @ Payload::Other { .. } => {
                self.game
                    .on_other_message_received(&mut self.ctx, sender.as_ref(), &other)?;
            }
        }
        Ok(())
    }

    /// The connection closed with `code` and `reason`.
    pub fn on_close(&mut self, code: u16, reason: &str) -> Result<(), SessionError> {
        self.state = SessionState::Disconnected;
        match self.close_policy {
            ClosePolicy::FailFast => {
                tracing::error!(code, reason, "connection closed");
                Err(SessionError::ConnectionLost {
                    code,
                    reason: reason.to_owned(),
                })
            }
            ClosePolicy::BestEffort => {
                tracing::warn!(code, reason, "connection closed");
                Ok(())
            }
        }
    }

    /// The transport failed.
    pub fn on_error(&mut self, error: &(dyn StdError + 'static)) -> Result<(), SessionError> {
        match self.close_policy {
            ClosePolicy::FailFast => {
                tracing::error!(%error, "transport error");
                self.state = SessionState::Disconnected;
                Err(SessionError::ConnectionLost {
                    code: 1006,
                    reason: error.to_string(),
                })
            }
            ClosePolicy::BestEffort => {
                tracing::warn!(%error, "transport error");
                Ok(())
            }
        }
    }

    /// Returns the sender of a message that needs one. Without a sender the
    /// platform is told so and `None` is returned; the caller drops that
    /// message only.
    fn resolve_sender(
        &self,
        sender: Option<BotIdentity>,
    ) -> Result<Option<BotIdentity>, SessionError> {
        if sender.is_none() {
            tracing::warn!("{}", MISSING_SENDER);
            self.ctx.sender().send(Payload::Error(MISSING_SENDER.to_owned()))?;
        }
        Ok(sender)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn close_policy(&self) -> ClosePolicy {
        self.close_policy
    }
}
