//! The outbound half of the session: builds envelopes and queues them.
//!
//! Game callbacks are synchronous, so the sender never touches the
//! socket. It encodes each envelope to text and pushes it onto an
//! unbounded channel; the session runner drains that channel to the
//! connection after every inbound message, in order.

use botarena_protocol::{
    BotIdentity, Codec, Envelope, JsonCodec, Payload, ProtocolError, Recipients,
};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::SendError;

/// Receiving end of the outbound queue, owned by the session runner.
pub type OutboundReceiver = mpsc::UnboundedReceiver<String>;

/// Builds, validates and queues outbound envelopes.
///
/// Cheap to clone: it's an `mpsc::UnboundedSender` and a zero-sized codec.
#[derive(Debug, Clone)]
pub struct MessageSender {
    tx: mpsc::UnboundedSender<String>,
    codec: JsonCodec,
}

impl MessageSender {
    /// Creates a sender and the receiver its text frames arrive on.
    pub fn channel() -> (Self, OutboundReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                codec: JsonCodec,
            },
            rx,
        )
    }

    /// Sends a payload with no recipients (for the platform itself).
    pub fn send(&self, payload: Payload) -> Result<(), SendError> {
        self.send_envelope(Envelope::new(payload))
    }

    /// Sends a payload to the given bots.
    ///
    /// # Errors
    /// [`SendError::InvalidArgument`] if `recipients` is empty. This is
    /// checked before anything is encoded.
    pub fn send_to(&self, payload: Payload, recipients: Vec<BotIdentity>) -> Result<(), SendError> {
        let recipients = Recipients::new(recipients)
            .map_err(|_| SendError::InvalidArgument("recipients must not be empty"))?;
        self.send_to_recipients(payload, recipients)
    }

    /// Sends a payload to an already validated recipient list.
    pub fn send_to_recipients(
        &self,
        payload: Payload,
        recipients: Recipients,
    ) -> Result<(), SendError> {
        self.send_envelope(Envelope::new(payload).with_recipients(recipients))
    }

    /// Sends a payload stamped with `sender` as its origin.
    pub fn send_as(&self, payload: Payload, sender: BotIdentity) -> Result<(), SendError> {
        self.send_envelope(Envelope::new(payload).with_sender(sender))
    }

    /// Asks `bot` for its next move, sending `data` as the `MOVE` body.
    pub fn send_move<T: Serialize>(&self, data: &T, bot: &BotIdentity) -> Result<(), SendError> {
        let body = to_body(data)?;
        self.send_to_recipients(Payload::Move(body), Recipients::one(bot.clone()))
    }

    /// Sends game-internal data (`GAME_UPDATE`) to `recipients`.
    pub fn send_update<T: Serialize>(
        &self,
        data: &T,
        recipients: &[BotIdentity],
    ) -> Result<(), SendError> {
        let body = to_body(data)?;
        self.send_to(Payload::GameUpdate(body), recipients.to_vec())
    }

    /// Sends an error message to a single bot.
    pub fn send_error(
        &self,
        message: impl Into<String>,
        bot: &BotIdentity,
    ) -> Result<(), SendError> {
        self.send_to_recipients(Payload::Error(message.into()), Recipients::one(bot.clone()))
    }

    /// Encodes `envelope` and queues the text unchanged for the transport.
    pub fn send_envelope(&self, envelope: Envelope) -> Result<(), SendError> {
        let text = self.codec.encode(&envelope).map_err(SendError::Encode)?;
        tracing::trace!(tag = envelope.payload.tag(), len = text.len(), "queued outbound message");
        self.tx.send(text).map_err(|_| SendError::ChannelClosed)
    }
}

fn to_body<T: Serialize>(data: &T) -> Result<serde_json::Value, SendError> {
    serde_json::to_value(data).map_err(|e| SendError::Encode(ProtocolError::Encode(e)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    fn bot(n: u128) -> BotIdentity {
        BotIdentity::new(Uuid::from_u128(n), format!("bot-{n}"), "owner")
    }

    fn next(rx: &mut OutboundReceiver) -> Envelope {
        let text = rx.try_recv().expect("a queued message");
        JsonCodec.decode(&text).expect("valid envelope")
    }

    #[test]
    fn test_send_has_no_recipients() {
        let (sender, mut rx) = MessageSender::channel();
        sender.send(Payload::Interrupt).unwrap();
        let env = next(&mut rx);
        assert_eq!(env.payload, Payload::Interrupt);
        assert!(env.recipients.is_none());
        assert!(env.sender.is_none());
    }

    #[test]
    fn test_send_to_empty_recipients_is_invalid_argument() {
        let (sender, mut rx) = MessageSender::channel();
        let err = sender.send_to(Payload::Log("x".into()), vec![]).unwrap_err();
        assert!(matches!(err, SendError::InvalidArgument(_)));
        assert!(rx.try_recv().is_err(), "nothing may be queued");
    }

    #[test]
    fn test_send_to_single_recipient() {
        let (sender, mut rx) = MessageSender::channel();
        sender.send_to(Payload::Log("x".into()), vec![bot(1)]).unwrap();
        let env = next(&mut rx);
        assert_eq!(env.recipients.unwrap().as_slice(), &[bot(1)]);
    }

    #[test]
    fn test_send_as_stamps_sender() {
        let (sender, mut rx) = MessageSender::channel();
        sender.send_as(Payload::Log("hi".into()), bot(4)).unwrap();
        assert_eq!(next(&mut rx).sender, Some(bot(4)));
    }

    #[test]
    fn test_send_move_addresses_one_bot() {
        let (sender, mut rx) = MessageSender::channel();
        sender.send_move(&json!({"board": [0, 1], "player": 0}), &bot(2)).unwrap();
        let env = next(&mut rx);
        assert_eq!(env.payload, Payload::Move(json!({"board": [0, 1], "player": 0})));
        assert_eq!(env.recipients.unwrap().as_slice(), &[bot(2)]);
    }

    #[test]
    fn test_send_update_rejects_unencodable_body() {
        let (sender, _rx) = MessageSender::channel();
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], 1);
        let err = sender.send_update(&bad, &[bot(1)]).unwrap_err();
        assert!(matches!(err, SendError::Encode(_)));
    }

    #[test]
    fn test_send_after_receiver_dropped_is_channel_closed() {
        let (sender, rx) = MessageSender::channel();
        drop(rx);
        let err = sender.send(Payload::Interrupt).unwrap_err();
        assert!(matches!(err, SendError::ChannelClosed));
    }

    #[test]
    fn test_messages_keep_send_order() {
        let (sender, mut rx) = MessageSender::channel();
        sender.send(Payload::Log("1".into())).unwrap();
        sender.send(Payload::Log("2".into())).unwrap();
        assert_eq!(next(&mut rx).payload, Payload::Log("1".into()));
        assert_eq!(next(&mut rx).payload, Payload::Log("2".into()));
    }
}
