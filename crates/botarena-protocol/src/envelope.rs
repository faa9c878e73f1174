//! The envelope: one tagged payload plus optional sender and recipients.
//!
//! Wire format (a single flat JSON object):
//!
//! ```text
//! { "type": "MOVE",
//!   "sender": { "token": "...", "name": "...", "ownerName": "..." },
//!   "recipients": [ { ... }, ... ],
//!   "payload": 4 }
//! ```
//!
//! `sender` and `recipients` are omitted when absent, and payloads without
//! a body (`INTERRUPT`) omit `payload`. The `type` tag and the body are
//! matched by hand rather than with a derived tagged enum so that unknown
//! tags land in [`Payload::Other`] with their body intact.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{BotIdentity, Payload, Recipients};

/// A single message exchanged with the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// What the message is about.
    pub payload: Payload,

    /// The bot that produced the message. Set by the platform on messages
    /// relayed from a bot; never needed on outbound messages.
    pub sender: Option<BotIdentity>,

    /// Who the platform should deliver the message to. `None` means
    /// the message is for the platform itself (or everyone it concerns).
    pub recipients: Option<Recipients>,
}

impl Envelope {
    /// An envelope with no sender and no recipients.
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            sender: None,
            recipients: None,
        }
    }

    /// Addresses the envelope to `recipients`.
    pub fn with_recipients(mut self, recipients: Recipients) -> Self {
        self.recipients = Some(recipients);
        self
    }

    /// Stamps the envelope with a sender.
    pub fn with_sender(mut self, sender: BotIdentity) -> Self {
        self.sender = Some(sender);
        self
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.payload.tag())?;
        if let Some(sender) = &self.sender {
            map.serialize_entry("sender", sender)?;
        }
        if let Some(recipients) = &self.recipients {
            map.serialize_entry("recipients", recipients)?;
        }
        match &self.payload {
            Payload::Register(text) | Payload::Error(text) | Payload::Log(text) => {
                map.serialize_entry("payload", text)?;
            }
            Payload::Interrupt => {}
            Payload::Start(descriptor) => map.serialize_entry("payload", descriptor)?,
            Payload::Finished(scores) => map.serialize_entry("payload", scores)?,
            Payload::GameUpdate(data) | Payload::Move(data) => {
                map.serialize_entry("payload", data)?;
            }
            Payload::Disqualify(bot) | Payload::BotDisconnected(bot) => {
                map.serialize_entry("payload", bot)?;
            }
            Payload::Other { body, .. } => {
                if let Some(body) = body {
                    map.serialize_entry("payload", body)?;
                }
            }
        }
        map.end()
    }
}

/// The envelope exactly as it appears on the wire, before the tag is
/// matched against a payload variant.
#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    tag: String,
    // `null` and a missing key both mean "no sender"; a malformed object
    // is still an error.
    #[serde(default)]
    sender: Option<BotIdentity>,
    #[serde(default)]
    recipients: Option<Recipients>,
    // Unlike `sender`, an explicit `null` body is kept as `Some(Null)` so
    // unknown tags round-trip exactly.
    #[serde(default, deserialize_with = "present")]
    payload: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::deserialize(deserializer)?;
        let tag = raw.tag;
        let payload = Payload::from_parts(tag.clone(), raw.payload).map_err(|e| {
            <D::Error as de::Error>::custom(format!("invalid {tag} payload: {e}"))
        })?;
        Ok(Envelope {
            payload,
            sender: raw.sender,
            recipients: raw.recipients,
        })
    }
}
