//! Core protocol types for the platform wire format.
//!
//! Everything in here travels "on the wire": bot identities, the session
//! descriptor sent with `START`, score tables, recipient lists and the
//! payload union itself. The envelope that wraps them lives in
//! [`crate::envelope`].

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Deserializer};
use serde::ser::{self, SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// BotIdentity
// ---------------------------------------------------------------------------

/// A remote bot taking part in a game round.
///
/// Identity is the `token` alone: two values with the same token are the
/// same bot even if the platform renamed it between messages. `name` and
/// `owner_name` are descriptive only. The fields are private so an identity
/// can't change after it has been handed to the game.
///
/// On the wire: `{ "token": "<uuid>", "name": "...", "ownerName": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotIdentity {
    token: Uuid,
    name: String,
    owner_name: String,
}

impl BotIdentity {
    /// Creates a new identity.
    pub fn new(token: Uuid, name: impl Into<String>, owner_name: impl Into<String>) -> Self {
        Self {
            token,
            name: name.into(),
            owner_name: owner_name.into(),
        }
    }

    /// The platform-assigned token. This is what equality compares.
    pub fn token(&self) -> Uuid {
        self.token
    }

    /// The bot's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the bot's owner.
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }
}

impl PartialEq for BotIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for BotIdentity {}

impl Hash for BotIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

impl fmt::Display for BotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.token)
    }
}

// ---------------------------------------------------------------------------
// SessionDescriptor
// ---------------------------------------------------------------------------

/// Everything the platform tells us about a round when it sends `START`.
///
/// `module_name` selects the variant of the game (board size, rules).
/// The descriptor is replaced as a whole on the next `START`; nothing in
/// the framework mutates it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    /// Human-readable name of the game, if the platform sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The module (game variant) to run.
    #[serde(rename = "module", alias = "moduleName")]
    pub module_name: String,

    /// Version string of the game implementation on the platform.
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,

    /// Free-form game settings.
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: Map<String, Value>,

    /// The participating bots, in turn order.
    pub bots: Vec<BotIdentity>,
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Final scores of a round, keyed by bot.
///
/// JSON object keys must be strings, so on the wire each key is the
/// compact JSON text of the [`BotIdentity`]:
///
/// ```text
/// { "{\"token\":\"...\",\"name\":\"a\",\"ownerName\":\"o\"}": 2, ... }
/// ```
///
/// Insertion order is kept for display; equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct Scores {
    entries: Vec<(BotIdentity, i64)>,
}

impl Scores {
    /// Creates an empty score table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the score of `bot`, replacing any earlier value.
    pub fn insert(&mut self, bot: BotIdentity, score: i64) {
        match self.entries.iter_mut().find(|(b, _)| *b == bot) {
            Some(entry) => entry.1 = score,
            None => self.entries.push((bot, score)),
        }
    }

    /// Returns the score of `bot`, if it has one.
    pub fn get(&self, bot: &BotIdentity) -> Option<i64> {
        self.entries
            .iter()
            .find(|(b, _)| b == bot)
            .map(|(_, score)| *score)
    }

    /// Iterates over `(bot, score)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&BotIdentity, i64)> {
        self.entries.iter().map(|(bot, score)| (bot, *score))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Scores {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(bot, score)| other.get(bot) == Some(score))
    }
}

impl FromIterator<(BotIdentity, i64)> for Scores {
    fn from_iter<I: IntoIterator<Item = (BotIdentity, i64)>>(iter: I) -> Self {
        let mut scores = Scores::new();
        for (bot, score) in iter {
            scores.insert(bot, score);
        }
        scores
    }
}

impl Serialize for Scores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (bot, score) in &self.entries {
            let key = serde_json::to_string(bot).map_err(<S::Error as ser::Error>::custom)?;
            map.serialize_entry(&key, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Scores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, i64>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, score)| {
                serde_json::from_str::<BotIdentity>(&key)
                    .map(|bot| (bot, score))
                    .map_err(|e| {
                        <D::Error as de::Error>::custom(format!("invalid score key {key:?}: {e}"))
                    })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Recipients
// ---------------------------------------------------------------------------

/// A non-empty list of bots an envelope is addressed to.
///
/// There is no way to build an empty `Recipients`: [`Recipients::new`]
/// rejects an empty vector and decoding rejects an empty JSON array.
/// An envelope for "no particular bot" carries no recipients at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BotIdentity>", into = "Vec<BotIdentity>")]
pub struct Recipients(Vec<BotIdentity>);

impl Recipients {
    /// Wraps a recipient list.
    ///
    /// # Errors
    /// Returns [`ProtocolError::EmptyRecipients`] if `bots` is empty.
    pub fn new(bots: Vec<BotIdentity>) -> Result<Self, ProtocolError> {
        if bots.is_empty() {
            return Err(ProtocolError::EmptyRecipients);
        }
        Ok(Self(bots))
    }

    /// A single recipient.
    pub fn one(bot: BotIdentity) -> Self {
        Self(vec![bot])
    }

    pub fn as_slice(&self) -> &[BotIdentity] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, bot: &BotIdentity) -> bool {
        self.0.contains(bot)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BotIdentity> {
        self.0.iter()
    }
}

impl TryFrom<Vec<BotIdentity>> for Recipients {
    type Error = ProtocolError;

    fn try_from(bots: Vec<BotIdentity>) -> Result<Self, Self::Error> {
        Self::new(bots)
    }
}

impl From<Recipients> for Vec<BotIdentity> {
    fn from(recipients: Recipients) -> Self {
        recipients.0
    }
}

impl<'a> IntoIterator for &'a Recipients {
    type Item = &'a BotIdentity;
    type IntoIter = std::slice::Iter<'a, BotIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Wire tags, one per [`Payload`] variant.
pub mod tag {
    pub const REGISTER: &str = "REGISTER";
    pub const ERROR: &str = "ERROR";
    pub const INTERRUPT: &str = "INTERRUPT";
    pub const START: &str = "START";
    pub const FINISHED: &str = "FINISHED";
    pub const GAME_UPDATE: &str = "GAME_UPDATE";
    pub const MOVE: &str = "MOVE";
    pub const DISQUALIFY: &str = "DISQUALIFY";
    pub const BOT_DISCONNECTED: &str = "BOT_DISCONNECTED";
    pub const LOG: &str = "LOG";

    /// Older platform name for `GAME_UPDATE`, accepted on decode.
    pub const GAME_INTERNAL: &str = "GAME_INTERNAL";
    /// Older platform name for `BOT_DISCONNECTED`, accepted on decode.
    pub const BOT_CLIENT_DISCONNECTED: &str = "BOT_CLIENT_DISCONNECTED";
}

/// The closed set of message kinds exchanged with the platform.
///
/// `Other` is the catch-all: any tag this crate doesn't know decodes into
/// it (keeping the tag and raw body) so the dispatcher can hand it to the
/// game instead of dropping it. Because known tags always decode into
/// their own variant, an `Other` built with a known tag won't survive a
/// round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Game → platform: register with the pre-shared token.
    /// Platform → game: registration acknowledged.
    Register(String),
    /// A protocol-level error message.
    Error(String),
    /// Abort the running round.
    Interrupt,
    /// Platform → game: a new round starts.
    Start(SessionDescriptor),
    /// Game → platform: the round ended with these scores.
    Finished(Scores),
    /// Game-internal data, e.g. the board broadcast to all bots.
    GameUpdate(Value),
    /// A move request (game → bot) or a move (bot → game).
    Move(Value),
    /// Game → platform: this bot is out of the round.
    Disqualify(BotIdentity),
    /// Platform → game: this bot lost its connection.
    BotDisconnected(BotIdentity),
    /// Free-form log text.
    Log(String),
    /// Any tag not listed above.
    Other { tag: String, body: Option<Value> },
}

impl Payload {
    /// The wire tag for this payload.
    pub fn tag(&self) -> &str {
        match self {
            Self::Register(_) => tag::REGISTER,
            Self::Error(_) => tag::ERROR,
            Self::Interrupt => tag::INTERRUPT,
            Self::Start(_) => tag::START,
            Self::Finished(_) => tag::FINISHED,
            Self::GameUpdate(_) => tag::GAME_UPDATE,
            Self::Move(_) => tag::MOVE,
            Self::Disqualify(_) => tag::DISQUALIFY,
            Self::BotDisconnected(_) => tag::BOT_DISCONNECTED,
            Self::Log(_) => tag::LOG,
            Self::Other { tag, .. } => tag,
        }
    }

    /// Builds a payload from its wire tag and optional body.
    ///
    /// `REGISTER` and `FINISHED` tolerate a missing body, since the
    /// platform echoes them back as bare acknowledgements.
    pub(crate) fn from_parts(
        tag: String,
        body: Option<Value>,
    ) -> Result<Self, serde_json::Error> {
        let payload = match tag.as_str() {
            tag::REGISTER => Self::Register(optional(body)?.unwrap_or_default()),
            tag::ERROR => Self::Error(required(body)?),
            tag::INTERRUPT => Self::Interrupt,
            tag::START => Self::Start(required(body)?),
            tag::FINISHED => Self::Finished(optional(body)?.unwrap_or_default()),
            tag::GAME_UPDATE | tag::GAME_INTERNAL => {
                Self::GameUpdate(body.unwrap_or(Value::Null))
            }
            tag::MOVE => Self::Move(body.unwrap_or(Value::Null)),
            tag::DISQUALIFY => Self::Disqualify(required(body)?),
            tag::BOT_DISCONNECTED | tag::BOT_CLIENT_DISCONNECTED => {
                Self::BotDisconnected(required(body)?)
            }
            tag::LOG => Self::Log(required(body)?),
            _ => Self::Other { tag, body },
        };
        Ok(payload)
    }
}

fn required<T: de::DeserializeOwned>(body: Option<Value>) -> Result<T, serde_json::Error> {
    serde_json::from_value(body.unwrap_or(Value::Null))
}

/// A missing body and an explicit `null` both mean "no body".
fn optional<T: de::DeserializeOwned>(body: Option<Value>) -> Result<Option<T>, serde_json::Error> {
    body.filter(|v| !v.is_null()).map(serde_json::from_value).transpose()
}
