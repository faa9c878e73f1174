//! Wire protocol for botarena.
//!
//! This crate defines the language a game process and the platform speak:
//!
//! - **Types** ([`Envelope`], [`Payload`], [`BotIdentity`],
//!   [`SessionDescriptor`], [`Scores`], [`Recipients`]): the structures
//!   that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those structures
//!   become text frames and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw text) and the session
//! dispatcher. It knows nothing about connections or game rules.
//!
//! ```text
//! Transport (text) → Protocol (Envelope) → Session (dispatch) → Game
//! ```

mod codec;
mod envelope;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use envelope::Envelope;
pub use error::ProtocolError;
pub use types::{tag, BotIdentity, Payload, Recipients, Scores, SessionDescriptor};

/// Re-exported so games can build payload bodies without a direct
/// `serde_json` dependency.
pub use serde_json::Value;
