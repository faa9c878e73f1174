//! Codec trait and the JSON implementation.
//!
//! A codec converts between Rust types and the text frames that travel
//! over the platform connection. The dispatcher and the outbound sender
//! only talk to the [`Codec`] trait, so the envelope module never needs
//! to know which JSON library sits underneath.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to text and decode text back.
///
/// The platform speaks text frames, so unlike a byte codec both
/// directions work on `String`/`&str`.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value can't be represented
    /// in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a text frame back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the text is malformed or
    /// doesn't match the expected type.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use botarena_protocol::{Codec, Envelope, JsonCodec, Payload};
///
/// let codec = JsonCodec;
/// let envelope = Envelope::new(Payload::Register("secret".into()));
///
/// let text = codec.encode(&envelope).unwrap();
/// assert_eq!(text, r#"{"type":"REGISTER","payload":"secret"}"#);
///
/// let decoded: Envelope = codec.decode(&text).unwrap();
/// assert_eq!(envelope, decoded);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_encode_non_string_keys_fails() {
        // JSON object keys must be strings; a tuple key can't be represented.
        let mut map = HashMap::new();
        map.insert((1, 2), "x");
        let err = JsonCodec.encode(&map).unwrap_err();
        assert!(matches!(err, ProtocolError::Encode(_)));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = JsonCodec.decode::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }
}
