//! Error types for the protocol layer.
//!
//! Each crate in botarena defines its own error enum. A `ProtocolError`
//! always means the problem is in turning envelopes into text or back,
//! never in networking or game rules.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into JSON text).
    ///
    /// On the outbound path this is a caller bug, e.g. a move object
    /// whose map keys are not strings.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserialization failed.
    ///
    /// Common causes: malformed JSON, a missing `type` tag, a body that
    /// doesn't match its tag, or a `sender` that is present but malformed.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// A recipient list was empty. Sending to nobody is not a broadcast.
    #[error("recipient list must not be empty")]
    EmptyRecipients,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_recipients_message() {
        assert_eq!(
            ProtocolError::EmptyRecipients.to_string(),
            "recipient list must not be empty"
        );
    }

    #[test]
    fn test_decode_error_wraps_serde_message() {
        let inner = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ProtocolError::Decode(inner);
        assert!(err.to_string().starts_with("decode failed:"));
    }
}
