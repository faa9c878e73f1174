//! Session state and the close policy.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where the session stands with the platform.
///
/// ```text
///   Disconnected ──(open)──→ AwaitingRegistration ──(REGISTER ack)──→ Registered
///        ↑                                                               │
///        └──────────────────────────(close)──────────────────────────────┘
/// ```
///
/// Messages are dispatched in every state; the platform may skip the
/// acknowledgement and go straight to `START`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    /// `REGISTER` sent, no acknowledgement yet.
    AwaitingRegistration,
    /// The platform acknowledged the registration.
    Registered,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::AwaitingRegistration => "awaiting-registration",
            Self::Registered => "registered",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ClosePolicy
// ---------------------------------------------------------------------------

/// What a lost connection means for the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClosePolicy {
    /// A close or transport error ends the session with
    /// [`SessionError::ConnectionLost`](crate::SessionError::ConnectionLost).
    #[default]
    FailFast,
    /// Log it and end the session cleanly.
    BestEffort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_policy_is_kebab_case() {
        let policy: ClosePolicy = serde_json::from_str("\"best-effort\"").unwrap();
        assert_eq!(policy, ClosePolicy::BestEffort);
        assert_eq!(serde_json::to_string(&ClosePolicy::FailFast).unwrap(), "\"fail-fast\"");
        assert_eq!(ClosePolicy::default(), ClosePolicy::FailFast);
    }
}
