//! The abstract round state machine shared by every game.

use std::fmt;

use botarena_protocol::BotIdentity;

/// Where the current round stands.
///
/// ```text
/// Idle → Started → AwaitingMove ⟲ → Idle
///           │            │
///           └────────────┴──(interrupt / disconnect / finish)──→ Idle
/// ```
///
/// `Idle` is both the initial state and the state every round returns
/// to; the process loops through many rounds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// No round running, ready for `START`.
    #[default]
    Idle,
    /// `START` received, first move not requested yet.
    Started,
    /// Waiting on `bot` to move.
    AwaitingMove { bot: BotIdentity },
}

impl GamePhase {
    /// Returns `true` while a round is running.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The bot whose turn it is, if any.
    pub fn awaiting(&self) -> Option<&BotIdentity> {
        match self {
            Self::AwaitingMove { bot } => Some(bot),
            _ => None,
        }
    }

    /// Returns `true` if moving to `target` follows the state machine.
    ///
    /// Returning to `Idle` is always allowed, and a new `START` may
    /// replace a running round.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        match (self, target) {
            (_, Self::Idle) | (_, Self::Started) => true,
            (Self::Started, Self::AwaitingMove { .. }) => true,
            (Self::AwaitingMove { .. }, Self::AwaitingMove { .. }) => true,
            (Self::Idle, Self::AwaitingMove { .. }) => false,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Started => write!(f, "Started"),
            Self::AwaitingMove { bot } => write!(f, "AwaitingMove({})", bot.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn awaiting() -> GamePhase {
        GamePhase::AwaitingMove {
            bot: BotIdentity::new(Uuid::from_u128(1), "a", "o"),
        }
    }

    #[test]
    fn test_phase_transitions() {
        assert!(GamePhase::Idle.can_transition_to(&GamePhase::Started));
        assert!(GamePhase::Started.can_transition_to(&awaiting()));
        assert!(awaiting().can_transition_to(&awaiting()));
        assert!(awaiting().can_transition_to(&GamePhase::Idle));
        assert!(!GamePhase::Idle.can_transition_to(&awaiting()));
    }

    #[test]
    fn test_phase_is_active_and_awaiting() {
        assert!(!GamePhase::Idle.is_active());
        assert!(GamePhase::Started.is_active());
        assert_eq!(awaiting().awaiting().map(|b| b.name()), Some("a"));
        assert!(GamePhase::Started.awaiting().is_none());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(GamePhase::Idle.to_string(), "Idle");
        assert_eq!(awaiting().to_string(), "AwaitingMove(a)");
    }
}
