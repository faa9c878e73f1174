//! Game lifecycle contract for botarena.
//!
//! # Key types
//!
//! - [`Game`]: the trait game developers implement
//! - [`GameContext`]: descriptor, roster and phase owned by the framework
//! - [`MessageSender`]: builds and queues outbound envelopes
//! - [`GamePhase`]: the round state machine

mod context;
mod error;
mod game;
mod phase;
mod sender;

pub use context::GameContext;
pub use error::{GameError, SendError};
pub use game::Game;
pub use phase::GamePhase;
pub use sender::{MessageSender, OutboundReceiver};
