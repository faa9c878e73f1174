//! Session layer for botarena.
//!
//! The [`Dispatcher`] owns one [`Game`](botarena_game::Game) and its
//! [`GameContext`](botarena_game::GameContext). The runner feeds it
//! transport events (open, text frame, close, error) one at a time; it
//! decodes each frame and calls the matching game callback.
//!
//! # How it fits in the stack
//!
//! ```text
//! Runner (above)           ← owns the connection, flushes the outbound queue
//!     ↕
//! Session (this crate)     ← decodes, routes, tracks registration
//!     ↕
//! Game (below)             ← rules, talks back through MessageSender
//! ```

mod dispatcher;
mod error;
mod state;

pub use dispatcher::{Dispatcher, MISSING_SENDER};
pub use error::SessionError;
pub use state::{ClosePolicy, SessionState};
