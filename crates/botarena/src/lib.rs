//! # botarena
//!
//! Game-side client framework for the botarena bot competition platform.
//!
//! A game implements the [`Game`](botarena_game::Game) trait; the framework
//! connects to the platform, registers, decodes every message and calls
//! back into the game one message at a time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use botarena::prelude::*;
//!
//! // Implement Game for your game, then:
//! // botarena::logging::init();
//! // let config = Config::resolve(&ConfigOverrides::default())?;
//! // GameClient::new(config, MyGame::default()).run().await?;
//! ```

mod client;
mod config;
mod error;
pub mod logging;

pub use client::GameClient;
pub use config::{
    Config, ConfigError, ConfigOverrides, DEFAULT_CONFIG_FILE, GameSection, PlatformConfig,
};
pub use error::ClientError;

pub mod prelude {
    pub use crate::{ClientError, Config, ConfigOverrides, GameClient};
    pub use botarena_game::{
        Game, GameContext, GameError, GamePhase, MessageSender, OutboundReceiver, SendError,
    };
    pub use botarena_protocol::{
        BotIdentity, Envelope, Payload, Recipients, Scores, SessionDescriptor, Value,
    };
    pub use botarena_session::{ClosePolicy, SessionError};
}
