//! Configuration loading and resolution.
//!
//! A game process reads `botarena.toml`:
//!
//! ```toml
//! [platform]
//! host = "localhost"
//! port = 8080
//! ssl = false
//! on_close = "fail-fast"
//!
//! [platform.game]
//! token = "..."
//! ```
//!
//! Priority (highest to lowest):
//! 1. Command-line overrides
//! 2. The config file (a missing file only logs a warning)
//! 3. Defaults

use std::path::{Path, PathBuf};

use botarena_session::ClosePolicy;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "botarena.toml";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A required key has no value
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    /// `platform.ssl` is set but the build can't speak `wss://`
    #[error("platform.ssl is true but this build has no TLS support (enable the `tls` feature)")]
    TlsUnavailable,
}

/// Command-line overrides for configuration
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub ssl: Option<bool>,
    pub token: Option<String>,
    /// Path to config file override
    pub config_path: Option<PathBuf>,
}

/// Resolved configuration of a game process.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub platform: PlatformConfig,
}

/// The `[platform]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub host: String,
    /// Omitted from the endpoint when unset.
    pub port: Option<u16>,
    /// Use `wss://` instead of `ws://`.
    pub ssl: bool,
    pub on_close: ClosePolicy,
    pub game: GameSection,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: None,
            ssl: false,
            on_close: ClosePolicy::default(),
            game: GameSection::default(),
        }
    }
}

/// The `[platform.game]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameSection {
    /// Registration token of this game on the platform.
    pub token: Option<String>,
}

impl Config {
    /// Parses a config from TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a config file. Unlike [`resolve`](Self::resolve), a missing
    /// file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Resolves the configuration from defaults, the config file and
    /// `overrides`, then [validates](Self::validate) it.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let path = overrides
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            warn!("config file {} not found, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Checks that a token is present and that `ssl` can be honoured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token()?;
        if self.platform.ssl && !botarena_transport::TLS_ENABLED {
            return Err(ConfigError::TlsUnavailable);
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(host) = &overrides.host {
            self.platform.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.platform.port = Some(port);
        }
        if let Some(ssl) = overrides.ssl {
            self.platform.ssl = ssl;
        }
        if let Some(token) = &overrides.token {
            self.platform.game.token = Some(token.clone());
        }
    }

    /// Looks up a value by its flat key, e.g. `platform.game.token`.
    pub fn get(&self, key: &str) -> Option<String> {
        let platform = &self.platform;
        match key {
            "platform.host" => Some(platform.host.clone()),
            "platform.port" => platform.port.map(|p| p.to_string()),
            "platform.ssl" => Some(platform.ssl.to_string()),
            "platform.on_close" => Some(
                match platform.on_close {
                    ClosePolicy::FailFast => "fail-fast",
                    ClosePolicy::BestEffort => "best-effort",
                }
                .to_string(),
            ),
            "platform.game.token" => platform.game.token.clone(),
            _ => None,
        }
    }

    /// The registration token.
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.platform
            .game
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing("platform.game.token"))
    }

    /// The platform endpoint, `ws[s]://host[:port]/ws/game`.
    pub fn endpoint(&self) -> String {
        let platform = &self.platform;
        let scheme = if platform.ssl { "wss" } else { "ws" };
        match platform.port {
            Some(port) => format!("{scheme}://{}:{port}/ws/game", platform.host),
            None => format!("{scheme}://{}/ws/game", platform.host),
        }
    }
}
