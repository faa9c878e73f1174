//! Tic-tac-toe game process: connects to the platform and plays rounds
//! until the connection ends.

use std::path::PathBuf;

use botarena::{Config, ConfigOverrides, GameClient};
use clap::Parser;
use tic_tac_toe::TicTacToe;

/// Tic-tac-toe game for the botarena platform
#[derive(Parser, Debug)]
#[command(name = "tic-tac-toe")]
#[command(about = "Tic-tac-toe game for the botarena platform")]
#[command(version)]
struct Args {
    /// Path to configuration file (default: botarena.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Platform host (overrides platform.host)
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Platform port (overrides platform.port)
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    /// Connect with wss:// (overrides platform.ssl)
    #[arg(long, value_name = "BOOL")]
    ssl: Option<bool>,

    /// Game token issued by the platform (overrides platform.game.token)
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            ssl: args.ssl,
            token: args.token,
            config_path: args.config,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    botarena::logging::init();

    let config = match Config::resolve(&args.into()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(botarena::ClientError::from(e).exit_code());
        }
    };

    if let Err(e) = GameClient::new(config, TicTacToe::new()).run().await {
        tracing::error!(error = %e, "game client stopped");
        std::process::exit(e.exit_code());
    }
}
