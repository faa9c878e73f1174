//! Process-wide logging setup for game binaries.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG`
/// (default `info`).
///
/// Safe to call more than once; only the first call installs anything.
/// Messages the platform sends us are logged under the `platform`
/// target, so `RUST_LOG=info,platform=debug` shows them.
pub fn init() {
    if INIT.get().is_some() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    let _ = INIT.set(());
}
