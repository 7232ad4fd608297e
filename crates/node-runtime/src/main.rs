//! # Mini-Chain Node
//!
//! Runs one command against the node's chain store and exits.
//!
//! ## Startup Sequence
//!
//! 1. Install the tracing subscriber (`RUST_LOG`, default `info`)
//! 2. Load configuration (defaults, `MC_CONFIG` file, `MC_*` env)
//! 3. Run `MC_COMMAND` (`init`, `append` or `print`)

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::{load_config, run};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config().context("Failed to load configuration")?;
    info!(
        command = ?config.command,
        backend = ?config.backend,
        path = %config.store.path().display(),
        "Starting Mini-Chain node"
    );

    let stdout = std::io::stdout();
    run(&config, &mut stdout.lock())
}
