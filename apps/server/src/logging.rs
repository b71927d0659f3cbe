//! Structured logging using the tracing crate.
//!
//! Writes to stdout; the level is controlled by `RUST_LOG` (defaults to "info").

use tracing_subscriber::prelude::*;

pub fn init_logging() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Logging already initialized: {e}"))?;

    tracing::debug!("Logging initialized");
    Ok(())
}
