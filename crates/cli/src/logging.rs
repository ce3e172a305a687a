//! Logging configuration for the shipit CLI
//!
//! Terminal output via tracing; `--verbose` raises the level to debug and
//! `RUST_LOG` overrides everything.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable debug level logging
pub fn init(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    // Allows overriding with the RUST_LOG env var
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!("shipit={level},shipit_engine={level},shipit_core={level}"))
    })?;

    let stdout_layer = if verbose {
        fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_ansi(true)
            .boxed()
    } else {
        // No timestamps in normal mode
        fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .without_time()
            .compact()
            .with_ansi(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .init();

    Ok(())
}
