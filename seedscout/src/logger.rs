//! Log output for the command line.

use std::io;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

const DEFAULT_FILTER: &str = "info";

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `info`) and
/// routes `log` records into it.
///
/// Stdout is left alone for the JSON results.
pub fn init() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_timer(fmt::time::uptime()),
    );

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the tracing subscriber")?;
    tracing_log::LogTracer::init().context("failed to route log records to tracing")?;
    Ok(())
}
