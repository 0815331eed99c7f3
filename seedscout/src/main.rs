//! # SeedScout
//!
//! Command-line front end: parses a search from the arguments, runs it and
//! prints the ranked results as JSON.
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(clippy::single_call_fn, clippy::multiple_inherent_impl)]

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use seedscout_core::{SearchEngine, SearchSettings};
use tokio_util::sync::CancellationToken;

mod cli;
mod logger;

use cli::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logger::init()?;

    let settings = match &args.config {
        Some(path) => SearchSettings::load_or_create(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => SearchSettings::default(),
    };

    let engine = SearchEngine::new(&settings, args.to_request())?;
    log::info!(
        "Searching seed {} around ({}, {}, {})",
        engine.seed(),
        args.x,
        args.y,
        args.z
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling search");
            ctrl_c.cancel();
        }
    });

    let results = engine
        .run_async(cancel, |progress| {
            log::debug!("Batch {}/{}", progress.completed, progress.total);
        })
        .await?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
