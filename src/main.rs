//! # Site Release
//!
//! Publishes documentation snapshots and changelog release notes into the
//! sources of a statically generated project website.
//!
//! ## Commands
//!
//! - `develop`: replace the `develop` docs snapshot
//! - `release`: extract a version from a "Keep a Changelog" file, store it as a
//!   JSON release record and snapshot the docs under the release tag
//! - `remove`: delete a release's docs snapshot, redirect and record
//! - `sync`: store a record for every version in the changelog
//! - `notes`: print one version's notes
//!
//! ## Usage
//!
//! ```sh
//! site_release release ./htmldocs v1.0.0 CHANGELOG.md
//! ```
//!
//! ## Architecture
//!
//! 1. **Scanning**: [`changelog`] walks the changelog headings
//! 2. **Storing**: [`store`] writes one JSON record per release for the site generator
//! 3. **Output**: [`outputs`] copies docs and writes redirect templates

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod changelog;
mod cli;
mod commands;
mod config;
mod models;
mod outputs;
mod store;
mod utils;

use cli::{Cli, Command};
use config::SiteConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(site_root = %args.site_root.display(), config = ?args.config, "Parsed CLI arguments");

    let config = SiteConfig::load(&args.site_root, args.config.as_deref())?;
    debug!(?config, "Resolved site layout");

    match args.command {
        Command::Develop { docspath } => commands::develop(&config, &docspath).await?,
        Command::Release {
            docspath,
            tag,
            changelog,
            assets,
        } => commands::release(&config, &docspath, &tag, &changelog, assets).await?,
        Command::Remove { tag } => commands::remove(&config, &tag).await?,
        Command::Sync { changelog } => {
            commands::sync(&config, &changelog)?;
        }
        Command::Notes { changelog, tag } => {
            println!("{}", commands::notes(&changelog, &tag)?);
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}
