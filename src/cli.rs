//! Command-line interface definitions.
//!
//! Global options locate the site; each subcommand is one publishing step.
//! The site root and config file can also come from the environment.

use crate::models::Asset;
use crate::utils::parse_tag;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the site release publisher.
///
/// # Examples
///
/// ```sh
/// # Refresh the development docs
/// site_release develop ./build/htmldocs
///
/// # Publish a release with its notes and a downloadable asset
/// site_release release ./build/htmldocs v1.0.0 CHANGELOG.md \
///     --asset linux64=github-asset:app-linux-x64.tar.gz
///
/// # Take a release down again
/// site_release remove v1.0.0
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root directory of the static site sources
    #[arg(short = 'r', long, env = "SITE_ROOT", default_value = ".", global = true)]
    pub site_root: PathBuf,

    /// Optional path to a site config YAML file
    #[arg(short, long, env = "SITE_RELEASE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Update the develop branch documentation
    Develop {
        /// Path to the generated documentation
        docspath: PathBuf,
    },
    /// Add a new release: notes from the changelog, plus a docs snapshot
    Release {
        /// Path to the generated documentation
        docspath: PathBuf,
        /// Release tag to add (e.g. v1.0.0)
        #[arg(value_parser = parse_tag)]
        tag: String,
        /// Path to CHANGELOG.md
        changelog: PathBuf,
        /// Downloadable asset as NAME=METHOD:PARAM, METHOD is `github-asset` or `url`
        #[arg(short, long = "asset", value_name = "NAME=METHOD:PARAM")]
        assets: Vec<Asset>,
    },
    /// Remove a previously added release
    Remove {
        /// Release tag to remove
        #[arg(value_parser = parse_tag)]
        tag: String,
    },
    /// Store a release record for every version in the changelog
    Sync {
        /// Path to CHANGELOG.md
        changelog: PathBuf,
    },
    /// Print the notes of one release to stdout
    Notes {
        /// Path to CHANGELOG.md
        changelog: PathBuf,
        /// Release tag to print (e.g. v1.0.0)
        tag: String,
    },
}
