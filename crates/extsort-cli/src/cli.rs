//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use extsort_wiring::PLATFORM_FILENAME;

/// Order extensions by the requirement graph of their contributing bundles
#[derive(Parser, Debug)]
#[command(name = "extsort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print extensions in dependency order
    ///
    /// Extensions contributed by a bundle come after the extensions of every
    /// bundle it requires, directly or through re-exports.
    ///
    /// Examples:
    ///   extsort order                          # Every point in platform.toml
    ///   extsort order snapshot.toml -p ui.menu # A single extension point
    ///   extsort order --json --strict          # Fail on cyclic bundles
    Order {
        /// Platform snapshot to load
        #[arg(env = "EXTSORT_PLATFORM", default_value = PLATFORM_FILENAME)]
        platform: PathBuf,

        /// Only order this extension point
        #[arg(short, long)]
        point: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Exit with an error when bundles form a cycle
        #[arg(long)]
        strict: bool,
    },

    /// List the bundles that see a bundle, directly or through re-exports
    Requirers {
        /// Platform snapshot to load
        ///
        /// Has no default because the bundle name follows it; set
        /// EXTSORT_PLATFORM to leave it out.
        #[arg(env = "EXTSORT_PLATFORM")]
        platform: PathBuf,

        /// Symbolic name of the bundle
        bundle: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Validate a platform snapshot and summarise it
    Check {
        /// Platform snapshot to load
        #[arg(env = "EXTSORT_PLATFORM", default_value = PLATFORM_FILENAME)]
        platform: PathBuf,
    },
}
