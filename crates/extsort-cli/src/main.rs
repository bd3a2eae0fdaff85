//! extsort CLI
//!
//! Loads a platform snapshot and orders its extensions by the requirement
//! graph of the contributing bundles.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} could not set up logging: {}", "warning:".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} extension ordering", "extsort".green().bold());
            println!();
            println!("Run {} for available commands.", "extsort --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Order {
            platform,
            point,
            json,
            strict,
        } => commands::run_order(&platform, point.as_deref(), json, strict),
        Commands::Requirers {
            platform,
            bundle,
            json,
        } => commands::run_requirers(&platform, &bundle, json),
        Commands::Check { platform } => commands::run_check(&platform),
    }
}
