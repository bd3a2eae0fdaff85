//! Requirers command implementation

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use extsort_wiring::{Bundle, BundleLookup, requirers_of};

use crate::error::{CliError, Result};

/// Run the requirers command
pub fn run_requirers(path: &Path, name: &str, json: bool) -> Result<()> {
    let installed = super::install(path)?;
    let wiring = &installed.wiring;

    let Some(id) = wiring.bundle_for_name(name) else {
        return Err(CliError::user(format!("no bundle in use named '{name}'")));
    };

    let mut requiring: Vec<Bundle> = requirers_of(wiring, id)
        .into_iter()
        .filter_map(|requirer| wiring.bundle(requirer))
        .collect();
    requiring.sort_by(|a, b| {
        a.symbolic_name
            .cmp(&b.symbolic_name)
            .then_with(|| a.version.cmp(&b.version))
    });

    if json {
        let output = json!({
            "bundle": name,
            "requirers": requiring.iter()
                .map(|bundle| {
                    json!({
                        "name": bundle.symbolic_name,
                        "version": bundle.version.to_string(),
                        "in_use": bundle.in_use,
                    })
                })
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if requiring.is_empty() {
        println!("{} is not required by any bundle.", name.cyan());
        return Ok(());
    }

    println!("{} {}:", "Bundles requiring".bold(), name.cyan().bold());
    for bundle in &requiring {
        let marker = if bundle.in_use {
            "+".green()
        } else {
            "-".yellow()
        };
        println!(
            "  {} {} {}",
            marker,
            bundle.symbolic_name,
            bundle.version.to_string().dimmed()
        );
    }

    Ok(())
}
