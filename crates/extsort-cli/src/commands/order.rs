//! Order command implementation
//!
//! Prints the extensions of each point in the order their contributing
//! bundles require.

use std::collections::BTreeSet;
use std::path::Path;

use colored::Colorize;
use serde_json::json;

use extsort_core::Sorted;
use extsort_wiring::{BundleId, BundleLookup, Extension, ExtensionsSort, WiringRegistry};

use crate::error::{CliError, Result};

/// Run the order command
pub fn run_order(path: &Path, point: Option<&str>, json: bool, strict: bool) -> Result<()> {
    let installed = super::install(path)?;

    let points = match point {
        Some(point) if installed.extensions.extensions_for(point).is_empty() => {
            return Err(CliError::user(format!(
                "no extensions contribute to point '{point}'"
            )));
        }
        Some(point) => vec![point.to_string()],
        None => installed.extensions.points(),
    };

    let sorter = ExtensionsSort::new(&installed.wiring);
    let orders: Vec<(String, Sorted<Extension, BundleId>)> = points
        .into_iter()
        .map(|point| {
            let sorted = sorter.order(installed.extensions.extensions_for(&point).to_vec());
            (point, sorted)
        })
        .collect();

    let cyclic: BTreeSet<String> = orders
        .iter()
        .flat_map(|(_, sorted)| sorted.unresolved())
        .map(|id| bundle_label(&installed.wiring, *id))
        .collect();

    if json {
        print_json(&installed.wiring, &orders)?;
    } else {
        print_orders(&installed.wiring, &orders);
    }

    if !cyclic.is_empty() {
        let names = cyclic.into_iter().collect::<Vec<_>>().join(", ");
        if strict {
            return Err(CliError::user(format!(
                "bundles form a requirement cycle: {names}"
            )));
        }
        eprintln!(
            "{} bundles form a requirement cycle, their extensions keep declaration order: {}",
            "warning:".yellow().bold(),
            names
        );
    }

    Ok(())
}

/// `name_version` of an installed bundle, or its id if it was removed.
fn bundle_label(wiring: &WiringRegistry, id: BundleId) -> String {
    wiring
        .bundle(id)
        .map(|bundle| bundle.to_string())
        .unwrap_or_else(|| id.to_string())
}

fn contributor_label(wiring: &WiringRegistry, extension: &Extension) -> Option<String> {
    wiring
        .bundle_for_name(&extension.contributor)
        .map(|id| bundle_label(wiring, id))
}

fn print_json(wiring: &WiringRegistry, orders: &[(String, Sorted<Extension, BundleId>)]) -> Result<()> {
    let output = json!({
        "complete": orders.iter().all(|(_, sorted)| sorted.is_complete()),
        "points": orders.iter()
            .map(|(point, sorted)| {
                json!({
                    "point": point,
                    "extensions": sorted.items().iter()
                        .map(|extension| {
                            json!({
                                "contributor": extension.contributor,
                                "id": extension.unique_id,
                                "label": extension.label,
                                "bundle": contributor_label(wiring, extension),
                            })
                        })
                        .collect::<Vec<_>>(),
                    "unresolved": sorted.unresolved().iter()
                        .map(|id| bundle_label(wiring, *id))
                        .collect::<Vec<_>>(),
                })
            })
            .collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_orders(wiring: &WiringRegistry, orders: &[(String, Sorted<Extension, BundleId>)]) {
    if orders.is_empty() {
        println!("{}", "No extensions registered.".dimmed());
        return;
    }

    for (index, (point, sorted)) in orders.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("{}:", point.cyan().bold());

        for (position, extension) in sorted.items().iter().enumerate() {
            let bundle = match contributor_label(wiring, extension) {
                Some(label) => label.dimmed(),
                None => "no bundle in use".yellow(),
            };
            let name = match &extension.label {
                Some(label) => format!("{} {}", extension.display_name().green(), label),
                None => extension.display_name().green().to_string(),
            };
            println!("  {:>3}. {} ({})", position + 1, name, bundle);
        }
    }
}
