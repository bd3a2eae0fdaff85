//! Check command implementation
//!
//! Validates a platform snapshot and summarises what it installs.

use std::path::Path;

use colored::Colorize;

use extsort_wiring::ExtensionsSort;

use crate::error::Result;

/// Run the check command
pub fn run_check(path: &Path) -> Result<()> {
    let installed = super::install(path)?;
    let wiring = &installed.wiring;

    let bundles = wiring.bundles();
    let stale = bundles.iter().filter(|bundle| !bundle.in_use).count();
    let wires = wiring.wires();
    let reexports = wires.iter().filter(|wire| wire.reexports()).count();
    let points = installed.extensions.points();

    println!("{} {}", "OK".green().bold(), path.display());
    println!();
    println!(
        "{}:     {} ({} stale)",
        "Bundles".dimmed(),
        bundles.len(),
        stale
    );
    println!(
        "{}:       {} ({} re-exported)",
        "Wires".dimmed(),
        wires.len(),
        reexports
    );
    println!(
        "{}:  {} across {} points",
        "Extensions".dimmed(),
        installed.extensions.len(),
        points.len()
    );

    let sorter = ExtensionsSort::new(wiring);
    for point in &points {
        let sorted = sorter.order(installed.extensions.extensions_for(point).to_vec());
        if !sorted.is_complete() {
            println!(
                "{} {} has extensions from cyclic bundles; declaration order kept",
                "warning:".yellow().bold(),
                point.cyan()
            );
        }
    }

    Ok(())
}
