//! Transitive requirers of a bundle.
//!
//! A bundle is seen by every bundle wired to it, and additionally by the
//! requirers of any requirer that re-exports it. The walk below collects that
//! whole set with an explicit work stack. The visited set tracks expanded
//! providers, so re-export cycles terminate and a requirer reached first
//! through a private wire is still expanded when a re-exporting wire to it
//! turns up later.
//!
//! No lock is held across the walk. A provider whose wiring goes stale
//! between queries simply contributes no further requirers.

use std::collections::HashSet;

use crate::bundle::BundleId;
use crate::wiring::Wiring;

/// The bundles that currently require `bundle`, directly or through
/// re-exports.
///
/// Empty when the bundle's wiring is not in use.
pub fn requirers_of<W: Wiring + ?Sized>(wiring: &W, bundle: BundleId) -> HashSet<BundleId> {
    let mut requiring = HashSet::new();
    if !wiring.is_in_use(bundle) {
        tracing::debug!(%bundle, "Bundle wiring not in use, no requirers");
        return requiring;
    }

    let mut expanded = HashSet::from([bundle]);
    let mut pending = vec![bundle];

    while let Some(provider) = pending.pop() {
        let Some(wires) = wiring.provided_wires(provider) else {
            tracing::debug!(%provider, "Wiring went stale during requirer walk");
            continue;
        };

        for wire in wires {
            requiring.insert(wire.requirer);
            if wire.reexports() && expanded.insert(wire.requirer) {
                pending.push(wire.requirer);
            }
        }
    }

    requiring
}
