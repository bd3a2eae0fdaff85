//! Ordering extensions by the requirement graph of their contributing
//! bundles.
//!
//! An extension's key is the bundle currently serving its contributor name.
//! A bundle's requirers are every bundle that sees it, directly or through
//! re-exports, so an extension always comes after the extensions of the
//! bundles it can see. Extensions whose contributor does not resolve are left
//! unconstrained in arrival order.

use std::convert::Infallible;

use extsort_core::{Relation, Sorted, TopologicalSort, into_ok};

use crate::bundle::BundleId;
use crate::extension::Extension;
use crate::requirers::requirers_of;
use crate::wiring::{BundleLookup, Wiring};

/// Sorts [`Extension`]s by the dependencies of the bundles contributing them.
///
/// # Example
///
/// ```
/// use extsort_wiring::{BundleVersion, Extension, ExtensionsSort, Visibility, WiringRegistry};
///
/// let registry = WiringRegistry::new();
/// let core = registry.install("org.example.core", BundleVersion::new(1, 0, 0));
/// let ui = registry.install("org.example.ui", BundleVersion::new(1, 0, 0));
/// registry.wire(core, ui, Visibility::Private).unwrap();
///
/// let sorted = ExtensionsSort::new(&registry).order(vec![
///     Extension::new("org.example.model", "org.example.ui"),
///     Extension::new("org.example.model", "org.example.core"),
/// ]);
///
/// assert_eq!(sorted.items()[0].contributor, "org.example.core");
/// ```
pub struct ExtensionsSort<'a, R: ?Sized> {
    registry: &'a R,
}

impl<'a, R> ExtensionsSort<'a, R>
where
    R: Wiring + BundleLookup + ?Sized,
{
    pub fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// Sort `extensions`; cyclic bundle graphs degrade to arrival order.
    pub fn order(&self, extensions: Vec<Extension>) -> Sorted<Extension, BundleId> {
        into_ok(self.sort(extensions))
    }
}

impl<R> TopologicalSort for ExtensionsSort<'_, R>
where
    R: Wiring + BundleLookup + ?Sized,
{
    type Item = Extension;
    type Key = BundleId;
    type Error = Infallible;

    fn key_of(&self, extension: &Extension) -> Result<Option<BundleId>, Infallible> {
        let bundle = self.registry.bundle_for_name(&extension.contributor);
        if bundle.is_none() {
            tracing::debug!(
                contributor = %extension.contributor,
                point = %extension.point,
                "No bundle in use for contributor, extension left unconstrained"
            );
        }
        Ok(bundle)
    }

    fn requirements(&self, bundle: &BundleId) -> Result<Relation<BundleId>, Infallible> {
        // Sorted so absent nodes are ranked the same way on every run.
        let mut requiring: Vec<BundleId> = requirers_of(self.registry, *bundle).into_iter().collect();
        requiring.sort();
        Ok(Relation::Listed(requiring))
    }

    fn dependencies(&self, _bundle: &BundleId) -> Result<Relation<BundleId>, Infallible> {
        // Derived from requirements.
        Ok(Relation::Inverse)
    }
}
