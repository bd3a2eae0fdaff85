//! The live bundle wiring registry.
//!
//! [`Wiring`] and [`BundleLookup`] are the read-only capabilities the
//! ordering code consumes. [`WiringRegistry`] is the in-memory implementation:
//! it may be mutated from other threads while a sort is running, and every
//! query takes and releases its own read lock, so a walk over the graph only
//! ever sees per-query snapshots.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::bundle::{Bundle, BundleId, BundleWire, Visibility};
use crate::error::{Error, Result};
use crate::version::{BundleVersion, VersionRange};

/// Read access to the resolved requirement graph.
pub trait Wiring {
    /// Whether the bundle's current wiring is in use.
    fn is_in_use(&self, bundle: BundleId) -> bool;

    /// Wires for which `bundle` is the provider.
    ///
    /// `None` when the bundle is unknown or its wiring is no longer in use.
    fn provided_wires(&self, bundle: BundleId) -> Option<Vec<BundleWire>>;
}

/// Resolution of symbolic names to installed bundles.
pub trait BundleLookup {
    /// The highest version in use carrying `symbolic_name`.
    fn bundle_for_name(&self, symbolic_name: &str) -> Option<BundleId>;
}

impl<T: Wiring + ?Sized> Wiring for &T {
    fn is_in_use(&self, bundle: BundleId) -> bool {
        (**self).is_in_use(bundle)
    }

    fn provided_wires(&self, bundle: BundleId) -> Option<Vec<BundleWire>> {
        (**self).provided_wires(bundle)
    }
}

impl<T: Wiring + ?Sized> Wiring for Arc<T> {
    fn is_in_use(&self, bundle: BundleId) -> bool {
        (**self).is_in_use(bundle)
    }

    fn provided_wires(&self, bundle: BundleId) -> Option<Vec<BundleWire>> {
        (**self).provided_wires(bundle)
    }
}

impl<T: BundleLookup + ?Sized> BundleLookup for &T {
    fn bundle_for_name(&self, symbolic_name: &str) -> Option<BundleId> {
        (**self).bundle_for_name(symbolic_name)
    }
}

impl<T: BundleLookup + ?Sized> BundleLookup for Arc<T> {
    fn bundle_for_name(&self, symbolic_name: &str) -> Option<BundleId> {
        (**self).bundle_for_name(symbolic_name)
    }
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    bundles: BTreeMap<BundleId, Bundle>,
    /// Provider -> wires it provides, in wiring order.
    provided: HashMap<BundleId, Vec<BundleWire>>,
}

/// In-memory registry of installed bundles and their wires.
///
/// # Example
///
/// ```
/// use extsort_wiring::{BundleLookup, BundleVersion, Visibility, Wiring, WiringRegistry};
///
/// let registry = WiringRegistry::new();
/// let runtime = registry.install("org.example.runtime", BundleVersion::new(3, 10, 0));
/// let ui = registry.install("org.example.ui", BundleVersion::new(1, 0, 0));
/// registry.wire(runtime, ui, Visibility::Private).unwrap();
///
/// assert_eq!(registry.bundle_for_name("org.example.ui"), Some(ui));
/// assert_eq!(registry.provided_wires(runtime).unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct WiringRegistry {
    state: RwLock<State>,
}

impl WiringRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a bundle with a wiring in use and return its identity.
    pub fn install(&self, symbolic_name: impl Into<String>, version: BundleVersion) -> BundleId {
        let mut state = self.write();
        state.next_id += 1;
        let id = BundleId::new(state.next_id);
        let bundle = Bundle {
            id,
            symbolic_name: symbolic_name.into(),
            version,
            in_use: true,
        };
        tracing::debug!(%id, bundle = %bundle, "Installed bundle");
        state.bundles.insert(id, bundle);
        id
    }

    /// Record that `requirer` is wired to `provider`.
    ///
    /// Wiring the same pair twice keeps the first wire.
    pub fn wire(&self, provider: BundleId, requirer: BundleId, visibility: Visibility) -> Result<()> {
        let mut state = self.write();
        for id in [provider, requirer] {
            if !state.bundles.contains_key(&id) {
                return Err(Error::UnknownBundle(id.to_string()));
            }
        }

        let wires = state.provided.entry(provider).or_default();
        if wires.iter().any(|wire| wire.requirer == requirer) {
            return Ok(());
        }
        wires.push(BundleWire::new(provider, requirer, visibility));
        Ok(())
    }

    /// Take a bundle's wiring out of use. Returns `false` for unknown bundles.
    ///
    /// The bundle stays installed and its wires are kept, but it no longer
    /// reports any provided wires.
    pub fn mark_stale(&self, bundle: BundleId) -> bool {
        let mut state = self.write();
        match state.bundles.get_mut(&bundle) {
            Some(entry) => {
                entry.in_use = false;
                tracing::debug!(%bundle, "Bundle wiring marked stale");
                true
            }
            None => false,
        }
    }

    /// Remove a bundle and every wire touching it.
    pub fn uninstall(&self, bundle: BundleId) -> Option<Bundle> {
        let mut state = self.write();
        let removed = state.bundles.remove(&bundle)?;
        state.provided.remove(&bundle);
        for wires in state.provided.values_mut() {
            wires.retain(|wire| wire.requirer != bundle);
        }
        tracing::debug!(%bundle, "Uninstalled bundle");
        Some(removed)
    }

    /// Look up an installed bundle.
    pub fn bundle(&self, bundle: BundleId) -> Option<Bundle> {
        self.read().bundles.get(&bundle).cloned()
    }

    /// All installed bundles in installation order.
    pub fn bundles(&self) -> Vec<Bundle> {
        self.read().bundles.values().cloned().collect()
    }

    /// All installed bundles carrying `symbolic_name`, highest version first.
    pub fn bundles_named(&self, symbolic_name: &str) -> Vec<Bundle> {
        let mut named: Vec<Bundle> = self
            .read()
            .bundles
            .values()
            .filter(|bundle| bundle.symbolic_name == symbolic_name)
            .cloned()
            .collect();
        named.sort_by(|a, b| b.version.cmp(&a.version));
        named
    }

    /// The highest version in use named `symbolic_name` that lies in `range`.
    pub fn resolve(&self, symbolic_name: &str, range: &VersionRange) -> Option<BundleId> {
        self.read()
            .bundles
            .values()
            .filter(|bundle| {
                bundle.in_use && bundle.symbolic_name == symbolic_name && range.includes(&bundle.version)
            })
            .max_by(|a, b| a.version.cmp(&b.version))
            .map(|bundle| bundle.id)
    }

    /// Every wire in the registry, grouped by provider in installation order.
    pub fn wires(&self) -> Vec<BundleWire> {
        let state = self.read();
        state
            .bundles
            .keys()
            .filter_map(|id| state.provided.get(id))
            .flatten()
            .copied()
            .collect()
    }

    /// Number of installed bundles.
    pub fn len(&self) -> usize {
        self.read().bundles.len()
    }

    /// Whether no bundle is installed.
    pub fn is_empty(&self) -> bool {
        self.read().bundles.is_empty()
    }
}

impl Wiring for WiringRegistry {
    fn is_in_use(&self, bundle: BundleId) -> bool {
        self.read()
            .bundles
            .get(&bundle)
            .is_some_and(|entry| entry.in_use)
    }

    fn provided_wires(&self, bundle: BundleId) -> Option<Vec<BundleWire>> {
        let state = self.read();
        if !state.bundles.get(&bundle)?.in_use {
            return None;
        }
        Some(state.provided.get(&bundle).cloned().unwrap_or_default())
    }
}

impl BundleLookup for WiringRegistry {
    fn bundle_for_name(&self, symbolic_name: &str) -> Option<BundleId> {
        self.resolve(symbolic_name, &VersionRange::any())
    }
}
