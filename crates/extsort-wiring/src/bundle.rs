//! Bundle identities and the wires between them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::BundleVersion;

/// Registry-assigned identity of an installed bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleId(u64);

impl BundleId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An installed bundle as seen by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bundle {
    pub id: BundleId,
    pub symbolic_name: String,
    pub version: BundleVersion,
    /// `false` once the bundle's wiring has been replaced or removed.
    pub in_use: bool,
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.symbolic_name, self.version)
    }
}

/// Visibility directive of a bundle requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// The requirer sees the provider but does not pass it on.
    #[default]
    Private,
    /// The requirer exposes the provider to its own requirers.
    Reexport,
}

/// A resolved requirement: `requirer` is wired to `provider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BundleWire {
    pub provider: BundleId,
    pub requirer: BundleId,
    pub visibility: Visibility,
}

impl BundleWire {
    pub fn new(provider: BundleId, requirer: BundleId, visibility: Visibility) -> Self {
        Self {
            provider,
            requirer,
            visibility,
        }
    }

    /// Whether the requirer re-exports the provider.
    pub fn reexports(&self) -> bool {
        self.visibility == Visibility::Reexport
    }
}
