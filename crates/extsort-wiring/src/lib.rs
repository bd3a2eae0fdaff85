//! Bundle wiring and extension ordering.
//!
//! This crate models a live registry of bundles and the wires between them,
//! walks the requirement graph (following re-exports), and uses that walk to
//! order extensions by the dependencies of the bundles contributing them.

pub mod bundle;
pub mod error;
pub mod extension;
pub mod extensions_sort;
pub mod platform;
pub mod requirers;
pub mod version;
pub mod wiring;

/// Default filename for platform snapshots.
pub const PLATFORM_FILENAME: &str = "platform.toml";

pub use bundle::{Bundle, BundleId, BundleWire, Visibility};
pub use error::{Error, Result};
pub use extension::{Extension, ExtensionRegistry};
pub use extensions_sort::ExtensionsSort;
pub use platform::{BundleSpec, Installed, Platform, RequireSpec};
pub use requirers::requirers_of;
pub use version::{BundleVersion, VersionRange};
pub use wiring::{BundleLookup, Wiring, WiringRegistry};
