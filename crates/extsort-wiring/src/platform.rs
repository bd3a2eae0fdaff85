//! Platform snapshot parsing for `platform.toml` files.
//!
//! A snapshot lists the installed bundles, the requirements between them, and
//! the extensions they contribute. Installing a snapshot binds every
//! requirement to the highest bundle in use that satisfies it and yields a
//! live [`WiringRegistry`] plus an [`ExtensionRegistry`].
//!
//! # Example TOML
//!
//! ```toml
//! [[bundles]]
//! name = "org.example.runtime"
//! version = "3.10.0.v20140512"
//!
//! [[bundles]]
//! name = "org.example.workbench"
//! version = "1.2.0"
//!
//! [[bundles.requires]]
//! bundle = "org.example.runtime"
//! version = "[3.0,4.0)"
//! reexport = true
//!
//! [[bundles]]
//! name = "org.example.legacy"
//! version = "0.9"
//! in_use = false
//!
//! [[extensions]]
//! point = "org.example.workbench.model"
//! contributor = "org.example.workbench"
//! id = "org.example.workbench.fragment"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bundle::Visibility;
use crate::error::{Error, Result};
use crate::extension::{Extension, ExtensionRegistry};
use crate::version::{BundleVersion, VersionRange};
use crate::wiring::WiringRegistry;

/// Complete platform snapshot loaded from `platform.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Platform {
    /// Installed bundles, in installation order.
    #[serde(default)]
    pub bundles: Vec<BundleSpec>,
    /// Contributed extensions, in registration order.
    #[serde(default)]
    pub extensions: Vec<Extension>,
}

/// One installed bundle.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BundleSpec {
    /// Bundle symbolic name.
    pub name: String,
    /// Bundle version; defaults to `0.0.0`.
    #[serde(default = "default_version")]
    pub version: String,
    /// `false` to install the bundle with a stale wiring.
    #[serde(default = "default_in_use")]
    pub in_use: bool,
    /// Bundles this one requires.
    #[serde(default)]
    pub requires: Vec<RequireSpec>,
}

/// A requirement on another bundle.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RequireSpec {
    /// Symbolic name of the required bundle.
    pub bundle: String,
    /// Acceptable version range; any version when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Whether the requirer re-exports the required bundle.
    #[serde(default)]
    pub reexport: bool,
    /// Whether a missing provider is tolerated.
    #[serde(default)]
    pub optional: bool,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

fn default_in_use() -> bool {
    true
}

impl RequireSpec {
    fn range(&self) -> Result<VersionRange> {
        match &self.version {
            Some(range) => VersionRange::parse(range),
            None => Ok(VersionRange::any()),
        }
    }

    fn visibility(&self) -> Visibility {
        if self.reexport {
            Visibility::Reexport
        } else {
            Visibility::Private
        }
    }
}

/// The registries produced by installing a [`Platform`].
#[derive(Debug, Default)]
pub struct Installed {
    pub wiring: WiringRegistry,
    pub extensions: ExtensionRegistry,
}

impl Platform {
    /// Parse a snapshot from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let platform: Self = toml::from_str(content)?;
        platform.validate()?;
        Ok(platform)
    }

    /// Load a snapshot from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::PlatformNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize the snapshot to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::PlatformSerialize(e.to_string()))
    }

    /// Validate names, versions, ranges, and bundle uniqueness.
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for bundle in &self.bundles {
            validate_name(&bundle.name)?;
            let version = BundleVersion::parse(&bundle.version)?;
            if !seen.insert((bundle.name.as_str(), version.clone())) {
                return Err(Error::DuplicateBundle {
                    name: bundle.name.clone(),
                    version: version.to_string(),
                });
            }

            for requirement in &bundle.requires {
                validate_name(&requirement.bundle)?;
                requirement.range()?;
            }
        }

        for (index, extension) in self.extensions.iter().enumerate() {
            if extension.point.trim().is_empty() {
                return Err(Error::InvalidExtension {
                    index,
                    reason: "extension point must not be empty".to_string(),
                });
            }
            if extension.contributor.trim().is_empty() {
                return Err(Error::InvalidExtension {
                    index,
                    reason: "contributor must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Install the snapshot into fresh registries.
    ///
    /// Bundles are installed first so requirements can bind regardless of
    /// declaration order.
    pub fn install(&self) -> Result<Installed> {
        let mut installed = Installed::default();

        let mut ids = Vec::with_capacity(self.bundles.len());
        for bundle in &self.bundles {
            let id = installed
                .wiring
                .install(&bundle.name, BundleVersion::parse(&bundle.version)?);
            if !bundle.in_use {
                installed.wiring.mark_stale(id);
            }
            ids.push(id);
        }

        for (bundle, &requirer) in self.bundles.iter().zip(&ids) {
            for requirement in &bundle.requires {
                let range = requirement.range()?;
                match installed.wiring.resolve(&requirement.bundle, &range) {
                    Some(provider) => {
                        installed
                            .wiring
                            .wire(provider, requirer, requirement.visibility())?;
                    }
                    None if requirement.optional => {
                        tracing::warn!(
                            bundle = %bundle.name,
                            requirement = %requirement.bundle,
                            range = %range,
                            "Optional requirement not satisfied, skipping"
                        );
                    }
                    None => {
                        return Err(Error::UnresolvedRequirement {
                            bundle: bundle.name.clone(),
                            requirement: format!("{} {}", requirement.bundle, range),
                        });
                    }
                }
            }
        }

        for extension in &self.extensions {
            installed.extensions.register(extension.clone());
        }

        tracing::debug!(
            bundles = self.bundles.len(),
            extensions = self.extensions.len(),
            "Installed platform snapshot"
        );

        Ok(installed)
    }
}

/// Symbolic names are dot-separated tokens of `[A-Za-z0-9_-]`.
fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.split('.').any(str::is_empty) {
        return Err(invalid("name must not contain empty segments"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(invalid("name may only contain letters, digits, '.', '_' and '-'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiring::{BundleLookup, Wiring};

    const SNAPSHOT: &str = r#"
[[bundles]]
name = "org.example.runtime"
version = "3.10.0.v20140512"

[[bundles]]
name = "org.example.workbench"
version = "1.2"

[[bundles.requires]]
bundle = "org.example.runtime"
version = "[3.0,4.0)"
reexport = true

[[bundles]]
name = "org.example.ide"

[[bundles.requires]]
bundle = "org.example.workbench"

[[extensions]]
point = "org.example.model"
contributor = "org.example.ide"
id = "ide.fragment"

[[extensions]]
point = "org.example.model"
contributor = "org.example.workbench"
"#;

    #[test]
    fn test_parse_snapshot() {
        let platform = Platform::from_toml(SNAPSHOT).unwrap();
        assert_eq!(platform.bundles.len(), 3);
        assert_eq!(platform.bundles[2].version, "0.0.0");
        assert!(platform.bundles[0].in_use);
        assert!(platform.bundles[1].requires[0].reexport);
        assert_eq!(platform.extensions[0].unique_id.as_deref(), Some("ide.fragment"));
    }

    #[test]
    fn test_install_wires_requirements() {
        let installed = Platform::from_toml(SNAPSHOT).unwrap().install().unwrap();
        let runtime = installed.wiring.bundle_for_name("org.example.runtime").unwrap();
        let workbench = installed.wiring.bundle_for_name("org.example.workbench").unwrap();

        let wires = installed.wiring.provided_wires(runtime).unwrap();
        assert_eq!(wires.len(), 1);
        assert_eq!(wires[0].requirer, workbench);
        assert!(wires[0].reexports());
        assert_eq!(installed.extensions.len(), 2);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
[[bundles]]
name = "a"
colour = "blue"
"#;
        let err = Platform::from_toml(toml).unwrap_err();
        assert!(matches!(err, Error::PlatformParse(_)));
    }

    #[test]
    fn test_invalid_name_rejected() {
        for name in ["", "a..b", "has space", ".leading"] {
            let toml = format!("[[bundles]]\nname = \"{name}\"\n");
            let err = Platform::from_toml(&toml).unwrap_err();
            assert!(matches!(err, Error::InvalidName { .. }), "{name:?}: {err}");
        }
    }

    #[test]
    fn test_invalid_version_rejected() {
        let toml = "[[bundles]]\nname = \"a\"\nversion = \"1.x\"\n";
        let err = Platform::from_toml(toml).unwrap_err();
        assert!(matches!(err, Error::InvalidVersion { .. }));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let toml = r#"
[[bundles]]
name = "a"

[[bundles.requires]]
bundle = "b"
version = "[2.0,1.0)"
"#;
        let err = Platform::from_toml(toml).unwrap_err();
        assert!(matches!(err, Error::InvalidVersionRange { .. }));
    }

    #[test]
    fn test_duplicate_bundle_rejected() {
        let toml = r#"
[[bundles]]
name = "a"
version = "1.0"

[[bundles]]
name = "a"
version = "1.0.0"
"#;
        let err = Platform::from_toml(toml).unwrap_err();
        assert!(matches!(err, Error::DuplicateBundle { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_empty_extension_point_rejected() {
        let toml = r#"
[[extensions]]
point = " "
contributor = "a"
"#;
        let err = Platform::from_toml(toml).unwrap_err();
        assert!(matches!(err, Error::InvalidExtension { index: 0, .. }));
    }

    #[test]
    fn test_unresolved_requirement_fails_install() {
        let toml = r#"
[[bundles]]
name = "a"

[[bundles.requires]]
bundle = "missing"
"#;
        let err = Platform::from_toml(toml).unwrap().install().unwrap_err();
        assert!(matches!(err, Error::UnresolvedRequirement { ref bundle, .. } if bundle == "a"));
    }

    #[test]
    fn test_optional_requirement_skipped() {
        let toml = r#"
[[bundles]]
name = "a"

[[bundles.requires]]
bundle = "missing"
optional = true
"#;
        let installed = Platform::from_toml(toml).unwrap().install().unwrap();
        assert!(installed.wiring.wires().is_empty());
    }

    #[test]
    fn test_requirement_skips_stale_provider() {
        let toml = r#"
[[bundles]]
name = "core"
version = "2.0"
in_use = false

[[bundles]]
name = "core"
version = "1.0"

[[bundles]]
name = "ui"

[[bundles.requires]]
bundle = "core"
"#;
        let installed = Platform::from_toml(toml).unwrap().install().unwrap();
        let core = installed.wiring.bundle_for_name("core").unwrap();
        assert_eq!(installed.wiring.bundle(core).unwrap().version.to_string(), "1.0.0");
        assert_eq!(installed.wiring.provided_wires(core).unwrap().len(), 1);
    }

    #[test]
    fn test_from_path_missing() {
        let err = Platform::from_path(Path::new("/nonexistent/platform.toml")).unwrap_err();
        assert!(matches!(err, Error::PlatformNotFound(_)));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(crate::PLATFORM_FILENAME);
        std::fs::write(&path, SNAPSHOT).unwrap();

        let platform = Platform::from_path(&path).unwrap();
        assert_eq!(platform.extensions.len(), 2);
    }

    #[test]
    fn test_to_toml_reparses() {
        let platform = Platform::from_toml(SNAPSHOT).unwrap();
        let reparsed = Platform::from_toml(&platform.to_toml().unwrap()).unwrap();
        assert_eq!(reparsed.bundles.len(), platform.bundles.len());
        assert_eq!(reparsed.extensions, platform.extensions);
    }
}
