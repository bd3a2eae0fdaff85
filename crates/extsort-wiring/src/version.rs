//! Bundle versions and version ranges.
//!
//! Bundle versions have up to three numeric components followed by an
//! optional free-form qualifier: `1`, `1.2`, `1.2.3`, `1.2.3.v20140512`.
//! Missing numeric components default to `0`. The numeric part is held as a
//! [`semver::Version`]; the qualifier breaks ties lexically.
//!
//! Ranges use interval notation:
//!
//! - `[1.0,2.0)`: at least 1.0, below 2.0
//! - `(1.0,2.0]`: above 1.0, at most 2.0
//! - `1.0`: at least 1.0, no upper bound
//!
//! # Examples
//!
//! ```
//! use extsort_wiring::version::{BundleVersion, VersionRange};
//!
//! let range = VersionRange::parse("[3.10,4.0)").unwrap();
//! assert!(range.includes(&BundleVersion::parse("3.10.0.v20140512").unwrap()));
//! assert!(!range.includes(&BundleVersion::parse("4.0").unwrap()));
//!
//! let at_least = VersionRange::parse("1.2").unwrap();
//! assert!(at_least.includes(&BundleVersion::parse("7").unwrap()));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A bundle version: numeric release plus optional qualifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BundleVersion {
    release: semver::Version,
    qualifier: String,
}

impl BundleVersion {
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Self {
            release: semver::Version::new(major, minor, micro),
            qualifier: String::new(),
        }
    }

    /// The lowest possible version, `0.0.0`.
    pub fn empty() -> Self {
        Self::new(0, 0, 0)
    }

    /// Attach a qualifier. Unlike [`parse`](Self::parse), no character check
    /// is applied.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Parse `major[.minor[.micro[.qualifier]]]`.
    pub fn parse(version: &str) -> Result<Self> {
        let trimmed = version.trim();
        let invalid = |reason: String| Error::InvalidVersion {
            version: version.to_string(),
            reason,
        };

        if trimmed.is_empty() {
            return Err(invalid("empty version".to_string()));
        }

        let mut parts = trimmed.splitn(4, '.');
        let mut numbers = [0u64; 3];
        for (slot, name) in numbers.iter_mut().zip(["major", "minor", "micro"]) {
            match parts.next() {
                Some(part) => {
                    // `u64::from_str` would also take a leading '+'.
                    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(invalid(format!("{name} component '{part}' is not a number")));
                    }
                    *slot = part
                        .parse()
                        .map_err(|_| invalid(format!("{name} component '{part}' is not a number")))?;
                }
                None => break,
            }
        }

        let qualifier = parts.next().unwrap_or_default();
        if let Some(bad) = qualifier
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(invalid(format!("qualifier contains '{bad}'")));
        }
        if trimmed.ends_with('.') {
            return Err(invalid("trailing '.'".to_string()));
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]).with_qualifier(qualifier))
    }

    /// The numeric part of the version.
    pub fn release(&self) -> &semver::Version {
        &self.release
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }
}

impl Default for BundleVersion {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for BundleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.release)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

impl FromStr for BundleVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for BundleVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BundleVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// One end of a range.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    version: BundleVersion,
    inclusive: bool,
}

/// An interval of bundle versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    floor: Bound,
    ceiling: Option<Bound>,
    /// The original range string for display.
    raw: String,
}

impl VersionRange {
    /// The range matching every version.
    pub fn any() -> Self {
        Self {
            floor: Bound {
                version: BundleVersion::empty(),
                inclusive: true,
            },
            ceiling: None,
            raw: "0.0.0".to_string(),
        }
    }

    /// Parse `[floor,ceiling)`-style intervals or a bare floor version.
    pub fn parse(range: &str) -> Result<Self> {
        let raw = range.trim().to_string();
        let invalid = |reason: &str| Error::InvalidVersionRange {
            range: range.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("empty range"));
        }

        let opening = raw.chars().next();
        if !matches!(opening, Some('[' | '(')) {
            let floor = BundleVersion::parse(&raw).map_err(|_| invalid("invalid version"))?;
            return Ok(Self {
                floor: Bound {
                    version: floor,
                    inclusive: true,
                },
                ceiling: None,
                raw,
            });
        }

        let closing = raw.chars().last();
        if !matches!(closing, Some(']' | ')')) || raw.len() < 2 {
            return Err(invalid("interval must end with ']' or ')'"));
        }

        let body = &raw[1..raw.len() - 1];
        let Some((left, right)) = body.split_once(',') else {
            return Err(invalid("interval needs two versions separated by ','"));
        };

        let floor = BundleVersion::parse(left).map_err(|_| invalid("invalid floor version"))?;
        let ceiling = BundleVersion::parse(right).map_err(|_| invalid("invalid ceiling version"))?;
        if floor > ceiling {
            return Err(invalid("floor is above ceiling"));
        }

        Ok(Self {
            floor: Bound {
                version: floor,
                inclusive: opening == Some('['),
            },
            ceiling: Some(Bound {
                version: ceiling,
                inclusive: closing == Some(']'),
            }),
            raw,
        })
    }

    /// Whether `version` lies within this range.
    pub fn includes(&self, version: &BundleVersion) -> bool {
        let above_floor = if self.floor.inclusive {
            version >= &self.floor.version
        } else {
            version > &self.floor.version
        };

        let below_ceiling = match &self.ceiling {
            None => true,
            Some(bound) if bound.inclusive => version <= &bound.version,
            Some(bound) => version < &bound.version,
        };

        above_floor && below_ceiling
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
