use std::path::PathBuf;

/// Errors that can occur while building or querying bundle wiring.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse the platform snapshot TOML.
    #[error("failed to parse platform snapshot: {0}")]
    PlatformParse(#[from] toml::de::Error),

    /// Platform snapshot file not found at the expected path.
    #[error("platform snapshot not found: {0}")]
    PlatformNotFound(PathBuf),

    /// Failed to serialize the platform snapshot.
    #[error("failed to serialize platform snapshot: {0}")]
    PlatformSerialize(String),

    /// I/O error reading the snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid bundle version string.
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Invalid version range string.
    #[error("invalid version range '{range}': {reason}")]
    InvalidVersionRange { range: String, reason: String },

    /// Invalid bundle symbolic name.
    #[error("invalid bundle name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Invalid extension declaration.
    #[error("invalid extension {index}: {reason}")]
    InvalidExtension { index: usize, reason: String },

    /// The same bundle name and version was declared twice.
    #[error("bundle '{name}' {version} is declared more than once")]
    DuplicateBundle { name: String, version: String },

    /// A mandatory requirement could not be bound to any bundle in use.
    #[error("bundle '{bundle}' requires '{requirement}' which no bundle in use satisfies")]
    UnresolvedRequirement { bundle: String, requirement: String },

    /// Bundle not known to the registry.
    #[error("unknown bundle: {0}")]
    UnknownBundle(String),
}

pub type Result<T> = std::result::Result<T, Error>;
