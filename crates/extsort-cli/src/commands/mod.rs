//! Command implementations for extsort-cli

pub mod check;
pub mod order;
pub mod requirers;

use std::path::Path;

use extsort_wiring::{Installed, Platform};

use crate::error::Result;

pub use check::run_check;
pub use order::run_order;
pub use requirers::run_requirers;

/// Load, validate, and install the snapshot at `path`.
fn install(path: &Path) -> Result<Installed> {
    let platform = Platform::from_path(path)?;
    tracing::debug!(path = %path.display(), "Loaded platform snapshot");
    Ok(platform.install()?)
}
