//! Reads the target inventory from disk.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::inventory::{DEFAULT_INVENTORY_PATH, parse_inventory};
use crate::domain::target::Target;

/// Load targets from `path` (default `targets/inventory.yaml`).
///
/// A missing file is an empty inventory.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_inventory(path: Option<&Path>) -> Result<Vec<Target>> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_INVENTORY_PATH));
    if !path.exists() {
        tracing::debug!(path = %path.display(), "inventory not found, using empty inventory");
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read inventory {}", path.display()))?;
    parse_inventory(&text).with_context(|| format!("cannot parse inventory {}", path.display()))
}
