//! Inventory document parsing.
//!
//! Pure: the caller reads the file, this module turns text into targets.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;

use crate::domain::target::Target;

/// Default location of the inventory, relative to the working directory.
pub const DEFAULT_INVENTORY_PATH: &str = "targets/inventory.yaml";

#[derive(Debug, Default, Deserialize)]
struct InventoryDocument {
    #[serde(default)]
    targets: Vec<InventoryEntry>,
}

#[derive(Debug, Deserialize)]
struct InventoryEntry {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    connection: BTreeMap<String, serde_yaml::Value>,
}

/// Parse an inventory document, preserving entry order.
///
/// An empty document (or one without `targets`) yields no targets. Names and
/// kinds are taken verbatim; no uniqueness or kind validation happens here.
///
/// # Errors
///
/// Returns an error if the text is not valid YAML or has the wrong shape.
pub fn parse_inventory(text: &str) -> Result<Vec<Target>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: Option<InventoryDocument> = serde_yaml::from_str(text)?;
    let doc = doc.unwrap_or_default();

    Ok(doc
        .targets
        .into_iter()
        .map(|entry| {
            let connection = entry
                .connection
                .into_iter()
                .filter_map(|(k, v)| scalar_to_string(&v).map(|s| (k, s)))
                .collect();
            Target::new(entry.name, entry.kind, &connection)
        })
        .collect())
}

/// Inventory values may be typed (`tls: true`, `port: 22`); keep their text.
fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
