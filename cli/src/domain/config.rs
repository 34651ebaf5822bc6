//! Domain types for the global `deck.yaml` configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::inventory::DEFAULT_INVENTORY_PATH;

/// Default `--config` path.
pub const DEFAULT_CONFIG_PATH: &str = "./deck.yaml";
/// Default `--state` path (SQLite audit ledger).
pub const DEFAULT_STATE_PATH: &str = "./state.db";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `deck.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeckConfig {
    /// Directory holding `<service>/service.yaml`.
    pub services_dir: PathBuf,
    /// Inventory used when `--inventory` is not given.
    pub inventory: PathBuf,
    /// Reachability probe settings.
    pub probe: ProbeConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            services_dir: PathBuf::from("services"),
            inventory: PathBuf::from(DEFAULT_INVENTORY_PATH),
            probe: ProbeConfig::default(),
        }
    }
}

/// Probe configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-target timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum probes in flight.
    pub concurrency: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            concurrency: 8,
        }
    }
}

impl ProbeConfig {
    /// Timeout clamped to at least one second.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Concurrency clamped to at least one probe.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
