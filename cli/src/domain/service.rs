//! Service spec schema (`services/<name>/service.yaml`) and validation.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::ServiceError;

/// File name looked up inside each service directory.
pub const SERVICE_FILE: &str = "service.yaml";

// ── Schema ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: Spec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spec {
    pub deployment: Deployment,
    #[serde(default)]
    pub storage: Storage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    /// `compose`, `k8s`, `helm` or `ssh`.
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub source: DeploymentSource,
    pub target: String,
    #[serde(default)]
    pub strategy: Option<serde_yaml::Mapping>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentSource {
    pub path: Option<String>,
    pub values: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Storage {
    #[serde(default)]
    pub volumes: Vec<Volume>,
    #[serde(default)]
    pub backup: BackupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    pub mount_path: String,
    /// `hostPath`, `dockerVolume` or `pvc`.
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfig {
    #[serde(default = "default_backup_driver")]
    pub driver: String,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub credentials_ref: Option<String>,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            driver: default_backup_driver(),
            schedule: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            repository: None,
            credentials_ref: None,
        }
    }
}

fn default_backup_driver() -> String {
    "restic".to_string()
}

// ── Behaviour ─────────────────────────────────────────────────────────────────

impl ServiceSpec {
    /// Service name as used in plans and the ledger.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Deployment method, e.g. `compose`.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.spec.deployment.method
    }

    /// Configured default target.
    #[must_use]
    pub fn default_target(&self) -> &str {
        &self.spec.deployment.target
    }

    /// Fill an empty `metadata.name` with the directory name it was loaded from.
    pub fn fill_name(&mut self, dir_name: &str) {
        if self.metadata.name.is_empty() {
            self.metadata.name = dir_name.to_string();
        }
    }

    /// Required-field checks that run before any plan is built.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] naming the first missing field.
    pub fn validate_basic(&self) -> Result<(), ServiceError> {
        if self.metadata.name.trim().is_empty() {
            return Err(ServiceError::MissingName);
        }
        if self.spec.deployment.method.trim().is_empty() {
            return Err(ServiceError::MissingMethod);
        }
        Ok(())
    }

    /// `services_dir/<name>`.
    #[must_use]
    pub fn root_dir(&self, services_dir: &Path) -> PathBuf {
        services_dir.join(&self.metadata.name)
    }

    /// Compose file path, if the deployment source names one.
    #[must_use]
    pub fn compose_path(&self, services_dir: &Path) -> Option<PathBuf> {
        self.spec
            .deployment
            .source
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| self.root_dir(services_dir).join(p))
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
