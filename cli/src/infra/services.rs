//! Infrastructure implementation of the `ServiceCatalog` port.
//!
//! Specs live at `<services_dir>/<name>/service.yaml`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ServiceCatalog;
use crate::domain::error::ServiceError;
use crate::domain::service::{SERVICE_FILE, ServiceSpec};

/// Reads service specs from a directory tree.
pub struct YamlServiceCatalog {
    root: PathBuf,
}

impl YamlServiceCatalog {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl ServiceCatalog for YamlServiceCatalog {
    fn load(&self, name: &str) -> Result<ServiceSpec> {
        let path = self.root.join(name).join(SERVICE_FILE);
        if !path.is_file() {
            return Err(ServiceError::NotFound(name.to_string()).into());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let mut spec: ServiceSpec = serde_yaml::from_str(&text)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        spec.fill_name(name);
        spec.validate_basic()
            .with_context(|| format!("invalid service spec {}", path.display()))?;
        Ok(spec)
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("cannot read {}", self.root.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("cannot read {}", self.root.display()))?;
            if entry.path().join(SERVICE_FILE).is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
