//! Placeholder providers and the factory that selects them.
//!
//! Plans are real; execution entry points report `NotImplemented` until the
//! compose and restic drivers land.

use std::path::PathBuf;

use crate::application::ports::{BackupProvider, Deployer, MigrationProvider, ProviderFactory};
use crate::domain::error::ProviderError;
use crate::domain::operation::{DeployOptions, MigrateRequest, migrate_plan};
use crate::domain::service::ServiceSpec;

// ── Deployers ─────────────────────────────────────────────────────────────────

/// `docker compose` rollout against a remote engine.
#[derive(Debug, Clone)]
pub struct ComposeDeployer {
    pub compose_path: Option<PathBuf>,
    pub target: String,
    pub options: DeployOptions,
}

impl Deployer for ComposeDeployer {
    fn name(&self) -> &'static str {
        "ComposeDeployer"
    }

    fn plan(&self) -> String {
        let file = self
            .compose_path
            .as_ref()
            .map_or_else(|| "<unset compose file>".to_string(), |p| p.display().to_string());
        format!(
            "Would run: docker compose -f {file} pull && up -d on target {}",
            self.target
        )
    }

    async fn apply(&self) -> Result<(), ProviderError> {
        tracing::debug!(
            target = %self.target,
            timeout_secs = self.options.timeout_secs,
            force = self.options.force,
            "compose apply requested",
        );
        Err(ProviderError::not_implemented(self.name(), "apply"))
    }
}

/// Any method without a dedicated driver (`k8s`, `helm`, `ssh`, ...).
#[derive(Debug, Clone)]
pub struct GenericDeployer {
    pub service: String,
    pub method: String,
    pub target: String,
}

impl Deployer for GenericDeployer {
    fn name(&self) -> &'static str {
        "GenericDeployer"
    }

    fn plan(&self) -> String {
        format!(
            "Would deploy {} via {} to {}",
            self.service, self.method, self.target
        )
    }

    async fn apply(&self) -> Result<(), ProviderError> {
        Err(ProviderError::not_implemented(self.name(), "apply"))
    }
}

/// Deployer chosen from `deployment.method`.
#[derive(Debug, Clone)]
pub enum ServiceDeployer {
    Compose(ComposeDeployer),
    Generic(GenericDeployer),
}

impl Deployer for ServiceDeployer {
    fn name(&self) -> &'static str {
        match self {
            Self::Compose(d) => d.name(),
            Self::Generic(d) => d.name(),
        }
    }

    fn plan(&self) -> String {
        match self {
            Self::Compose(d) => d.plan(),
            Self::Generic(d) => d.plan(),
        }
    }

    async fn apply(&self) -> Result<(), ProviderError> {
        match self {
            Self::Compose(d) => d.apply().await,
            Self::Generic(d) => d.apply().await,
        }
    }
}

// ── Backup ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ResticBackup {
    pub service: String,
    pub repository: Option<String>,
}

impl BackupProvider for ResticBackup {
    fn name(&self) -> &'static str {
        "ResticBackup"
    }

    fn plan(&self) -> String {
        format!(
            "Would restic backup to {}",
            self.repository.as_deref().unwrap_or("<unset repo>")
        )
    }

    async fn run_now(&self) -> Result<(), ProviderError> {
        Err(ProviderError::not_implemented(self.name(), "run_now"))
    }

    async fn list(&self) -> Result<(), ProviderError> {
        Err(ProviderError::not_implemented(self.name(), "list"))
    }

    async fn verify(&self) -> Result<(), ProviderError> {
        Err(ProviderError::not_implemented(self.name(), "verify"))
    }

    async fn prune(&self) -> Result<(), ProviderError> {
        Err(ProviderError::not_implemented(self.name(), "prune"))
    }
}

// ── Migration ─────────────────────────────────────────────────────────────────

/// Stands in until a real data mover exists; only the plan is meaningful.
#[derive(Debug, Clone)]
pub struct PlaceholderMigrator {
    /// Plan text, fixed when the migrator is built from the spec.
    pub plan: String,
}

impl MigrationProvider for PlaceholderMigrator {
    fn name(&self) -> &'static str {
        "PlaceholderMigrator"
    }

    fn plan(&self) -> String {
        self.plan.clone()
    }

    async fn migrate(&self) -> Result<(), ProviderError> {
        Err(ProviderError::not_implemented(self.name(), "migrate"))
    }
}

// ── Factory ───────────────────────────────────────────────────────────────────

/// Production provider selection.
pub struct DefaultProviders {
    services_dir: PathBuf,
}

impl DefaultProviders {
    #[must_use]
    pub fn new(services_dir: PathBuf) -> Self {
        Self { services_dir }
    }
}

impl ProviderFactory for DefaultProviders {
    type Deployer = ServiceDeployer;
    type Backup = ResticBackup;
    type Migrator = PlaceholderMigrator;

    fn deployer(&self, spec: &ServiceSpec, target: &str, options: DeployOptions) -> ServiceDeployer {
        if spec.method() == "compose" {
            ServiceDeployer::Compose(ComposeDeployer {
                compose_path: spec.compose_path(&self.services_dir),
                target: target.to_string(),
                options,
            })
        } else {
            ServiceDeployer::Generic(GenericDeployer {
                service: spec.name().to_string(),
                method: spec.method().to_string(),
                target: target.to_string(),
            })
        }
    }

    fn backup(&self, spec: &ServiceSpec) -> ResticBackup {
        ResticBackup {
            service: spec.name().to_string(),
            repository: spec.spec.storage.backup.repository.clone(),
        }
    }

    fn migrator(&self, spec: &ServiceSpec, request: &MigrateRequest) -> PlaceholderMigrator {
        PlaceholderMigrator {
            plan: migrate_plan(spec, request),
        }
    }
}
