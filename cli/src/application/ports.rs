//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `deck_common`, never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use deck_common::{ExecutionMode, OperationRecord};

use crate::domain::config::DeckConfig;
use crate::domain::error::{CommandError, ProviderError};
use crate::domain::operation::{DeployOptions, MigrateRequest};
use crate::domain::probe::DockerEndpoint;
use crate::domain::service::ServiceSpec;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NotFound`] when the executable is missing and
    /// [`CommandError::TimedOut`] when it outlives `timeout`. On timeout the
    /// child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output, CommandError>;
}

// ── Network Probe Port ────────────────────────────────────────────────────────

/// Abstracts socket-level checks so the prober can be tested without real
/// network access.
#[allow(async_fn_in_trait)]
pub trait NetworkProbe {
    /// Open (and immediately close) a TCP connection to `host:port`.
    async fn tcp_connect(&self, host: &str, port: u16, timeout: Duration) -> Result<()>;
    /// Send a Docker Engine `/_ping` and return at most the first 128 bytes
    /// of the response. Performs a TLS handshake first when the endpoint
    /// asks for it.
    async fn docker_ping(&self, endpoint: &DockerEndpoint, timeout: Duration) -> Result<Vec<u8>>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config, Catalog and Ledger Ports ──────────────────────────────────────────

/// Abstracts loading the global configuration.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when no file exists.
    fn load(&self) -> Result<DeckConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> &Path;
}

/// Abstracts access to service specs.
pub trait ServiceCatalog {
    /// Load and validate a service spec by name.
    fn load(&self, name: &str) -> Result<ServiceSpec>;
    /// Names of all services that have a spec file, sorted.
    fn list(&self) -> Result<Vec<String>>;
}

/// Append-only audit ledger.
///
/// There is intentionally no update or delete operation.
pub trait EventLedger {
    /// Append one event and commit it before returning. Returns the row id.
    fn record(
        &self,
        service: Option<&str>,
        command: &str,
        mode: ExecutionMode,
        payload: &serde_json::Value,
    ) -> Result<i64>;

    /// Most recent events first, optionally filtered by service.
    fn history(&self, service: Option<&str>, limit: usize) -> Result<Vec<OperationRecord>>;
}

// ── Provider Ports ────────────────────────────────────────────────────────────

/// Deploys (and starts/stops) a service on a target.
#[allow(async_fn_in_trait)]
pub trait Deployer {
    /// Provider name used in error reports.
    fn name(&self) -> &'static str;
    /// Side-effect-free description of what `apply` would do.
    fn plan(&self) -> String;
    /// Roll out the service.
    async fn apply(&self) -> Result<(), ProviderError>;

    /// Resume a stopped service.
    async fn start(&self) -> Result<(), ProviderError> {
        Err(ProviderError::not_implemented(self.name(), "start"))
    }

    /// Quiesce a running service.
    async fn stop(&self) -> Result<(), ProviderError> {
        Err(ProviderError::not_implemented(self.name(), "stop"))
    }
}

/// Backs up service data.
#[allow(async_fn_in_trait)]
pub trait BackupProvider {
    fn name(&self) -> &'static str;
    fn plan(&self) -> String;
    async fn run_now(&self) -> Result<(), ProviderError>;
    async fn list(&self) -> Result<(), ProviderError>;
    async fn verify(&self) -> Result<(), ProviderError>;
    async fn prune(&self) -> Result<(), ProviderError>;
}

/// Moves a service's data and workload to another target.
#[allow(async_fn_in_trait)]
pub trait MigrationProvider {
    fn name(&self) -> &'static str;
    fn plan(&self) -> String;
    async fn migrate(&self) -> Result<(), ProviderError>;
}

/// Builds providers for a service. Lets the orchestrator be driven by spies.
pub trait ProviderFactory {
    type Deployer: Deployer;
    type Backup: BackupProvider;
    type Migrator: MigrationProvider;

    fn deployer(&self, spec: &ServiceSpec, target: &str, options: DeployOptions) -> Self::Deployer;
    fn backup(&self, spec: &ServiceSpec) -> Self::Backup;
    fn migrator(&self, spec: &ServiceSpec, request: &MigrateRequest) -> Self::Migrator;
}
