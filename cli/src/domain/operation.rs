//! Mutating command requests, target resolution, plan text and ledger payloads.
//!
//! Pure functions only. Everything recorded in the audit ledger is derived
//! here so the payload shape is pinned by unit tests.

use serde_json::{Value, json};

use crate::domain::service::ServiceSpec;

/// The five commands that go through plan/apply and the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Deploy,
    Backup,
    Migrate,
    Start,
    Stop,
}

impl OperationKind {
    /// Command name stored in the ledger.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Backup => "backup",
            Self::Migrate => "migrate",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

/// Knobs handed to a deployer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOptions {
    /// Wait timeout for the rollout.
    pub timeout_secs: u64,
    /// Redeploy even if nothing changed.
    pub force: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 600,
            force: false,
        }
    }
}

/// `deck deploy` flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Overrides `deployment.target` when set.
    pub target: Option<String>,
    pub options: DeployOptions,
}

/// `deck backup` flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)] // one field per CLI switch
pub struct BackupRequest {
    pub now: bool,
    pub verify: bool,
    pub list: bool,
    pub prune: bool,
}

/// A single backup provider entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOperation {
    RunNow,
    Verify,
    List,
    Prune,
}

impl BackupRequest {
    /// Provider calls made in apply mode, in execution order.
    ///
    /// A bare `deck backup` means "back up now".
    #[must_use]
    pub fn operations(&self) -> Vec<BackupOperation> {
        let ops: Vec<_> = [
            (self.now, BackupOperation::RunNow),
            (self.verify, BackupOperation::Verify),
            (self.list, BackupOperation::List),
            (self.prune, BackupOperation::Prune),
        ]
        .into_iter()
        .filter_map(|(on, op)| on.then_some(op))
        .collect();

        if ops.is_empty() {
            vec![BackupOperation::RunNow]
        } else {
            ops
        }
    }
}

/// `deck migrate` flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateRequest {
    pub to: String,
    /// `auto`, `rsync`, `restic` or `snapshot`.
    pub via: String,
    pub downtime_seconds: u64,
}

// ── Target resolution ─────────────────────────────────────────────────────────

/// Explicit override, else the service's configured default.
#[must_use]
pub fn resolve_target(spec: &ServiceSpec, override_target: Option<&str>) -> String {
    override_target
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| spec.default_target())
        .to_string()
}

// ── Plan text ─────────────────────────────────────────────────────────────────

/// Header printed before the backup provider's own plan.
#[must_use]
pub fn backup_header(spec: &ServiceSpec, req: BackupRequest) -> String {
    format!(
        "backup {} (now={} verify={} list={} prune={}) via {}",
        spec.name(),
        req.now,
        req.verify,
        req.list,
        req.prune,
        spec.spec.storage.backup.driver,
    )
}

#[must_use]
pub fn migrate_plan(spec: &ServiceSpec, req: &MigrateRequest) -> String {
    format!(
        "would migrate {} from {} to {} via {} (downtime\u{2248}{}s)",
        spec.name(),
        spec.default_target(),
        req.to,
        req.via,
        req.downtime_seconds,
    )
}

/// Plan for `start`/`stop`.
#[must_use]
pub fn lifecycle_plan(kind: OperationKind, spec: &ServiceSpec) -> String {
    format!("would {} {} via {}", kind.as_str(), spec.name(), spec.method())
}

// ── Ledger payloads ───────────────────────────────────────────────────────────

#[must_use]
pub fn deploy_payload(target: &str) -> Value {
    json!({ "target": target })
}

#[must_use]
pub fn backup_payload(req: BackupRequest) -> Value {
    json!({
        "now": req.now,
        "verify": req.verify,
        "list": req.list,
        "prune": req.prune,
    })
}

#[must_use]
pub fn migrate_payload(req: &MigrateRequest) -> Value {
    json!({
        "to": req.to,
        "via": req.via,
        "downtimeSeconds": req.downtime_seconds,
    })
}

#[must_use]
pub fn empty_payload() -> Value {
    json!({})
}

// ── Unit tests ────────────────────────────────────────────────────────────────
