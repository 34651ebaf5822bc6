//! Application service: plan/apply orchestration of mutating commands.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//!
//! Every call resolves the target, builds the plan, reports it, appends one
//! ledger event and only then, in apply mode, drives the provider.

use deck_common::{ExecutionMode, OperationOutput, OutcomeKind};
use serde_json::Value;

use crate::application::ports::{
    BackupProvider, Deployer, EventLedger, MigrationProvider, ProgressReporter, ProviderFactory,
};
use crate::domain::error::ProviderError;
use crate::domain::operation::{
    BackupOperation, BackupRequest, DeployOptions, DeployRequest, MigrateRequest, OperationKind,
    backup_header, backup_payload, deploy_payload, empty_payload, lifecycle_plan, migrate_payload,
    resolve_target,
};
use crate::domain::service::ServiceSpec;

/// What happened to one mutating command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub command: OperationKind,
    pub mode: ExecutionMode,
    pub service: String,
    pub plan: String,
    /// Row id of the ledger event, `None` when recording failed.
    pub ledger_id: Option<i64>,
    pub outcome: OutcomeKind,
    pub detail: Option<String>,
}

impl OperationReport {
    /// Wire form used by `--json`.
    #[must_use]
    pub fn to_output(&self) -> OperationOutput {
        OperationOutput {
            command: self.command.as_str().to_string(),
            mode: self.mode,
            service: self.service.clone(),
            plan: self.plan.clone(),
            ledger_id: self.ledger_id,
            outcome: self.outcome,
            detail: self.detail.clone(),
        }
    }
}

/// Drives providers for one process-wide execution mode.
pub struct Orchestrator<'a, F, L, R> {
    factory: &'a F,
    ledger: Option<&'a L>,
    reporter: &'a R,
    mode: ExecutionMode,
}

impl<'a, F, L, R> Orchestrator<'a, F, L, R>
where
    F: ProviderFactory,
    L: EventLedger,
    R: ProgressReporter,
{
    /// `ledger = None` runs with auditing disabled; each call then warns.
    pub fn new(factory: &'a F, ledger: Option<&'a L>, reporter: &'a R, mode: ExecutionMode) -> Self {
        Self {
            factory,
            ledger,
            reporter,
            mode,
        }
    }

    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub async fn deploy(&self, spec: &ServiceSpec, request: &DeployRequest) -> OperationReport {
        let target = resolve_target(spec, request.target.as_deref());
        let deployer = self.factory.deployer(spec, &target, request.options);
        let plan = deployer.plan();
        let ledger_id = self.announce(OperationKind::Deploy, spec, &plan, &deploy_payload(&target));

        let result = if self.mode.is_apply() {
            Some(deployer.apply().await)
        } else {
            None
        };
        self.finish(OperationKind::Deploy, spec, plan, ledger_id, result)
    }

    pub async fn backup(&self, spec: &ServiceSpec, request: BackupRequest) -> OperationReport {
        let provider = self.factory.backup(spec);
        let plan = format!("{}\n{}", backup_header(spec, request), provider.plan());
        let ledger_id = self.announce(OperationKind::Backup, spec, &plan, &backup_payload(request));

        let result = if self.mode.is_apply() {
            Some(run_backup(&provider, &request.operations()).await)
        } else {
            None
        };
        self.finish(OperationKind::Backup, spec, plan, ledger_id, result)
    }

    pub async fn migrate(&self, spec: &ServiceSpec, request: &MigrateRequest) -> OperationReport {
        let migrator = self.factory.migrator(spec, request);
        let plan = migrator.plan();
        let ledger_id = self.announce(OperationKind::Migrate, spec, &plan, &migrate_payload(request));

        let result = if self.mode.is_apply() {
            tracing::debug!(provider = migrator.name(), to = %request.to, "migrating");
            Some(migrator.migrate().await)
        } else {
            None
        };
        self.finish(OperationKind::Migrate, spec, plan, ledger_id, result)
    }

    pub async fn start(&self, spec: &ServiceSpec) -> OperationReport {
        self.lifecycle(OperationKind::Start, spec).await
    }

    pub async fn stop(&self, spec: &ServiceSpec) -> OperationReport {
        self.lifecycle(OperationKind::Stop, spec).await
    }

    async fn lifecycle(&self, kind: OperationKind, spec: &ServiceSpec) -> OperationReport {
        let target = resolve_target(spec, None);
        let deployer = self.factory.deployer(spec, &target, DeployOptions::default());
        let plan = lifecycle_plan(kind, spec);
        let ledger_id = self.announce(kind, spec, &plan, &empty_payload());

        let result = if self.mode.is_apply() {
            Some(match kind {
                OperationKind::Stop => deployer.stop().await,
                _ => deployer.start().await,
            })
        } else {
            None
        };
        self.finish(kind, spec, plan, ledger_id, result)
    }

    // ── Shared steps ──────────────────────────────────────────────────────────

    /// Report the plan and append the ledger event.
    fn announce(
        &self,
        kind: OperationKind,
        spec: &ServiceSpec,
        plan: &str,
        payload: &Value,
    ) -> Option<i64> {
        self.reporter.step(&format!("[{}] {plan}", self.mode));

        let Some(ledger) = self.ledger else {
            self.reporter
                .warn(&format!("audit ledger unavailable; {} not recorded", kind.as_str()));
            return None;
        };

        match ledger.record(Some(spec.name()), kind.as_str(), self.mode, payload) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(command = kind.as_str(), error = %format!("{e:#}"), "ledger write failed");
                self.reporter
                    .warn(&format!("failed to record {} in audit ledger: {e:#}", kind.as_str()));
                None
            }
        }
    }

    fn finish(
        &self,
        kind: OperationKind,
        spec: &ServiceSpec,
        plan: String,
        ledger_id: Option<i64>,
        result: Option<Result<(), ProviderError>>,
    ) -> OperationReport {
        let (outcome, detail) = match result {
            None => (OutcomeKind::Planned, None),
            Some(Ok(())) => (OutcomeKind::Succeeded, None),
            Some(Err(e)) if e.is_not_implemented() => {
                (OutcomeKind::NotImplemented, Some(e.to_string()))
            }
            Some(Err(e)) => (OutcomeKind::Failed, Some(e.to_string())),
        };

        tracing::info!(
            command = kind.as_str(),
            service = spec.name(),
            mode = %self.mode,
            outcome = ?outcome,
            "operation finished",
        );

        OperationReport {
            command: kind,
            mode: self.mode,
            service: spec.name().to_string(),
            plan,
            ledger_id,
            outcome,
            detail,
        }
    }
}

/// Run the selected backup operations in order, stopping at the first error.
async fn run_backup(
    provider: &impl BackupProvider,
    operations: &[BackupOperation],
) -> Result<(), ProviderError> {
    for op in operations {
        match op {
            BackupOperation::RunNow => provider.run_now().await?,
            BackupOperation::Verify => provider.verify().await?,
            BackupOperation::List => provider.list().await?,
            BackupOperation::Prune => provider.prune().await?,
        }
    }
    Ok(())
}
