//! `deck backup`: run or manage backups for a service.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ServiceCatalog;
use crate::application::services::operations::Orchestrator;
use crate::domain::operation::BackupRequest;

/// Arguments for the backup command.
#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct BackupArgs {
    /// Service name
    pub service: String,

    /// Run a backup immediately
    #[arg(long)]
    pub now: bool,

    /// Verify repository integrity
    #[arg(long)]
    pub verify: bool,

    /// List snapshots/archives
    #[arg(long)]
    pub list: bool,

    /// Prune old snapshots per retention
    #[arg(long)]
    pub prune: bool,
}

/// Run the backup command.
///
/// # Errors
///
/// Returns an error if the service spec cannot be loaded or output fails.
pub async fn run(app: &AppContext, args: &BackupArgs) -> Result<ExitCode> {
    let spec = app.catalog().load(&args.service)?;
    let request = BackupRequest {
        now: args.now,
        verify: args.verify,
        list: args.list,
        prune: args.prune,
    };

    let ledger = app.open_ledger_or_warn();
    let providers = app.providers();
    let reporter = app.reporter();
    let orchestrator = Orchestrator::new(&providers, ledger.as_ref(), &reporter, app.execution);

    let report = orchestrator.backup(&spec, request).await;
    super::finish(app, &report)
}
