//! `deck migrate`: move a service's data and workload to another target.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ServiceCatalog;
use crate::application::services::operations::Orchestrator;
use crate::domain::operation::MigrateRequest;

/// Arguments for the migrate command.
#[derive(Args)]
pub struct MigrateArgs {
    /// Service name
    pub service: String,

    /// Destination target name
    #[arg(long)]
    pub to: String,

    /// Strategy: auto|rsync|restic|snapshot
    #[arg(long, default_value = "auto")]
    pub via: String,

    /// Expected downtime window during cutover
    #[arg(long, default_value_t = 30)]
    pub downtime_seconds: u64,
}

/// Run the migrate command.
///
/// # Errors
///
/// Returns an error if the service spec cannot be loaded or output fails.
pub async fn run(app: &AppContext, args: &MigrateArgs) -> Result<ExitCode> {
    let spec = app.catalog().load(&args.service)?;
    let request = MigrateRequest {
        to: args.to.clone(),
        via: args.via.clone(),
        downtime_seconds: args.downtime_seconds,
    };

    let ledger = app.open_ledger_or_warn();
    let providers = app.providers();
    let reporter = app.reporter();
    let orchestrator = Orchestrator::new(&providers, ledger.as_ref(), &reporter, app.execution);

    let report = orchestrator.migrate(&spec, &request).await;
    super::finish(app, &report)
}
