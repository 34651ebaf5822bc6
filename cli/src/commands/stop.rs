//! `deck stop`: quiesce a service.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::ServiceCatalog;
use crate::application::services::operations::Orchestrator;

/// Run the stop command.
///
/// # Errors
///
/// Returns an error if the service spec cannot be loaded or output fails.
pub async fn run(app: &AppContext, service: &str) -> Result<ExitCode> {
    let spec = app.catalog().load(service)?;

    let ledger = app.open_ledger_or_warn();
    let providers = app.providers();
    let reporter = app.reporter();
    let orchestrator = Orchestrator::new(&providers, ledger.as_ref(), &reporter, app.execution);

    let report = orchestrator.stop(&spec).await;
    super::finish(app, &report)
}
