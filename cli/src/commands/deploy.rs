//! `deck deploy`: roll a service out to its target.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ServiceCatalog;
use crate::application::services::operations::Orchestrator;
use crate::domain::operation::{DeployOptions, DeployRequest};

/// Arguments for the deploy command.
#[derive(Args)]
pub struct DeployArgs {
    /// Service name
    pub service: String,

    /// Override destination target
    #[arg(long)]
    pub target: Option<String>,

    /// Wait timeout in seconds
    #[arg(long, default_value_t = 600)]
    pub timeout: u64,

    /// Force redeploy even if no changes detected
    #[arg(long)]
    pub force: bool,
}

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if the service spec cannot be loaded or output fails.
pub async fn run(app: &AppContext, args: &DeployArgs) -> Result<ExitCode> {
    let spec = app.catalog().load(&args.service)?;
    let request = DeployRequest {
        target: args.target.clone(),
        options: DeployOptions {
            timeout_secs: args.timeout,
            force: args.force,
        },
    };

    let ledger = app.open_ledger_or_warn();
    let providers = app.providers();
    let reporter = app.reporter();
    let orchestrator = Orchestrator::new(&providers, ledger.as_ref(), &reporter, app.execution);

    let report = orchestrator.deploy(&spec, &request).await;
    super::finish(app, &report)
}
