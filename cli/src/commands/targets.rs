//! `deck targets`: list inventory targets, optionally probing each one.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::target_probe;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::inventory::load_inventory;
use crate::infra::network::TokioNetworkProbe;
use crate::output::progress;

/// Arguments for the targets command.
#[derive(Args)]
pub struct TargetsArgs {
    /// Probe each target for reachability
    #[arg(long)]
    pub check: bool,

    /// Path to the inventory (defaults to `inventory` in deck.yaml)
    #[arg(long)]
    pub inventory: Option<PathBuf>,
}

/// Run the targets command. Unreachable targets do not fail the command.
///
/// # Errors
///
/// Returns an error if the inventory exists but cannot be parsed.
pub async fn run(app: &AppContext, args: &TargetsArgs) -> Result<ExitCode> {
    let path = args.inventory.as_ref().unwrap_or(&app.config.inventory);
    let targets = load_inventory(Some(path))?;
    let renderer = app.renderer();

    if !args.check {
        renderer.render_targets(&targets)?;
        return Ok(ExitCode::SUCCESS);
    }

    let pb = (!app.is_json() && app.output.show_progress() && !targets.is_empty())
        .then(|| progress::spinner(&format!("Probing {} targets...", targets.len())));

    let probe = &app.config.probe;
    let results = target_probe::check_all(
        &targets,
        probe.timeout(),
        probe.concurrency(),
        &TokioCommandRunner,
        &TokioNetworkProbe,
    )
    .await;

    if let Some(pb) = pb {
        progress::finish_clear(&pb);
    }
    renderer.render_probe_results(&results)?;
    Ok(ExitCode::SUCCESS)
}
