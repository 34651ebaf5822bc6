//! `deck history`: show recorded audit events.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::EventLedger;

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    /// Only show events for this service
    pub service: Option<String>,

    /// Maximum number of events, newest first
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

/// Run the history command.
///
/// # Errors
///
/// Returns an error if the ledger cannot be opened or read.
pub fn run(app: &AppContext, args: &HistoryArgs) -> Result<ExitCode> {
    let ledger = app.open_ledger()?;
    let events = ledger.history(args.service.as_deref(), args.limit)?;
    app.renderer().render_history(&events)?;
    Ok(ExitCode::SUCCESS)
}
