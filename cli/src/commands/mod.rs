//! Command implementations

pub mod backup;
pub mod deploy;
pub mod history;
pub mod migrate;
pub mod start;
pub mod status;
pub mod stop;
pub mod targets;

use std::process::ExitCode;

use anyhow::Result;
use deck_common::OutcomeKind;

use crate::app::AppContext;
use crate::application::services::operations::OperationReport;

/// Exit status when a provider reported its operation as not implemented.
pub const EXIT_NOT_IMPLEMENTED: u8 = 3;

/// Map an orchestrator outcome onto the process exit status.
#[must_use]
pub fn exit_code_for(outcome: OutcomeKind) -> ExitCode {
    match outcome {
        OutcomeKind::Planned | OutcomeKind::Succeeded => ExitCode::SUCCESS,
        OutcomeKind::NotImplemented => ExitCode::from(EXIT_NOT_IMPLEMENTED),
        OutcomeKind::Failed => ExitCode::FAILURE,
    }
}

/// Render an operation report and derive the exit status.
fn finish(app: &AppContext, report: &OperationReport) -> Result<ExitCode> {
    app.renderer().render_operation(report)?;
    Ok(exit_code_for(report.outcome))
}
