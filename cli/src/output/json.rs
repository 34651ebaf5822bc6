//! JSON output helpers.
//!
//! `JsonRenderer` writes one pretty-printed document per command to stdout.
//! `format_error` builds the error object used by every `--json` code path
//! when a command fails.

use anyhow::{Context, Result};
use deck_common::{
    HistoryOutput, OperationRecord, ProbeResult, ServiceStatusOutput, ServicesOutput,
    TargetListing, TargetsOutput,
};
use serde::Serialize;

use crate::application::services::operations::OperationReport;
use crate::domain::target::Target;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable renderer for `--json`.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_targets(targets: &[Target]) -> Result<()> {
        let listing = TargetsOutput {
            targets: targets
                .iter()
                .map(|t| TargetListing {
                    name: t.name.clone(),
                    kind: t.kind.clone(),
                    endpoint: t.endpoint(),
                })
                .collect(),
        };
        print(&listing)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_probe_results(results: &[ProbeResult]) -> Result<()> {
        print(&TargetsOutput {
            targets: results.to_vec(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_services(names: &[String]) -> Result<()> {
        print(&ServicesOutput {
            services: names.to_vec(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_service_status(status: &ServiceStatusOutput) -> Result<()> {
        print(status)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_operation(report: &OperationReport) -> Result<()> {
        print(&report.to_output())
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_history(events: &[OperationRecord]) -> Result<()> {
        print(&HistoryOutput {
            events: events.to_vec(),
        })
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{text}");
    Ok(())
}

/// Stable `code` for the JSON error object.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use crate::domain::error::ServiceError;

    match err.downcast_ref::<ServiceError>() {
        Some(ServiceError::NotFound(_)) => "SERVICE_NOT_FOUND",
        Some(ServiceError::MissingName | ServiceError::MissingMethod) => "INVALID_SERVICE_SPEC",
        None => "COMMAND_FAILED",
    }
}
