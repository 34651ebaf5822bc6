//! Human-readable terminal renderer.

use deck_common::{OperationRecord, OutcomeKind, ProbeResult, ServiceStatusOutput};
use owo_colors::OwoColorize as _;

use crate::application::services::operations::OperationReport;
use crate::domain::target::Target;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the inventory without probing.
    pub fn render_targets(&self, targets: &[Target]) {
        if targets.is_empty() {
            self.ctx.info("No targets in inventory.");
            return;
        }
        let rows: Vec<Vec<String>> = targets
            .iter()
            .map(|t| vec![t.name.clone(), t.kind.clone(), t.endpoint()])
            .collect();
        self.print_table(&["NAME", "TYPE", "ENDPOINT"], &rows);
    }

    /// Render probe results, one row per target, in inventory order.
    pub fn render_probe_results(&self, results: &[ProbeResult]) {
        if results.is_empty() {
            self.ctx.info("No targets in inventory.");
            return;
        }
        let rows: Vec<Vec<String>> = results
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.kind.clone(),
                    r.endpoint.clone(),
                    reachability_label(r).to_string(),
                    format_latency(r.latency_ms),
                    r.detail.clone(),
                ]
            })
            .collect();
        let header = ["NAME", "TYPE", "ENDPOINT", "STATUS", "LATENCY", "DETAIL"];
        let widths = column_widths(&header, &rows);

        println!(
            "  {}",
            format_row(&header.map(str::to_string), &widths).style(self.ctx.styles.header)
        );
        for (result, row) in results.iter().zip(&rows) {
            let line = format_row(row, &widths);
            println!("  {}", line.style(self.ctx.styles.probe(result)));
        }

        let up = results.iter().filter(|r| r.reachable).count();
        println!();
        self.ctx
            .kv("Reachable:", &format!("{up}/{}", results.len()));
    }

    /// Render the list of known services.
    pub fn render_services(&self, names: &[String]) {
        if names.is_empty() {
            self.ctx.info("No services found.");
            return;
        }
        self.ctx.header("Services:");
        for name in names {
            println!("    {name}");
        }
    }

    /// Render one service's desired state.
    pub fn render_service_status(&self, status: &ServiceStatusOutput) {
        self.ctx.kv("Service:", &status.service);
        self.ctx.kv("Method:", &status.method);
        self.ctx.kv("Target:", &status.desired_target);
        self.ctx.kv(
            "Healthy:",
            match status.healthy {
                Some(true) => "yes",
                Some(false) => "no",
                None => "unknown",
            },
        );
    }

    /// Render the outcome line following the `[mode] plan` step.
    pub fn render_operation(&self, report: &OperationReport) {
        let recorded = report
            .ledger_id
            .map(|id| format!(" (event #{id})"))
            .unwrap_or_default();
        match report.outcome {
            OutcomeKind::Planned => self.ctx.info(&format!(
                "Dry run{recorded}. Re-run with --apply to execute."
            )),
            OutcomeKind::Succeeded => self.ctx.success(&format!(
                "{} {} completed{recorded}",
                report.command.as_str(),
                report.service
            )),
            OutcomeKind::NotImplemented => {
                self.ctx.warn(report.detail.as_deref().unwrap_or("not implemented"));
            }
            OutcomeKind::Failed => {
                self.ctx.error(report.detail.as_deref().unwrap_or("failed"));
            }
        }
    }

    /// Render ledger events, newest first.
    pub fn render_history(&self, events: &[OperationRecord]) {
        if events.is_empty() {
            self.ctx.info("No recorded events.");
            return;
        }
        let rows: Vec<Vec<String>> = events.iter().map(history_row).collect();
        self.print_table(&["ID", "TIME", "SERVICE", "COMMAND", "MODE", "PAYLOAD"], &rows);
    }

    fn print_table(&self, header: &[&str], rows: &[Vec<String>]) {
        let header: Vec<String> = header.iter().map(|h| (*h).to_string()).collect();
        let widths = column_widths(&header, rows);
        println!("  {}", format_row(&header, &widths).style(self.ctx.styles.header));
        for row in rows {
            println!("  {}", format_row(row, &widths));
        }
    }
}

/// `up`, `down`, or `missing` when a local tool is absent.
#[must_use]
pub fn reachability_label(result: &ProbeResult) -> &'static str {
    if result.reachable {
        "up"
    } else if is_missing_tool(&result.detail) {
        "missing"
    } else {
        "down"
    }
}

/// A local binary was absent rather than the target being down.
#[must_use]
pub fn is_missing_tool(detail: &str) -> bool {
    detail.contains("not found in PATH") || detail.starts_with("ssh not found")
}

/// `12.3 ms`, or `-` when no latency was measured.
#[must_use]
pub fn format_latency(latency_ms: Option<f64>) -> String {
    latency_ms.map_or_else(|| "-".to_string(), |ms| format!("{ms:.1} ms"))
}

fn history_row(event: &OperationRecord) -> Vec<String> {
    vec![
        event.id.to_string(),
        event.ts.clone(),
        event.service.clone().unwrap_or_else(|| "-".to_string()),
        event.command.clone(),
        event.mode.to_string(),
        event.payload.to_string(),
    ]
}

/// Maximum display width per column across header and rows.
#[must_use]
pub fn column_widths<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.as_ref().chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    widths
}

/// Left-aligned cells separated by two spaces; the last column is not padded.
#[must_use]
pub fn format_row(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            if i == last {
                cell.clone()
            } else {
                format!("{cell:<width$}", width = widths.get(i).copied().unwrap_or(0))
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}
