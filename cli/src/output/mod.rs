//! Human and JSON output, styling, spinners and the terminal reporter.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use anyhow::Result;
use console::Term;
use deck_common::{OperationRecord, ProbeResult, ServiceStatusOutput};
use owo_colors::OwoColorize as _;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::services::operations::OperationReport;
use crate::domain::target::Target;

/// Styling and terminal state shared by every human-facing writer.
pub struct OutputContext {
    pub styles: Styles,
    /// stdout is a terminal
    pub is_tty: bool,
    /// `--quiet`
    pub quiet: bool,
}

impl OutputContext {
    /// Colors need a TTY, no `--no-color` and no `NO_COLOR` in the environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Spinners only on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Marked stdout line, dropped under `--quiet`.
    fn line(&self, mark: &str, style: owo_colors::Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", mark.style(style));
        }
    }

    pub fn success(&self, msg: &str) {
        self.line("✓", self.styles.success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line("⚠", self.styles.warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.line("ℹ", self.styles.info, msg);
    }

    /// Errors go to stderr and ignore `--quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// `key  value` with the key dimmed.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Output-mode dispatch: one variant per `--json` setting.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_targets(&self, targets: &[Target]) -> Result<()> {
        match self {
            Self::Human(r) => r.render_targets(targets),
            Self::Json(_) => JsonRenderer::render_targets(targets)?,
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_probe_results(&self, results: &[ProbeResult]) -> Result<()> {
        match self {
            Self::Human(r) => r.render_probe_results(results),
            Self::Json(_) => JsonRenderer::render_probe_results(results)?,
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_services(&self, names: &[String]) -> Result<()> {
        match self {
            Self::Human(r) => r.render_services(names),
            Self::Json(_) => JsonRenderer::render_services(names)?,
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_service_status(&self, status: &ServiceStatusOutput) -> Result<()> {
        match self {
            Self::Human(r) => r.render_service_status(status),
            Self::Json(_) => JsonRenderer::render_service_status(status)?,
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_operation(&self, report: &OperationReport) -> Result<()> {
        match self {
            Self::Human(r) => r.render_operation(report),
            Self::Json(_) => JsonRenderer::render_operation(report)?,
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_history(&self, events: &[OperationRecord]) -> Result<()> {
        match self {
            Self::Human(r) => r.render_history(events),
            Self::Json(_) => JsonRenderer::render_history(events)?,
        }
        Ok(())
    }
}
