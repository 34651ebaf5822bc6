//! Application context: unified state passed to every command handler.
//!
//! Built once from the global flags. Adding a cross-cutting concern means one
//! field change here and no command signature changes.

use std::path::PathBuf;

use anyhow::Result;
use deck_common::ExecutionMode;

use crate::application::ports::{ConfigStore, ProgressReporter};
use crate::domain::config::DeckConfig;
use crate::infra::config::YamlConfigStore;
use crate::infra::ledger::SqliteLedger;
use crate::infra::providers::DefaultProviders;
use crate::infra::services::YamlServiceCatalog;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    /// `--apply`: execute instead of planning.
    pub apply: bool,
    /// `--config` path.
    pub config: PathBuf,
    /// `--state` path of the audit ledger.
    pub state: PathBuf,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Plan or apply, fixed for the whole process.
    pub execution: ExecutionMode,
    /// Loaded `deck.yaml` (defaults when absent).
    pub config: DeckConfig,
    /// Where the audit ledger lives.
    pub state_path: PathBuf,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let store = YamlConfigStore::new(flags.config);
        let config = store.load()?;
        tracing::debug!(path = %store.path().display(), ?config, "configuration loaded");

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            execution: ExecutionMode::from_apply_flag(flags.apply),
            config,
            state_path: flags.state,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Progress reporter; writes to stderr under `--json`.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        match self.mode {
            OutputMode::Human => TerminalReporter::new(&self.output),
            OutputMode::Json => TerminalReporter::stderr(&self.output),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> YamlServiceCatalog {
        YamlServiceCatalog::new(self.config.services_dir.clone())
    }

    #[must_use]
    pub fn providers(&self) -> DefaultProviders {
        DefaultProviders::new(self.config.services_dir.clone())
    }

    /// Open the audit ledger at `--state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_ledger(&self) -> Result<SqliteLedger> {
        SqliteLedger::open(&self.state_path)
    }

    /// Open the audit ledger, downgrading failure to a warning.
    ///
    /// Mutating commands still run; the orchestrator warns that nothing was
    /// recorded.
    #[must_use]
    pub fn open_ledger_or_warn(&self) -> Option<SqliteLedger> {
        match self.open_ledger() {
            Ok(ledger) => Some(ledger),
            Err(e) => {
                tracing::warn!(
                    path = %self.state_path.display(),
                    error = %format!("{e:#}"),
                    "audit ledger unavailable",
                );
                self.reporter()
                    .warn(&format!("audit ledger unavailable: {e:#}"));
                None
            }
        }
    }
}
