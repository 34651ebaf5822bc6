//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::domain::config::{DEFAULT_CONFIG_PATH, DEFAULT_STATE_PATH};

/// Deploy, back up and migrate containerized services
#[derive(Parser)]
#[command(
    name = "deck",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Path to global config file
    #[arg(long, global = true, env = "DECK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Path to state database (sqlite)
    #[arg(long, global = true, env = "DECK_STATE", default_value = DEFAULT_STATE_PATH)]
    pub state: PathBuf,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Execute actions (otherwise dry-run)
    #[arg(long, global = true)]
    pub apply: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show service or fleet status
    Status {
        /// Service name, or omit to list all
        service: Option<String>,
    },

    /// Deploy or update a service to its target
    Deploy(commands::deploy::DeployArgs),

    /// Run or manage backups for a service
    Backup(commands::backup::BackupArgs),

    /// Migrate a service's data and workload to another target
    Migrate(commands::migrate::MigrateArgs),

    /// Start (resume) a service
    Start {
        /// Service name
        service: String,
    },

    /// Stop (quiesce) a service
    Stop {
        /// Service name
        service: String,
    },

    /// List all targets; optionally check connectivity
    Targets(commands::targets::TargetsArgs),

    /// Show recorded audit events
    History(commands::history::HistoryArgs),
}

impl Cli {
    /// Whether errors should be reported as a JSON object.
    #[must_use]
    pub fn wants_json(&self) -> bool {
        self.json
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the service spec or the inventory
    /// cannot be loaded.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            config,
            state,
            json,
            apply,
            quiet,
            no_color,
            command,
        } = self;

        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            apply,
            config,
            state,
        })?;

        match command {
            Command::Status { service } => commands::status::run(&app, service.as_deref()),
            Command::Deploy(args) => commands::deploy::run(&app, &args).await,
            Command::Backup(args) => commands::backup::run(&app, &args).await,
            Command::Migrate(args) => commands::migrate::run(&app, &args).await,
            Command::Start { service } => commands::start::run(&app, &service).await,
            Command::Stop { service } => commands::stop::run(&app, &service).await,
            Command::Targets(args) => commands::targets::run(&app, &args).await,
            Command::History(args) => commands::history::run(&app, &args),
        }
    }
}
