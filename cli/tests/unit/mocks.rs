//! Shared mock infrastructure for unit tests.
//!
//! Hand-written port implementations with canned responses and call
//! recording, so each test file doesn't re-define the same boilerplate.

#![allow(clippy::expect_used, dead_code)]

use std::cell::RefCell;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use deck_cli::application::ports::{
    BackupProvider, CommandRunner, Deployer, EventLedger, MigrationProvider, NetworkProbe,
    ProgressReporter, ProviderFactory,
};
use deck_cli::domain::error::{CommandError, ProviderError};
use deck_cli::domain::operation::{DeployOptions, MigrateRequest};
use deck_cli::domain::probe::DockerEndpoint;
use deck_cli::domain::service::ServiceSpec;
use deck_common::{ExecutionMode, OperationRecord};

// ── Output helpers ────────────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(stdout: &[u8], stderr: &[u8]) -> Output {
    Output {
        status: ExitStatus::from_raw(1 << 8),
        stdout: stdout.to_vec(),
        stderr: stderr.to_vec(),
    }
}

// ── Mock: command runner ──────────────────────────────────────────────────────

/// What the mocked process does.
#[derive(Clone)]
pub enum Canned {
    Exit(Output),
    NotFound,
    TimedOut,
}

/// A `CommandRunner` that returns one canned response and records calls.
pub struct MockRunner {
    response: Canned,
    pub calls: RefCell<Vec<(String, Vec<String>, Duration)>>,
}

impl MockRunner {
    pub fn new(response: Canned) -> Self {
        Self {
            response,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Runner that must never be called.
    pub fn unused() -> Self {
        Self::new(Canned::NotFound)
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CommandRunner for MockRunner {
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output, CommandError> {
        self.calls.borrow_mut().push((
            program.to_string(),
            args.iter().map(ToString::to_string).collect(),
            timeout,
        ));
        match &self.response {
            Canned::Exit(output) => Ok(output.clone()),
            Canned::NotFound => Err(CommandError::NotFound(program.to_string())),
            Canned::TimedOut => Err(CommandError::TimedOut {
                program: program.to_string(),
                timeout,
            }),
        }
    }
}

// ── Mock: network probe ───────────────────────────────────────────────────────

/// A `NetworkProbe` with canned TCP and ping results.
pub struct MockNet {
    tcp: Result<(), String>,
    ping: Result<Vec<u8>, String>,
    pub tcp_calls: RefCell<Vec<(String, u16)>>,
    pub ping_calls: RefCell<Vec<DockerEndpoint>>,
}

impl MockNet {
    pub fn new(tcp: Result<(), String>, ping: Result<Vec<u8>, String>) -> Self {
        Self {
            tcp,
            ping,
            tcp_calls: RefCell::new(Vec::new()),
            ping_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn pong() -> Self {
        Self::new(Ok(()), Ok(b"HTTP/1.1 200 OK\r\n\r\nOK".to_vec()))
    }

    pub fn refused() -> Self {
        Self::new(
            Err("connection refused".to_string()),
            Err("connection refused".to_string()),
        )
    }
}

impl NetworkProbe for MockNet {
    async fn tcp_connect(&self, host: &str, port: u16, _timeout: Duration) -> Result<()> {
        self.tcp_calls.borrow_mut().push((host.to_string(), port));
        self.tcp.clone().map_err(anyhow::Error::msg)
    }

    async fn docker_ping(&self, endpoint: &DockerEndpoint, _timeout: Duration) -> Result<Vec<u8>> {
        self.ping_calls.borrow_mut().push(endpoint.clone());
        self.ping.clone().map_err(anyhow::Error::msg)
    }
}

// ── Mock: progress reporter ───────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub steps: RefCell<Vec<String>>,
    pub warnings: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }

    fn success(&self, _message: &str) {}

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

// ── Mock: ledgers ─────────────────────────────────────────────────────────────

/// Ledger that always fails to write.
pub struct BrokenLedger;

impl EventLedger for BrokenLedger {
    fn record(
        &self,
        _service: Option<&str>,
        _command: &str,
        _mode: ExecutionMode,
        _payload: &serde_json::Value,
    ) -> Result<i64> {
        anyhow::bail!("disk I/O error")
    }

    fn history(&self, _service: Option<&str>, _limit: usize) -> Result<Vec<OperationRecord>> {
        Ok(Vec::new())
    }
}

// ── Spy providers ─────────────────────────────────────────────────────────────

/// Shared log of provider entry points that were executed.
pub type CallLog = Rc<RefCell<Vec<&'static str>>>;

/// Factory whose providers record every execution call.
pub struct SpyFactory {
    pub calls: CallLog,
    /// Result returned by every execution entry point.
    pub result: Result<(), ProviderError>,
}

impl SpyFactory {
    pub fn succeeding() -> Self {
        Self {
            calls: CallLog::default(),
            result: Ok(()),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            calls: CallLog::default(),
            result: Err(err),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn spy(&self) -> Spy {
        Spy {
            calls: Rc::clone(&self.calls),
            result: self.result.clone(),
        }
    }
}

pub struct Spy {
    calls: CallLog,
    result: Result<(), ProviderError>,
}

impl Spy {
    fn hit(&self, name: &'static str) -> Result<(), ProviderError> {
        self.calls.borrow_mut().push(name);
        self.result.clone()
    }
}

impl Deployer for Spy {
    fn name(&self) -> &'static str {
        "Spy"
    }
    fn plan(&self) -> String {
        "spy plan".to_string()
    }
    async fn apply(&self) -> Result<(), ProviderError> {
        self.hit("apply")
    }
    async fn start(&self) -> Result<(), ProviderError> {
        self.hit("start")
    }
    async fn stop(&self) -> Result<(), ProviderError> {
        self.hit("stop")
    }
}

impl BackupProvider for Spy {
    fn name(&self) -> &'static str {
        "Spy"
    }
    fn plan(&self) -> String {
        "spy backup plan".to_string()
    }
    async fn run_now(&self) -> Result<(), ProviderError> {
        self.hit("run_now")
    }
    async fn list(&self) -> Result<(), ProviderError> {
        self.hit("list")
    }
    async fn verify(&self) -> Result<(), ProviderError> {
        self.hit("verify")
    }
    async fn prune(&self) -> Result<(), ProviderError> {
        self.hit("prune")
    }
}

impl MigrationProvider for Spy {
    fn name(&self) -> &'static str {
        "Spy"
    }
    fn plan(&self) -> String {
        "spy migration plan".to_string()
    }
    async fn migrate(&self) -> Result<(), ProviderError> {
        self.hit("migrate")
    }
}

impl ProviderFactory for SpyFactory {
    type Deployer = Spy;
    type Backup = Spy;
    type Migrator = Spy;

    fn deployer(&self, _spec: &ServiceSpec, _target: &str, _options: DeployOptions) -> Spy {
        self.spy()
    }
    fn backup(&self, _spec: &ServiceSpec) -> Spy {
        self.spy()
    }
    fn migrator(&self, _spec: &ServiceSpec, _request: &MigrateRequest) -> Spy {
        self.spy()
    }
}
