use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target kinds the prober knows how to talk to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Docker,
    Kubernetes,
    Ssh,
}

impl TargetKind {
    /// Parse the `type` field of an inventory entry. Matching is exact.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "docker" => Some(Self::Docker),
            "kubernetes" => Some(Self::Kubernetes),
            "ssh" => Some(Self::Ssh),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Kubernetes => "kubernetes",
            Self::Ssh => "ssh",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a mutating command only plans or also executes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Plan,
    Apply,
}

impl ExecutionMode {
    /// `--apply` present means apply, anything else is a dry run.
    #[must_use]
    pub fn from_apply_flag(apply: bool) -> Self {
        if apply { Self::Apply } else { Self::Plan }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Apply => "apply",
        }
    }

    #[must_use]
    pub fn is_apply(self) -> bool {
        self == Self::Apply
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored mode string is neither `plan` nor `apply`.
#[derive(Debug, Error)]
#[error("unknown execution mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for ExecutionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plan" => Ok(Self::Plan),
            "apply" => Ok(Self::Apply),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Point-in-time reachability of a single target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeResult {
    pub name: String,
    /// Raw kind string from the inventory, kept verbatim for unknown kinds.
    #[serde(rename = "type")]
    pub kind: String,
    pub endpoint: String,
    pub reachable: bool,
    pub latency_ms: Option<f64>,
    pub detail: String,
}

/// One row of an unchecked `targets` listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetListing {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub endpoint: String,
}

/// Envelope for `deck targets --json`.
#[derive(Debug, Clone, Serialize)]
pub struct TargetsOutput<T> {
    pub targets: Vec<T>,
}

/// A single audit ledger row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationRecord {
    pub id: i64,
    pub ts: String,
    pub service: Option<String>,
    pub command: String,
    pub mode: ExecutionMode,
    pub payload: serde_json::Value,
}

/// Envelope for `deck history --json`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryOutput {
    pub events: Vec<OperationRecord>,
}

/// How a mutating command ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Dry run, nothing executed.
    Planned,
    Succeeded,
    NotImplemented,
    Failed,
}

/// JSON result of deploy/backup/migrate/start/stop.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutput {
    pub command: String,
    pub mode: ExecutionMode,
    pub service: String,
    pub plan: String,
    pub ledger_id: Option<i64>,
    pub outcome: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// `deck status` with no service argument.
#[derive(Debug, Clone, Serialize)]
pub struct ServicesOutput {
    pub services: Vec<String>,
}

/// `deck status <service>`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatusOutput {
    pub service: String,
    pub desired_target: String,
    pub method: String,
    /// Health is not tracked yet; always serialized as `null`.
    pub healthy: Option<bool>,
}
