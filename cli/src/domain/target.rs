//! Target model and endpoint derivation.
//!
//! The loose `connection` map from the inventory is turned into a
//! kind-specific record once, at load time. Construction never fails: absent
//! keys stay `None` and are defaulted (or reported) by whoever uses them.

use std::collections::BTreeMap;

use deck_common::TargetKind;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Endpoint shown for a docker target without `dockerHost`.
pub const DEFAULT_DOCKER_ENDPOINT: &str = "tcp://localhost:2375";
/// Kubeconfig shown for a kubernetes target without `kubeconfig`.
pub const DEFAULT_KUBECONFIG: &str = "~/.kube/config";
/// SSH port used when `port` is absent.
pub const DEFAULT_SSH_PORT: &str = "22";

// ── Types ─────────────────────────────────────────────────────────────────────

/// A named deployment/backup destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    /// Raw `type` string from the inventory (kept for unknown kinds).
    pub kind: String,
    pub connection: TargetConnection,
}

/// Kind-specific connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetConnection {
    Docker(DockerConnection),
    Kubernetes(KubernetesConnection),
    Ssh(SshConnection),
    Unknown,
}

/// Docker engine connection (`dockerHost`, `tls`, `insecure`, `caCert`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockerConnection {
    pub docker_host: Option<String>,
    pub tls: bool,
    pub insecure: bool,
    /// PEM bundle trusted instead of the built-in web roots.
    pub ca_cert: Option<String>,
}

/// Kubernetes cluster connection (`kubeconfig`, `context`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KubernetesConnection {
    pub kubeconfig: Option<String>,
    pub context: Option<String>,
}

/// SSH host connection (`host`, `user`, `port`, `keyPath`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshConnection {
    pub host: Option<String>,
    pub user: Option<String>,
    /// Kept as text so the endpoint shows exactly what the inventory says.
    pub port: Option<String>,
    pub key_path: Option<String>,
}

// ── Construction ──────────────────────────────────────────────────────────────

impl Target {
    /// Build a target from a raw inventory entry.
    #[must_use]
    pub fn new(name: String, kind: String, connection: &BTreeMap<String, String>) -> Self {
        let connection = TargetConnection::from_map(&kind, connection);
        Self {
            name,
            kind,
            connection,
        }
    }

    /// The recognised kind, if any.
    #[must_use]
    pub fn target_kind(&self) -> Option<TargetKind> {
        TargetKind::parse(&self.kind)
    }

    /// See [`endpoint_for`].
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.connection.endpoint()
    }
}

impl TargetConnection {
    /// Select the variant for `kind` and pick its keys out of `map`.
    #[must_use]
    pub fn from_map(kind: &str, map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).cloned();
        let flag = |key: &str| map.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"));

        match TargetKind::parse(kind) {
            Some(TargetKind::Docker) => Self::Docker(DockerConnection {
                docker_host: get("dockerHost"),
                tls: flag("tls"),
                insecure: flag("insecure"),
                ca_cert: get("caCert"),
            }),
            Some(TargetKind::Kubernetes) => Self::Kubernetes(KubernetesConnection {
                kubeconfig: get("kubeconfig"),
                context: get("context"),
            }),
            Some(TargetKind::Ssh) => Self::Ssh(SshConnection {
                host: get("host"),
                user: get("user"),
                port: get("port"),
                key_path: get("keyPath"),
            }),
            None => Self::Unknown,
        }
    }

    /// Human-facing endpoint string. Pure; `""` for unknown kinds.
    #[must_use]
    pub fn endpoint(&self) -> String {
        match self {
            Self::Docker(c) => c.endpoint(),
            Self::Kubernetes(c) => c.endpoint(),
            Self::Ssh(c) => c.endpoint(),
            Self::Unknown => String::new(),
        }
    }
}

impl DockerConnection {
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.docker_host
            .clone()
            .unwrap_or_else(|| DEFAULT_DOCKER_ENDPOINT.to_string())
    }
}

impl KubernetesConnection {
    #[must_use]
    pub fn endpoint(&self) -> String {
        let kubeconfig = self.kubeconfig.as_deref().unwrap_or(DEFAULT_KUBECONFIG);
        match self.context.as_deref() {
            Some(ctx) if !ctx.is_empty() => format!("{ctx}@{kubeconfig}"),
            _ => kubeconfig.to_string(),
        }
    }
}

impl SshConnection {
    #[must_use]
    pub fn endpoint(&self) -> String {
        let host = self.host.as_deref().unwrap_or("");
        let port = self.port.as_deref().unwrap_or(DEFAULT_SSH_PORT);
        match self.user.as_deref() {
            Some(user) if !user.is_empty() => format!("{user}@{host}:{port}"),
            _ => format!("{host}:{port}"),
        }
    }
}

/// Deterministic endpoint for a target: no I/O, no mutation.
#[must_use]
pub fn endpoint_for(target: &Target) -> String {
    target.endpoint()
}

// ── Unit tests ────────────────────────────────────────────────────────────────
