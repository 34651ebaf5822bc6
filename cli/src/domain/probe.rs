//! Pure building blocks of the reachability probes.
//!
//! Argument construction, endpoint resolution and response classification
//! live here so they can be tested without sockets or child processes.

use std::time::Duration;

use url::Url;

use crate::domain::target::{DEFAULT_SSH_PORT, DockerConnection, KubernetesConnection, SshConnection};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Bound applied to every probe strategy unless configured otherwise.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Engine address probed when `dockerHost` is absent.
pub const DEFAULT_DOCKER_HOST: &str = "tcp://127.0.0.1:2375";
pub const DOCKER_PLAIN_PORT: u16 = 2375;
pub const DOCKER_TLS_PORT: u16 = 2376;
/// Minimal Docker Engine API ping.
pub const PING_REQUEST: &[u8] = b"GET /_ping HTTP/1.0\r\n\r\n";
/// Bytes of the ping response inspected.
pub const PING_READ_LIMIT: usize = 128;
/// Extra time a child process gets beyond the probe timeout before it is killed.
pub const PROCESS_GRACE: Duration = Duration::from_secs(1);

pub const DETAIL_UNKNOWN_KIND: &str = "unknown target type";
pub const DETAIL_MISSING_HOST: &str = "missing host";
pub const DETAIL_PONG: &str = "pong";
pub const DETAIL_OK: &str = "ok";
pub const DETAIL_TCP_CONNECT: &str = "tcp-connect";

// ── Docker ────────────────────────────────────────────────────────────────────

/// Where and how to reach a Docker engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerEndpoint {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub insecure: bool,
    pub ca_cert: Option<String>,
}

/// Resolve `dockerHost` into a concrete socket address and TLS settings.
///
/// # Errors
///
/// Returns the probe detail string when the URL cannot be used.
pub fn resolve_docker_endpoint(conn: &DockerConnection) -> Result<DockerEndpoint, String> {
    let raw = conn.docker_host.as_deref().unwrap_or(DEFAULT_DOCKER_HOST);
    let url = Url::parse(raw).map_err(|e| match e {
        url::ParseError::RelativeUrlWithoutBase => "unsupported scheme: ".to_string(),
        other => format!("invalid dockerHost {raw}: {other}"),
    })?;

    let scheme = url.scheme();
    if !matches!(scheme, "tcp" | "http" | "https") {
        return Err(format!("unsupported scheme: {scheme}"));
    }

    let tls = conn.tls || scheme == "https";
    let host = url
        .host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
        .filter(|h| !h.is_empty())
        .unwrap_or("127.0.0.1")
        .to_string();
    let port = url
        .port()
        .or_else(|| explicit_port(raw))
        .unwrap_or(if tls { DOCKER_TLS_PORT } else { DOCKER_PLAIN_PORT });

    Ok(DockerEndpoint {
        host,
        port,
        tls,
        insecure: conn.insecure,
        ca_cert: conn.ca_cert.clone(),
    })
}

/// Port written in the authority of `raw`.
///
/// `Url::port` hides a port equal to the scheme default (`http://h:80`), but
/// an explicit port still beats the engine defaults.
fn explicit_port(raw: &str) -> Option<u16> {
    let (_, rest) = raw.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let after_host = host_port.rsplit_once(']').map_or(host_port, |(_, p)| p);
    after_host.rsplit_once(':')?.1.parse().ok()
}

/// A ping succeeded when the engine answered with `OK` or a `200` status.
#[must_use]
pub fn ping_succeeded(response: &[u8]) -> bool {
    contains(response, b"OK") || contains(response, b"200")
}

/// Detail for a response that was read but not recognised.
#[must_use]
pub fn unexpected_response_detail(response: &[u8]) -> String {
    let head = &response[..response.len().min(32)];
    format!("unexpected: {:?}", String::from_utf8_lossy(head))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

// ── Kubernetes ────────────────────────────────────────────────────────────────

/// Arguments for `kubectl … version` bounded by `timeout`.
#[must_use]
pub fn kubectl_version_args(conn: &KubernetesConnection, timeout: Duration) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(kubeconfig) = non_empty(conn.kubeconfig.as_deref()) {
        args.push("--kubeconfig".to_string());
        args.push(kubeconfig.to_string());
    }
    if let Some(context) = non_empty(conn.context.as_deref()) {
        args.push("--context".to_string());
        args.push(context.to_string());
    }
    args.push("version".to_string());
    args.push(format!("--request-timeout={}s", whole_seconds(timeout)));
    args
}

// ── SSH ───────────────────────────────────────────────────────────────────────

/// A fully resolved SSH probe: CLI arguments plus the TCP fallback address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshInvocation {
    pub args: Vec<String>,
    pub host: String,
    pub port: u16,
}

/// Build a non-interactive `ssh … true` invocation.
///
/// # Errors
///
/// Returns the probe detail when `host` is missing or `port` is not a port.
pub fn ssh_invocation(conn: &SshConnection, timeout: Duration) -> Result<SshInvocation, String> {
    let host = non_empty(conn.host.as_deref()).ok_or_else(|| DETAIL_MISSING_HOST.to_string())?;
    let port_text = conn.port.as_deref().unwrap_or(DEFAULT_SSH_PORT);
    let port: u16 = port_text
        .trim()
        .parse()
        .map_err(|_| format!("invalid port: {port_text}"))?;

    let destination = match non_empty(conn.user.as_deref()) {
        Some(user) => format!("{user}@{host}"),
        None => host.to_string(),
    };

    let mut args = vec![
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        "-o".to_string(),
        format!("ConnectTimeout={}", whole_seconds(timeout)),
        "-p".to_string(),
        port.to_string(),
    ];
    if let Some(key) = non_empty(conn.key_path.as_deref()) {
        args.push("-i".to_string());
        args.push(key.to_string());
    }
    args.push(destination);
    args.push("true".to_string());

    Ok(SshInvocation {
        args,
        host: host.to_string(),
        port,
    })
}

// ── Process output helpers ────────────────────────────────────────────────────

/// First non-empty stdout line, or `ok`.
#[must_use]
pub fn first_line_or_ok(stdout: &str) -> String {
    stdout
        .trim()
        .lines()
        .next()
        .map_or_else(|| DETAIL_OK.to_string(), str::to_string)
}

/// Failure detail for a non-zero exit: stderr, falling back to stdout.
#[must_use]
pub fn process_failure_detail(stdout: &str, stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.to_string()
    }
}

/// Timeout rounded to whole seconds, never below one.
#[must_use]
pub fn whole_seconds(timeout: Duration) -> u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let secs = timeout.as_secs_f64().round() as u64;
    secs.max(1)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
