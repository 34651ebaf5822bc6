//! Application service: target reachability probing.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! Probing never fails at the API level: every error is folded into a
//! `ProbeResult` with `reachable = false` and a specific `detail`.

use std::time::{Duration, Instant};

use deck_common::ProbeResult;
use futures_util::stream::{self, StreamExt};

use crate::application::ports::{CommandRunner, NetworkProbe};
use crate::domain::error::CommandError;
use crate::domain::probe::{
    DETAIL_OK, DETAIL_PONG, DETAIL_TCP_CONNECT, DETAIL_UNKNOWN_KIND,
    PROCESS_GRACE, first_line_or_ok, kubectl_version_args, ping_succeeded,
    process_failure_detail, resolve_docker_endpoint, ssh_invocation, unexpected_response_detail,
};
use crate::domain::target::{
    DockerConnection, KubernetesConnection, SshConnection, Target, TargetConnection,
};

/// Result of one strategy before the target's identity is attached.
struct Outcome {
    reachable: bool,
    latency_ms: Option<f64>,
    detail: String,
}

impl Outcome {
    fn reachable(detail: impl Into<String>, latency_ms: Option<f64>) -> Self {
        Self {
            reachable: true,
            latency_ms,
            detail: detail.into(),
        }
    }

    fn unreachable(detail: impl Into<String>) -> Self {
        Self {
            reachable: false,
            latency_ms: None,
            detail: detail.into(),
        }
    }
}

/// Probe a single target with the strategy matching its kind.
pub async fn check_target(
    target: &Target,
    timeout: Duration,
    runner: &impl CommandRunner,
    net: &impl NetworkProbe,
) -> ProbeResult {
    let outcome = match &target.connection {
        TargetConnection::Docker(conn) => probe_docker(conn, timeout, net).await,
        TargetConnection::Kubernetes(conn) => probe_kubernetes(conn, timeout, runner).await,
        TargetConnection::Ssh(conn) => probe_ssh(conn, timeout, runner, net).await,
        TargetConnection::Unknown => Outcome::unreachable(DETAIL_UNKNOWN_KIND),
    };

    tracing::debug!(
        target = %target.name,
        kind = %target.kind,
        reachable = outcome.reachable,
        latency_ms = outcome.latency_ms,
        detail = %outcome.detail,
        "probe finished",
    );

    ProbeResult {
        name: target.name.clone(),
        kind: target.kind.clone(),
        endpoint: target.endpoint(),
        reachable: outcome.reachable,
        latency_ms: outcome.latency_ms,
        detail: outcome.detail,
    }
}

/// Probe every target with at most `concurrency` probes in flight.
///
/// Results come back in the same order as `targets`.
pub async fn check_all(
    targets: &[Target],
    timeout: Duration,
    concurrency: usize,
    runner: &impl CommandRunner,
    net: &impl NetworkProbe,
) -> Vec<ProbeResult> {
    stream::iter(targets)
        .map(|target| check_target(target, timeout, runner, net))
        .buffered(concurrency.max(1))
        .collect()
        .await
}

// ── Strategies ────────────────────────────────────────────────────────────────

async fn probe_docker(
    conn: &DockerConnection,
    timeout: Duration,
    net: &impl NetworkProbe,
) -> Outcome {
    let endpoint = match resolve_docker_endpoint(conn) {
        Ok(endpoint) => endpoint,
        Err(detail) => return Outcome::unreachable(detail),
    };

    let started = Instant::now();
    match net.docker_ping(&endpoint, timeout).await {
        Ok(response) => {
            let latency = Some(elapsed_ms(started));
            if ping_succeeded(&response) {
                Outcome::reachable(DETAIL_PONG, latency)
            } else {
                Outcome {
                    reachable: false,
                    latency_ms: latency,
                    detail: unexpected_response_detail(&response),
                }
            }
        }
        Err(e) => Outcome::unreachable(format!("{e:#}")),
    }
}

async fn probe_kubernetes(
    conn: &KubernetesConnection,
    timeout: Duration,
    runner: &impl CommandRunner,
) -> Outcome {
    let args = kubectl_version_args(conn, timeout);
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();

    let started = Instant::now();
    match runner
        .run_with_timeout("kubectl", &argv, timeout + PROCESS_GRACE)
        .await
    {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            Outcome::reachable(first_line_or_ok(&stdout), Some(elapsed_ms(started)))
        }
        Ok(output) => Outcome::unreachable(process_failure_detail(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        )),
        Err(CommandError::NotFound(_)) => Outcome::unreachable("kubectl not found in PATH"),
        Err(CommandError::TimedOut { .. }) => Outcome::unreachable("kubectl timed out"),
        Err(e) => Outcome::unreachable(e.to_string()),
    }
}

async fn probe_ssh(
    conn: &SshConnection,
    timeout: Duration,
    runner: &impl CommandRunner,
    net: &impl NetworkProbe,
) -> Outcome {
    let invocation = match ssh_invocation(conn, timeout) {
        Ok(invocation) => invocation,
        Err(detail) => return Outcome::unreachable(detail),
    };
    let argv: Vec<&str> = invocation.args.iter().map(String::as_str).collect();

    let started = Instant::now();
    match runner
        .run_with_timeout("ssh", &argv, timeout + PROCESS_GRACE)
        .await
    {
        Ok(output) if output.status.success() => {
            Outcome::reachable(DETAIL_OK, Some(elapsed_ms(started)))
        }
        Ok(output) => Outcome::unreachable(process_failure_detail(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        )),
        // Weaker liveness signal: the port answers, authentication untested.
        Err(CommandError::NotFound(_)) => {
            match net
                .tcp_connect(&invocation.host, invocation.port, timeout)
                .await
            {
                Ok(()) => Outcome::reachable(DETAIL_TCP_CONNECT, None),
                Err(e) => Outcome::unreachable(format!("ssh not found; tcp failed: {e:#}")),
            }
        }
        Err(CommandError::TimedOut { .. }) => Outcome::unreachable("ssh timed out"),
        Err(e) => Outcome::unreachable(e.to_string()),
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
