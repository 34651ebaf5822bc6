//! Unit tests for the target probe service.

#![allow(clippy::expect_used)]

use std::time::{Duration, Instant};

use deck_cli::application::services::target_probe::{check_all, check_target};
use deck_cli::infra::network::TokioNetworkProbe;

use crate::helpers::target;
use crate::mocks::{Canned, MockNet, MockRunner, err_output, ok_output};

const TIMEOUT: Duration = Duration::from_secs(5);

// ── Docker ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_docker_pong_is_reachable() {
    let t = target("local", "docker", &[("dockerHost", "tcp://10.0.0.5:2375")]);
    let net = MockNet::pong();

    let result = check_target(&t, TIMEOUT, &MockRunner::unused(), &net).await;

    assert!(result.reachable);
    assert_eq!(result.detail, "pong");
    assert!(result.latency_ms.is_some());
    assert_eq!(result.endpoint, "tcp://10.0.0.5:2375");
    let pinged = net.ping_calls.borrow();
    assert_eq!(pinged[0].host, "10.0.0.5");
    assert_eq!(pinged[0].port, 2375);
}

#[tokio::test]
async fn test_docker_unexpected_response_keeps_latency() {
    let t = target("local", "docker", &[]);
    let net = MockNet::new(Ok(()), Ok(b"SSH-2.0-OpenSSH_9.6".to_vec()));

    let result = check_target(&t, TIMEOUT, &MockRunner::unused(), &net).await;

    assert!(!result.reachable);
    assert!(result.detail.starts_with("unexpected: "));
    assert!(result.latency_ms.is_some());
}

#[tokio::test]
async fn test_docker_unsupported_scheme_never_connects() {
    let t = target("sock", "docker", &[("dockerHost", "unix:///var/run/docker.sock")]);
    let net = MockNet::pong();

    let result = check_target(&t, TIMEOUT, &MockRunner::unused(), &net).await;

    assert!(!result.reachable);
    assert_eq!(result.detail, "unsupported scheme: unix");
    assert_eq!(result.latency_ms, None);
    assert!(net.ping_calls.borrow().is_empty());
}

#[tokio::test]
async fn test_docker_tls_defaults_to_2376() {
    let t = target(
        "secure",
        "docker",
        &[("dockerHost", "tcp://engine.internal"), ("tls", "TRUE")],
    );
    let net = MockNet::pong();

    check_target(&t, TIMEOUT, &MockRunner::unused(), &net).await;

    let pinged = net.ping_calls.borrow();
    assert!(pinged[0].tls);
    assert_eq!(pinged[0].port, 2376);
}

#[tokio::test]
async fn test_docker_closed_port_is_unreachable_within_timeout() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let host = format!("tcp://127.0.0.1:{port}");
    let t = target("closed", "docker", &[("dockerHost", host.as_str())]);
    let timeout = Duration::from_secs(2);

    let started = Instant::now();
    let result = check_target(&t, timeout, &MockRunner::unused(), &TokioNetworkProbe).await;

    assert!(started.elapsed() < timeout + Duration::from_secs(1));
    assert!(!result.reachable);
    assert!(
        result.detail.contains("connection to 127.0.0.1"),
        "detail was: {}",
        result.detail
    );
}

// ── Kubernetes ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_kubectl_success_uses_first_stdout_line() {
    let t = target(
        "cluster",
        "kubernetes",
        &[("kubeconfig", "/k"), ("context", "prod")],
    );
    let runner = MockRunner::new(Canned::Exit(ok_output(
        b"Client Version: v1.30.0\nServer Version: v1.29.2\n",
    )));

    let result = check_target(&t, TIMEOUT, &runner, &MockNet::refused()).await;

    assert!(result.reachable);
    assert_eq!(result.detail, "Client Version: v1.30.0");
    assert_eq!(result.endpoint, "prod@/k");

    let calls = runner.calls.borrow();
    let (program, args, bound) = &calls[0];
    assert_eq!(program, "kubectl");
    assert_eq!(
        args,
        &[
            "--kubeconfig",
            "/k",
            "--context",
            "prod",
            "version",
            "--request-timeout=5s"
        ]
    );
    assert_eq!(*bound, TIMEOUT + Duration::from_secs(1));
}

#[tokio::test]
async fn test_kubectl_missing_binary() {
    let t = target("cluster", "kubernetes", &[]);
    let runner = MockRunner::new(Canned::NotFound);

    let result = check_target(&t, TIMEOUT, &runner, &MockNet::pong()).await;

    assert!(!result.reachable);
    assert_eq!(result.detail, "kubectl not found in PATH");
    assert_eq!(result.latency_ms, None);
}

#[tokio::test]
async fn test_kubectl_timeout() {
    let t = target("cluster", "kubernetes", &[]);
    let runner = MockRunner::new(Canned::TimedOut);

    let result = check_target(&t, TIMEOUT, &runner, &MockNet::pong()).await;

    assert_eq!(result.detail, "kubectl timed out");
}

#[tokio::test]
async fn test_kubectl_failure_prefers_stderr() {
    let t = target("cluster", "kubernetes", &[]);
    let runner = MockRunner::new(Canned::Exit(err_output(
        b"partial",
        b"  Unable to connect to the server\n",
    )));

    let result = check_target(&t, TIMEOUT, &runner, &MockNet::pong()).await;

    assert!(!result.reachable);
    assert_eq!(result.detail, "Unable to connect to the server");
}

// ── SSH ───────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ssh_missing_host() {
    let t = target("box", "ssh", &[("user", "bob")]);
    let runner = MockRunner::unused();

    let result = check_target(&t, TIMEOUT, &runner, &MockNet::pong()).await;

    assert!(!result.reachable);
    assert_eq!(result.detail, "missing host");
    assert_eq!(result.latency_ms, None);
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_ssh_success() {
    let t = target(
        "box",
        "ssh",
        &[("host", "h"), ("user", "bob"), ("port", "2222"), ("keyPath", "/id")],
    );
    let runner = MockRunner::new(Canned::Exit(ok_output(b"")));

    let result = check_target(&t, TIMEOUT, &runner, &MockNet::refused()).await;

    assert!(result.reachable);
    assert_eq!(result.detail, "ok");
    assert_eq!(result.endpoint, "bob@h:2222");
    let calls = runner.calls.borrow();
    let args = &calls[0].1;
    assert_eq!(args.last().map(String::as_str), Some("true"));
    assert!(args.contains(&"bob@h".to_string()));
    assert!(args.contains(&"BatchMode=yes".to_string()));
    assert!(args.contains(&"/id".to_string()));
}

#[tokio::test]
async fn test_ssh_missing_binary_falls_back_to_tcp() {
    let t = target("box", "ssh", &[("host", "h")]);
    let net = MockNet::pong();

    let result = check_target(&t, TIMEOUT, &MockRunner::new(Canned::NotFound), &net).await;

    assert!(result.reachable);
    assert_eq!(result.detail, "tcp-connect");
    assert_eq!(result.latency_ms, None);
    assert_eq!(net.tcp_calls.borrow()[0], ("h".to_string(), 22));
}

#[tokio::test]
async fn test_ssh_missing_binary_and_tcp_failure() {
    let t = target("box", "ssh", &[("host", "h")]);

    let result = check_target(
        &t,
        TIMEOUT,
        &MockRunner::new(Canned::NotFound),
        &MockNet::refused(),
    )
    .await;

    assert!(!result.reachable);
    assert_eq!(result.detail, "ssh not found; tcp failed: connection refused");
}

#[tokio::test]
async fn test_ssh_invalid_port() {
    let t = target("box", "ssh", &[("host", "h"), ("port", "ssh")]);

    let result = check_target(&t, TIMEOUT, &MockRunner::unused(), &MockNet::pong()).await;

    assert_eq!(result.detail, "invalid port: ssh");
}

#[tokio::test]
async fn test_ssh_timeout() {
    let t = target("box", "ssh", &[("host", "h")]);

    let result = check_target(
        &t,
        TIMEOUT,
        &MockRunner::new(Canned::TimedOut),
        &MockNet::pong(),
    )
    .await;

    assert_eq!(result.detail, "ssh timed out");
}

// ── Unknown kinds and fan-out ─────────────────────────────────────────────────

#[tokio::test]
async fn test_unknown_kind_never_errors() {
    let t = target("odd", "nomad", &[("host", "h")]);

    let result = check_target(&t, TIMEOUT, &MockRunner::unused(), &MockNet::pong()).await;

    assert!(!result.reachable);
    assert_eq!(result.detail, "unknown target type");
    assert_eq!(result.endpoint, "");
    assert_eq!(result.kind, "nomad");
}

#[tokio::test]
async fn test_check_all_keeps_inventory_order() {
    let targets = vec![
        target("a", "docker", &[]),
        target("b", "nomad", &[]),
        target("c", "ssh", &[]),
        target("d", "docker", &[]),
    ];

    let results = check_all(
        &targets,
        TIMEOUT,
        2,
        &MockRunner::unused(),
        &MockNet::pong(),
    )
    .await;

    let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c", "d"]);
    assert!(results[0].reachable);
    assert!(!results[1].reachable);
}

#[tokio::test]
async fn test_check_all_with_zero_concurrency_still_runs() {
    let targets = vec![target("a", "docker", &[])];
    let results = check_all(&targets, TIMEOUT, 0, &MockRunner::unused(), &MockNet::pong()).await;
    assert_eq!(results.len(), 1);
}
