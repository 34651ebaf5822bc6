//! Unit tests for the plan/apply orchestrator.

#![allow(clippy::expect_used)]

use deck_cli::application::ports::EventLedger;
use deck_cli::application::services::operations::Orchestrator;
use deck_cli::domain::error::ProviderError;
use deck_cli::domain::operation::{
    BackupRequest, DeployOptions, DeployRequest, MigrateRequest, OperationKind,
};
use deck_cli::infra::ledger::SqliteLedger;
use deck_common::{ExecutionMode, OutcomeKind};
use serde_json::json;

use crate::helpers::web_spec;
use crate::mocks::{BrokenLedger, RecordingReporter, SpyFactory};

fn deploy_to(target: Option<&str>) -> DeployRequest {
    DeployRequest {
        target: target.map(str::to_string),
        options: DeployOptions::default(),
    }
}

#[tokio::test]
async fn test_plan_mode_never_invokes_provider() {
    let factory = SpyFactory::succeeding();
    let ledger = SqliteLedger::open_in_memory().expect("ledger");
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(&factory, Some(&ledger), &reporter, ExecutionMode::Plan);
    let spec = web_spec();

    orch.deploy(&spec, &deploy_to(None)).await;
    orch.backup(&spec, BackupRequest { now: true, verify: true, list: true, prune: true })
        .await;
    orch.migrate(
        &spec,
        &MigrateRequest {
            to: "prod".to_string(),
            via: "auto".to_string(),
            downtime_seconds: 30,
        },
    )
    .await;
    let report = orch.start(&spec).await;
    orch.stop(&spec).await;

    assert!(factory.calls().is_empty());
    assert_eq!(report.outcome, OutcomeKind::Planned);
    assert_eq!(ledger.history(None, 100).expect("history").len(), 5);
}

#[tokio::test]
async fn test_apply_mode_invokes_provider_exactly_once() {
    let factory = SpyFactory::succeeding();
    let ledger = SqliteLedger::open_in_memory().expect("ledger");
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(&factory, Some(&ledger), &reporter, ExecutionMode::Apply);

    let report = orch.deploy(&web_spec(), &deploy_to(Some("prod"))).await;

    assert_eq!(factory.calls(), ["apply"]);
    assert_eq!(report.outcome, OutcomeKind::Succeeded);
    assert_eq!(report.command, OperationKind::Deploy);
}

#[tokio::test]
async fn test_reporter_gets_mode_tagged_plan() {
    let factory = SpyFactory::succeeding();
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(
        &factory,
        None::<&SqliteLedger>,
        &reporter,
        ExecutionMode::Plan,
    );

    let spec = web_spec();
    orch.stop(&spec).await;

    assert_eq!(
        reporter.steps.borrow().as_slice(),
        ["[plan] would stop web via compose"]
    );
}

#[tokio::test]
async fn test_deploy_records_target_payload() {
    let factory = SpyFactory::succeeding();
    let ledger = SqliteLedger::open_in_memory().expect("ledger");
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(&factory, Some(&ledger), &reporter, ExecutionMode::Plan);

    let report = orch.deploy(&web_spec(), &deploy_to(Some("staging"))).await;

    let events = ledger.history(None, 10).expect("history");
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(Some(event.id), report.ledger_id);
    assert_eq!(event.command, "deploy");
    assert_eq!(event.mode, ExecutionMode::Plan);
    assert_eq!(event.service.as_deref(), Some("web"));
    assert_eq!(event.payload, json!({"target": "staging"}));
}

#[tokio::test]
async fn test_deploy_without_override_uses_spec_target() {
    let factory = SpyFactory::succeeding();
    let ledger = SqliteLedger::open_in_memory().expect("ledger");
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(&factory, Some(&ledger), &reporter, ExecutionMode::Plan);

    orch.deploy(&web_spec(), &deploy_to(None)).await;

    let events = ledger.history(None, 1).expect("history");
    assert_eq!(events[0].payload, json!({"target": "staging"}));
}

#[tokio::test]
async fn test_migrate_payload_round_trips() {
    let factory = SpyFactory::succeeding();
    let ledger = SqliteLedger::open_in_memory().expect("ledger");
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(&factory, Some(&ledger), &reporter, ExecutionMode::Apply);

    let report = orch
        .migrate(
            &web_spec(),
            &MigrateRequest {
                to: "prod".to_string(),
                via: "rsync".to_string(),
                downtime_seconds: 45,
            },
        )
        .await;

    assert_eq!(factory.calls(), ["migrate"]);
    assert_eq!(report.plan, "spy migration plan");
    let event = &ledger.history(Some("web"), 1).expect("history")[0];
    assert_eq!(event.mode, ExecutionMode::Apply);
    assert_eq!(
        event.payload,
        json!({"to": "prod", "via": "rsync", "downtimeSeconds": 45})
    );
}

#[tokio::test]
async fn test_backup_without_flags_runs_now() {
    let factory = SpyFactory::succeeding();
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(
        &factory,
        None::<&SqliteLedger>,
        &reporter,
        ExecutionMode::Apply,
    );

    orch.backup(&web_spec(), BackupRequest::default()).await;

    assert_eq!(factory.calls(), ["run_now"]);
}

#[tokio::test]
async fn test_backup_runs_selected_operations_in_order() {
    let factory = SpyFactory::succeeding();
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(
        &factory,
        None::<&SqliteLedger>,
        &reporter,
        ExecutionMode::Apply,
    );

    let request = BackupRequest {
        now: false,
        verify: true,
        list: true,
        prune: true,
    };
    let report = orch.backup(&web_spec(), request).await;

    assert_eq!(factory.calls(), ["verify", "list", "prune"]);
    assert!(report.plan.starts_with("backup web (now=false verify=true list=true prune=true) via restic"));
    assert!(report.plan.ends_with("spy backup plan"));
}

#[tokio::test]
async fn test_backup_stops_at_first_error() {
    let factory = SpyFactory::failing(ProviderError::Failed {
        provider: "Spy",
        operation: "verify",
        message: "repository locked".to_string(),
    });
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(
        &factory,
        None::<&SqliteLedger>,
        &reporter,
        ExecutionMode::Apply,
    );

    let request = BackupRequest {
        now: true,
        verify: true,
        list: false,
        prune: false,
    };
    let report = orch.backup(&web_spec(), request).await;

    assert_eq!(factory.calls(), ["run_now"]);
    assert_eq!(report.outcome, OutcomeKind::Failed);
    assert_eq!(
        report.detail.as_deref(),
        Some("Spy.verify failed: repository locked")
    );
}

#[tokio::test]
async fn test_not_implemented_is_its_own_outcome() {
    let factory = SpyFactory::failing(ProviderError::not_implemented("Spy", "start"));
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(
        &factory,
        None::<&SqliteLedger>,
        &reporter,
        ExecutionMode::Apply,
    );

    let report = orch.start(&web_spec()).await;

    assert_eq!(factory.calls(), ["start"]);
    assert_eq!(report.outcome, OutcomeKind::NotImplemented);
    assert_eq!(
        report.detail.as_deref(),
        Some("Spy.start is not implemented yet")
    );
}

#[tokio::test]
async fn test_ledger_failure_is_a_warning() {
    let factory = SpyFactory::succeeding();
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(&factory, Some(&BrokenLedger), &reporter, ExecutionMode::Apply);

    let report = orch.deploy(&web_spec(), &deploy_to(None)).await;

    assert_eq!(report.ledger_id, None);
    assert_eq!(report.outcome, OutcomeKind::Succeeded);
    assert_eq!(factory.calls(), ["apply"]);
    let warnings = reporter.warnings.borrow();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("disk I/O error"));
}

#[tokio::test]
async fn test_disabled_ledger_warns_on_each_call() {
    let factory = SpyFactory::succeeding();
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(
        &factory,
        None::<&SqliteLedger>,
        &reporter,
        ExecutionMode::Plan,
    );

    let spec = web_spec();
    orch.start(&spec).await;
    orch.stop(&spec).await;

    assert_eq!(reporter.warnings.borrow().len(), 2);
}

#[tokio::test]
async fn test_report_serializes_for_json() {
    let factory = SpyFactory::succeeding();
    let ledger = SqliteLedger::open_in_memory().expect("ledger");
    let reporter = RecordingReporter::default();
    let orch = Orchestrator::new(&factory, Some(&ledger), &reporter, ExecutionMode::Plan);

    let report = orch.deploy(&web_spec(), &deploy_to(Some("staging"))).await;
    let value = serde_json::to_value(report.to_output()).expect("json");

    assert_eq!(value["command"], "deploy");
    assert_eq!(value["mode"], "plan");
    assert_eq!(value["service"], "web");
    assert_eq!(value["plan"], "spy plan");
    assert_eq!(value["outcome"], "planned");
    assert!(value["ledgerId"].is_i64());
    assert!(value.get("detail").is_none());
}
