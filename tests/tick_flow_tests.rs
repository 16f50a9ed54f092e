//! Exercises the full per-tick sequence — health probe → capability
//! arbiter → reclaim → pending selection — against fake collaborators,
//! the same composition `pgctl tick` drives against a real warehouse.

use std::cell::RefCell;

use chrono::{Duration, Utc};

use pg_control::arbiter::{determine_pipeline_capabilities, AlertDispatcher};
use pg_control::config::{DriveConfig, PipelineConfig};
use pg_control::error::PgControlError;
use pg_control::model::{PhaseBlock, PipelineStatus, Quadruple, WorkUnitRow};
use pg_control::probe::{check_all_connections, ConnectionProbe, Probes};
use pg_control::reclaimer::{run_reclaim, StaleAlertDispatcher};
use pg_control::selector::select_pending;
use pg_control::store::{DriveStore, InMemoryDriveStore};

struct Always(bool);
impl ConnectionProbe for Always {
    fn probe(&self, _cfg: &PipelineConfig) -> bool {
        self.0
    }
}

struct RecordingAlerts {
    emails: RefCell<Vec<String>>,
}

impl AlertDispatcher for RecordingAlerts {
    fn send_email_alert(&self, subject: &str, _message: &str) -> Result<(), PgControlError> {
        self.emails.borrow_mut().push(subject.to_string());
        Ok(())
    }
}

impl StaleAlertDispatcher for RecordingAlerts {
    fn send_stale_process_alert(&self, _stale: &[WorkUnitRow], _cfg: &PipelineConfig) -> Result<(), PgControlError> {
        Ok(())
    }
}

fn blank_phase() -> PhaseBlock {
    PhaseBlock {
        enabled: true,
        status: None,
        start_ts: None,
        end_ts: None,
        duration: None,
    }
}

fn cfg() -> PipelineConfig {
    PipelineConfig {
        pipeline_name: "orders".into(),
        source_name: "mysql_prod".into(),
        source_category: "transactional".into(),
        source_sub_type: "oltp".into(),
        timezone: "UTC".into(),
        x_time_back: "1h".into(),
        granularity: "15m".into(),
        max_pending_records: 50,
        stale_threshold_factor: 2.0,
        pipeline_exp_duration: "30m".into(),
        dag_run_id: "integration-dag".into(),
        sf_drive_config: DriveConfig {
            account: "acct".into(),
            user: "svc_user".into(),
            password: "hunter2".into(),
            warehouse: "wh".into(),
            database: "analytics".into(),
            schema: "public".into(),
            table: "drive_table".into(),
        },
    }
}

fn pending_row(id: &str, window_start_ago: Duration) -> WorkUnitRow {
    WorkUnitRow {
        pipeline_id: id.into(),
        quadruple: Quadruple {
            pipeline_name: "orders".into(),
            source_name: "mysql_prod".into(),
            source_category: "transactional".into(),
            source_sub_type: "oltp".into(),
        },
        query_window_start_time: (Utc::now() - window_start_ago).to_rfc3339(),
        query_window_end_time: Utc::now().to_rfc3339(),
        pipeline_status: PipelineStatus::Pending,
        pipeline_start_time: None,
        pipeline_end_time: None,
        pipeline_duration: None,
        pipeline_exp_duration: Some("30m".into()),
        retry_attempt_number: 0,
        continuity_check_performed: true,
        can_fetch_historical_data: true,
        phases: [blank_phase(), blank_phase(), blank_phase(), blank_phase(), blank_phase()],
    }
}

#[test]
fn full_tick_with_all_systems_healthy_selects_admissible_pending_rows() {
    let store = InMemoryDriveStore::new();
    store.seed(pending_row("ready", Duration::hours(2)));
    store.seed(pending_row("too_recent", Duration::minutes(5)));

    let probes = Probes {
        source: &Always(true),
        stage: &Always(true),
        target: &Always(true),
        drive: &Always(true),
    };
    let health = check_all_connections(&probes, &cfg());
    let alerts = RecordingAlerts { emails: RefCell::new(Vec::new()) };
    let decision = determine_pipeline_capabilities(health, &cfg(), &alerts).unwrap();
    assert!(!decision.exit_dag);

    let reclaim_counts = run_reclaim(&store, &alerts, &cfg()).unwrap();
    assert_eq!(reclaim_counts.total, 0);

    let selected = select_pending(&store, &cfg(), Utc::now()).unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].pipeline_id, "ready");

    assert!(alerts.emails.borrow()[0].contains("Complete Pipeline Execution"));
}

#[test]
fn drive_down_aborts_the_tick_before_any_store_access() {
    let probes = Probes {
        source: &Always(true),
        stage: &Always(true),
        target: &Always(true),
        drive: &Always(false),
    };
    let health = check_all_connections(&probes, &cfg());
    let alerts = RecordingAlerts { emails: RefCell::new(Vec::new()) };
    let decision = determine_pipeline_capabilities(health, &cfg(), &alerts).unwrap();

    assert!(decision.exit_dag);
    assert!(alerts.emails.borrow()[0].contains("CRITICAL"));
}
