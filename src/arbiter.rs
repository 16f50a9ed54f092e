//! Capability arbiter: maps the four-way health status into a decision
//! about whether to continue the tick, and which transfer legs are usable.
//!
//! Shaped as a small first-match-wins decision table returning a plain
//! struct, the same style used elsewhere in this codebase for branchy
//! decisions.

use crate::config::PipelineConfig;
use crate::error::PgControlError;
use crate::probe::HealthStatus;

/// An outbound alert channel. The arbiter uses `send_email_alert`; the
/// reclaimer uses `send_stale_process_alert` (see `reclaimer.rs`).
pub trait AlertDispatcher {
    fn send_email_alert(&self, subject: &str, message: &str) -> Result<(), PgControlError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// The outcome of one capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityDecision {
    pub exit_dag: bool,
    pub can_src_to_stg: bool,
    pub can_stg_to_tgt: bool,
    pub severity: AlertSeverity,
}

fn subject_and_message(decision: &CapabilityDecision, dag_run_id: &str) -> (String, String) {
    match (decision.severity, decision.can_src_to_stg, decision.can_stg_to_tgt) {
        (AlertSeverity::Critical, _, _) => (
            format!("CRITICAL: Drive Unavailable - DAG {dag_run_id}"),
            format!("Drive connection unavailable; pipeline status cannot be persisted for DAG {dag_run_id}."),
        ),
        (AlertSeverity::Warning, false, false) if !decision.exit_dag => (
            format!("WARNING: No Data Transfers Possible - DAG {dag_run_id}"),
            format!("Neither source→stage nor stage→target is currently usable for DAG {dag_run_id}."),
        ),
        (AlertSeverity::Warning, false, false) => (
            format!("WARNING: No Data Connections Available - DAG {dag_run_id}"),
            format!("No source, stage, or target connection is available for DAG {dag_run_id}; aborting."),
        ),
        (AlertSeverity::Warning, true, false) => (
            format!("WARNING: Partial Pipeline - Source to Stage Only - DAG {dag_run_id}"),
            format!("Only source→stage transfer is currently usable for DAG {dag_run_id}."),
        ),
        (AlertSeverity::Warning, false, true) => (
            format!("WARNING: Partial Pipeline - Stage to Target Only - DAG {dag_run_id}"),
            format!("Only stage→target transfer is currently usable for DAG {dag_run_id}."),
        ),
        (AlertSeverity::Info, true, true) => (
            format!("INFO: Complete Pipeline Execution - DAG {dag_run_id}"),
            format!("All transfer legs are usable for DAG {dag_run_id}."),
        ),
        _ => (
            format!("WARNING: Partial Pipeline - DAG {dag_run_id}"),
            format!("Pipeline capability is degraded for DAG {dag_run_id}."),
        ),
    }
}

/// Apply the capability decision table (first match wins) and dispatch the
/// corresponding alert. `dag_run_id` must be non-empty or this fails with
/// `ConfigError` before any alert is attempted.
pub fn determine_pipeline_capabilities(
    health: HealthStatus,
    cfg: &PipelineConfig,
    alerts: &dyn AlertDispatcher,
) -> Result<CapabilityDecision, PgControlError> {
    if cfg.dag_run_id.trim().is_empty() {
        return Err(PgControlError::ConfigError("dag_run_id is required by the arbiter".to_string()));
    }

    tracing::info!(event = "CAPABILITY_CHECK_START", dag_run_id = %cfg.dag_run_id);

    let any_data_conn = health.source || health.stage || health.target;

    let decision = if !health.drive {
        CapabilityDecision {
            exit_dag: true,
            can_src_to_stg: false,
            can_stg_to_tgt: false,
            severity: AlertSeverity::Critical,
        }
    } else if !any_data_conn {
        CapabilityDecision {
            exit_dag: true,
            can_src_to_stg: false,
            can_stg_to_tgt: false,
            severity: AlertSeverity::Warning,
        }
    } else {
        let can_src_to_stg = health.source && health.stage;
        let can_stg_to_tgt = health.stage && health.target;
        let severity = if can_src_to_stg && can_stg_to_tgt {
            AlertSeverity::Info
        } else {
            AlertSeverity::Warning
        };
        CapabilityDecision {
            exit_dag: false,
            can_src_to_stg,
            can_stg_to_tgt,
            severity,
        }
    };

    let (subject, message) = subject_and_message(&decision, &cfg.dag_run_id);
    alerts.send_email_alert(&subject, &message)?;

    tracing::info!(
        event = "CAPABILITY_CHECK_COMPLETE",
        dag_run_id = %cfg.dag_run_id,
        exit_dag = decision.exit_dag,
        can_src_to_stg = decision.can_src_to_stg,
        can_stg_to_tgt = decision.can_stg_to_tgt,
    );

    Ok(decision)
}
