//! The work-unit row: phases, statuses, and the typed drive-table record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five phases of a work unit, in the fixed order the resetter and the
/// column-list builder both rely on.
pub const PHASES: [Phase; 5] = [
    Phase::SrcStgXfer,
    Phase::SrcStgAudit,
    Phase::StgTgtXfer,
    Phase::StgTgtAudit,
    Phase::SrcTgtAudit,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    SrcStgXfer,
    SrcStgAudit,
    StgTgtXfer,
    StgTgtAudit,
    SrcTgtAudit,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::SrcStgXfer => "SRC_STG_XFER",
            Phase::SrcStgAudit => "SRC_STG_AUDIT",
            Phase::StgTgtXfer => "STG_TGT_XFER",
            Phase::StgTgtAudit => "STG_TGT_AUDIT",
            Phase::SrcTgtAudit => "SRC_TGT_AUDIT",
        }
    }

    pub fn from_str(s: &str) -> Option<Phase> {
        match s {
            "SRC_STG_XFER" => Some(Phase::SrcStgXfer),
            "SRC_STG_AUDIT" => Some(Phase::SrcStgAudit),
            "STG_TGT_XFER" => Some(Phase::StgTgtXfer),
            "STG_TGT_AUDIT" => Some(Phase::StgTgtAudit),
            "SRC_TGT_AUDIT" => Some(Phase::SrcTgtAudit),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pipeline-level lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Pending,
    InProcess,
    Completed,
    Failed,
}

impl PipelineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStatus::Pending => "PENDING",
            PipelineStatus::InProcess => "IN_PROCESS",
            PipelineStatus::Completed => "COMPLETED",
            PipelineStatus::Failed => "FAILED",
        }
    }

    pub fn from_str(s: &str) -> Option<PipelineStatus> {
        match s {
            "PENDING" => Some(PipelineStatus::Pending),
            "IN_PROCESS" => Some(PipelineStatus::InProcess),
            "COMPLETED" => Some(PipelineStatus::Completed),
            "FAILED" => Some(PipelineStatus::Failed),
            _ => None,
        }
    }
}

/// Per-phase lifecycle status. Unlike [`PipelineStatus`], a phase may have
/// no status at all (a phase that has never started).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Pending,
    InProcess,
    Completed,
    Failed,
}

impl PhaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseStatus::Pending => "PENDING",
            PhaseStatus::InProcess => "IN_PROCESS",
            PhaseStatus::Completed => "COMPLETED",
            PhaseStatus::Failed => "FAILED",
        }
    }

    pub fn from_str(s: &str) -> Option<PhaseStatus> {
        match s {
            "PENDING" => Some(PhaseStatus::Pending),
            "IN_PROCESS" => Some(PhaseStatus::InProcess),
            "COMPLETED" => Some(PhaseStatus::Completed),
            "FAILED" => Some(PhaseStatus::Failed),
            _ => None,
        }
    }
}

/// The four fields tracked for a single phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseBlock {
    pub enabled: bool,
    pub status: Option<PhaseStatus>,
    pub start_ts: Option<String>,
    pub end_ts: Option<String>,
    pub duration: Option<String>,
}

impl PhaseBlock {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, Some(PhaseStatus::Completed))
    }

    /// Clear timings/duration and set status to PENDING, preserving `enabled`.
    pub fn reset_to_pending(&mut self) {
        self.status = Some(PhaseStatus::Pending);
        self.start_ts = None;
        self.end_ts = None;
        self.duration = None;
    }
}

/// The classification quadruple that identifies a pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quadruple {
    pub pipeline_name: String,
    pub source_name: String,
    pub source_category: String,
    pub source_sub_type: String,
}

/// One row of the drive table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkUnitRow {
    pub pipeline_id: String,
    pub quadruple: Quadruple,
    pub query_window_start_time: String,
    pub query_window_end_time: String,

    pub pipeline_status: PipelineStatus,
    pub pipeline_start_time: Option<String>,
    pub pipeline_end_time: Option<String>,
    pub pipeline_duration: Option<String>,
    pub pipeline_exp_duration: Option<String>,
    pub retry_attempt_number: i64,

    pub continuity_check_performed: bool,
    pub can_fetch_historical_data: bool,

    /// Indexed in the same fixed order as [`PHASES`].
    pub phases: [PhaseBlock; 5],
}

impl WorkUnitRow {
    pub fn phase(&self, p: Phase) -> &PhaseBlock {
        let idx = PHASES.iter().position(|&x| x == p).expect("phase in PHASES");
        &self.phases[idx]
    }

    pub fn phase_mut(&mut self, p: Phase) -> &mut PhaseBlock {
        let idx = PHASES.iter().position(|&x| x == p).expect("phase in PHASES");
        &mut self.phases[idx]
    }

    /// The gating flags that must both be `true` for this row to be
    /// considered by any core query.
    pub fn is_gated_in(&self) -> bool {
        self.continuity_check_performed && self.can_fetch_historical_data
    }

    /// Declared column order for INSERT, stable for a given row shape.
    /// Top-level columns first, then each phase's four columns in
    /// [`PHASES`] order.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut cols = vec![
            "PIPELINE_ID",
            "PIPELINE_NAME",
            "SOURCE_NAME",
            "SOURCE_CATEGORY",
            "SOURCE_SUB_TYPE",
            "QUERY_WINDOW_START_TIME",
            "QUERY_WINDOW_END_TIME",
            "PIPELINE_STATUS",
            "PIPELINE_START_TIME",
            "PIPELINE_END_TIME",
            "PIPELINE_DURATION",
            "PIPELINE_EXP_DURATION",
            "RETRY_ATTEMPT_NUMBER",
            "CONTINUITY_CHECK_PERFORMED",
            "CAN_FETCH_HISTORICAL_DATA",
        ];
        for p in PHASES {
            cols.extend(phase_columns(p));
        }
        cols
    }
}

/// The four-column block name for a phase: `{P}_ENABLED`, `{P}_STATUS`,
/// `{P}_START_TS`, `{P}_END_TS`, `{P}_DURATION`, in that fixed order.
pub fn phase_columns(p: Phase) -> [&'static str; 5] {
    match p {
        Phase::SrcStgXfer => [
            "SRC_STG_XFER_ENABLED",
            "SRC_STG_XFER_STATUS",
            "SRC_STG_XFER_START_TS",
            "SRC_STG_XFER_END_TS",
            "SRC_STG_XFER_DURATION",
        ],
        Phase::SrcStgAudit => [
            "SRC_STG_AUDIT_ENABLED",
            "SRC_STG_AUDIT_STATUS",
            "SRC_STG_AUDIT_START_TS",
            "SRC_STG_AUDIT_END_TS",
            "SRC_STG_AUDIT_DURATION",
        ],
        Phase::StgTgtXfer => [
            "STG_TGT_XFER_ENABLED",
            "STG_TGT_XFER_STATUS",
            "STG_TGT_XFER_START_TS",
            "STG_TGT_XFER_END_TS",
            "STG_TGT_XFER_DURATION",
        ],
        Phase::StgTgtAudit => [
            "STG_TGT_AUDIT_ENABLED",
            "STG_TGT_AUDIT_STATUS",
            "STG_TGT_AUDIT_START_TS",
            "STG_TGT_AUDIT_END_TS",
            "STG_TGT_AUDIT_DURATION",
        ],
        Phase::SrcTgtAudit => [
            "SRC_TGT_AUDIT_ENABLED",
            "SRC_TGT_AUDIT_STATUS",
            "SRC_TGT_AUDIT_START_TS",
            "SRC_TGT_AUDIT_END_TS",
            "SRC_TGT_AUDIT_DURATION",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_phase(enabled: bool) -> PhaseBlock {
        PhaseBlock {
            enabled,
            status: None,
            start_ts: None,
            end_ts: None,
            duration: None,
        }
    }

    fn sample_row() -> WorkUnitRow {
        WorkUnitRow {
            pipeline_id: "p1".into(),
            quadruple: Quadruple {
                pipeline_name: "pn".into(),
                source_name: "sn".into(),
                source_category: "sc".into(),
                source_sub_type: "st".into(),
            },
            query_window_start_time: "2025-01-01T00:00:00Z".into(),
            query_window_end_time: "2025-01-01T01:00:00Z".into(),
            pipeline_status: PipelineStatus::InProcess,
            pipeline_start_time: Some("2025-01-01T00:00:00Z".into()),
            pipeline_end_time: None,
            pipeline_duration: None,
            pipeline_exp_duration: Some("1h".into()),
            retry_attempt_number: 0,
            continuity_check_performed: true,
            can_fetch_historical_data: true,
            phases: [
                empty_phase(true),
                empty_phase(true),
                empty_phase(true),
                empty_phase(true),
                empty_phase(true),
            ],
        }
    }

    #[test]
    fn phase_accessor_uses_fixed_order() {
        let row = sample_row();
        assert!(!row.phase(Phase::SrcStgXfer).is_completed());
    }

    #[test]
    fn column_order_is_stable() {
        let row = sample_row();
        let a = row.columns();
        let b = row.columns();
        assert_eq!(a, b);
        assert_eq!(a[0], "PIPELINE_ID");
        assert_eq!(a.last().unwrap(), &"SRC_TGT_AUDIT_DURATION");
    }

    #[test]
    fn gating_requires_both_flags() {
        let mut row = sample_row();
        assert!(row.is_gated_in());
        row.continuity_check_performed = false;
        assert!(!row.is_gated_in());
    }

    #[test]
    fn status_round_trips_through_str() {
        for s in ["PENDING", "IN_PROCESS", "COMPLETED", "FAILED"] {
            let parsed = PipelineStatus::from_str(s).unwrap();
            assert_eq!(parsed.as_str(), s);
        }
    }
}
