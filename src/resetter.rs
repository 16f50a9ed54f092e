//! Phase resetter: produces the pending image of a stale row.
//!
//! Flattened into a single pass over the fixed phase list instead of the
//! nested per-phase/per-enablement branching the reset logic grew into
//! upstream — enablement gates whether a worker acts on a phase, not
//! whether its fields are cleared, so a completed check is sufficient.

use crate::model::{WorkUnitRow, PHASES};

/// Produce the pending image of a stale row. The input is treated as
/// immutable (callers keep their own copy for the before-image); this
/// returns a new, independent row.
pub fn reset_to_pending(stale: &WorkUnitRow) -> WorkUnitRow {
    let mut updated = stale.clone();

    updated.pipeline_status = crate::model::PipelineStatus::Pending;
    updated.pipeline_start_time = None;
    updated.pipeline_end_time = None;
    updated.pipeline_duration = None;

    for phase in PHASES {
        let block = updated.phase_mut(phase);
        if !block.is_completed() {
            block.reset_to_pending();
        }
    }

    updated.retry_attempt_number += 1;

    updated
}
