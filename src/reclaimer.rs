//! Reclaimer orchestrator: fetch in-flight rows, classify the stale ones,
//! alert best-effort, then reset and persist each one independently.

use chrono::Utc;

use crate::config::PipelineConfig;
use crate::error::PgControlError;
use crate::evaluator::classify_stale;
use crate::resetter::reset_to_pending;
use crate::store::DriveStore;

/// Extends [`crate::arbiter::AlertDispatcher`] with the stale-process
/// notification the reclaimer sends before converting rows back to
/// pending. Kept as a separate trait so a fake reclaim-only dispatcher
/// doesn't need to implement the arbiter's email method too.
pub trait StaleAlertDispatcher {
    fn send_stale_process_alert(&self, stale: &[crate::model::WorkUnitRow], cfg: &PipelineConfig) -> Result<(), PgControlError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ReclaimCounts {
    pub total: usize,
    pub stale: usize,
    pub converted: usize,
}

/// Run one reclaim pass. A failure replacing a single row is logged with
/// full identity context and does not stop the loop; partial progress is
/// acceptable and preferable to all-or-nothing.
pub fn run_reclaim(
    store: &dyn DriveStore,
    alerts: &dyn StaleAlertDispatcher,
    cfg: &PipelineConfig,
) -> Result<ReclaimCounts, PgControlError> {
    let in_flight = store.fetch_in_process(cfg)?;
    if in_flight.is_empty() {
        return Ok(ReclaimCounts {
            total: 0,
            stale: 0,
            converted: 0,
        });
    }

    let stale = classify_stale(&in_flight, cfg, Utc::now());
    if stale.is_empty() {
        return Ok(ReclaimCounts {
            total: in_flight.len(),
            stale: 0,
            converted: 0,
        });
    }

    if let Err(e) = alerts.send_stale_process_alert(&stale, cfg) {
        tracing::warn!(event = "STALE_ALERT_DISPATCH_FAILED", error = %e);
    }

    let mut converted = 0;
    for original in &stale {
        let updated = reset_to_pending(original);
        match store.replace_row(original, &updated, cfg) {
            Ok(()) => converted += 1,
            Err(e) => {
                tracing::error!(
                    event = "RECLAIM_ROW_FAILED",
                    pipeline_id = %original.pipeline_id,
                    error = %e,
                );
            }
        }
    }

    Ok(ReclaimCounts {
        total: in_flight.len(),
        stale: stale.len(),
        converted,
    })
}
