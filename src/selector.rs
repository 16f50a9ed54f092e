//! Pending selector: admits pending work units once their window has aged
//! past the lateness margin `x_time_back + granularity`.

use chrono::{DateTime, Utc};

use crate::config::PipelineConfig;
use crate::duration::parse_duration_seconds;
use crate::error::PgControlError;
use crate::model::WorkUnitRow;
use crate::store::DriveStore;

/// `now − x_time_back − granularity`, the newest window-start time still
/// admissible this tick.
pub fn max_accepted_time(cfg: &PipelineConfig, now: DateTime<Utc>) -> Result<DateTime<Utc>, PgControlError> {
    let x_time_back = parse_duration_seconds(&cfg.x_time_back)?;
    let granularity = parse_duration_seconds(&cfg.granularity)?;
    Ok(now - chrono::Duration::seconds(x_time_back + granularity))
}

/// Fetch admissible pending rows, ordered ASC by window start, capped by
/// `max_pending_records`. A duration-parse failure here is fatal to the
/// tick (unlike the evaluator, which tolerates per-row parse failures).
pub fn select_pending(
    store: &dyn DriveStore,
    cfg: &PipelineConfig,
    now: DateTime<Utc>,
) -> Result<Vec<WorkUnitRow>, PgControlError> {
    let cutoff = max_accepted_time(cfg, now)?;
    store.fetch_admissible_pending(cfg, cutoff)
}
