//! Staleness evaluator: classifies in-flight rows as stale once their
//! elapsed time exceeds `stale_threshold_factor × expected_duration`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::PipelineConfig;
use crate::duration::parse_duration_seconds;
use crate::model::WorkUnitRow;

/// Parse a timestamp string. RFC3339 strings carry their own offset; a bare
/// naive datetime is interpreted in the configured timezone.
fn parse_timestamp_in_tz(s: &str, tz: Tz) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| format!("cannot parse timestamp '{s}': {e}"))?;
    match tz.from_local_datetime(&naive).single() {
        Some(dt) => Ok(dt.with_timezone(&Utc)),
        None => Err(format!("ambiguous or invalid local timestamp '{s}' in {tz}")),
    }
}

/// Classify the in-flight rows, returning the stale subset in input order.
/// Per-row parse failures are logged at warning and skip that row; they
/// never abort the batch.
pub fn classify_stale(rows: &[WorkUnitRow], cfg: &PipelineConfig, now: DateTime<Utc>) -> Vec<WorkUnitRow> {
    let tz: Tz = cfg.timezone.parse().unwrap_or(chrono_tz::UTC);
    let mut stale = Vec::new();

    tracing::info!(event = "IDENTIFY_STALE_RECORDS", total = rows.len());

    for row in rows {
        let exp_duration_str = row
            .pipeline_exp_duration
            .as_deref()
            .unwrap_or(cfg.pipeline_exp_duration.as_str());

        let expected_s = match parse_duration_seconds(exp_duration_str) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(event = "STALE_DURATION_PARSE_FAILED", pipeline_id = %row.pipeline_id, error = %e);
                continue;
            }
        };

        let Some(start_str) = row.pipeline_start_time.as_deref() else {
            tracing::warn!(event = "STALE_MISSING_START_TIME", pipeline_id = %row.pipeline_id);
            continue;
        };

        let start = match parse_timestamp_in_tz(start_str, tz) {
            Ok(dt) => dt,
            Err(e) => {
                tracing::warn!(event = "STALE_TIMESTAMP_PARSE_FAILED", pipeline_id = %row.pipeline_id, error = %e);
                continue;
            }
        };

        let actual_s = (now - start).num_seconds();
        let threshold = cfg.stale_threshold_factor * expected_s as f64;

        if (actual_s as f64) > threshold {
            stale.push(row.clone());
        }
    }

    tracing::info!(event = "RECORDS_CONVERTED_TO_PENDING", candidate_count = stale.len());

    stale
}
