//! Compact duration string parsing — `"2d3h9s"` → seconds.
//!
//! Supported units: `d` (days, 86400s), `h` (hours, 3600s), `m` (minutes,
//! 60s), `s` (seconds, 1s). Units may appear in any order and the result is
//! the sum of the matched `(value × unit)` terms. Unknown unit letters are
//! silently ignored — they just never contribute a term. A bare digit run
//! with no recognized unit after it contributes nothing either.

use crate::error::PgControlError;

/// Parse a duration string into a whole number of seconds.
///
/// Fails with [`PgControlError::InvalidDuration`] only when no recognized
/// unit matched at all — a string like `"0s"` is a valid match that happens
/// to sum to zero, which is not an error.
pub fn parse_duration_seconds(input: &str) -> Result<i64, PgControlError> {
    let mut total_secs: i64 = 0;
    let mut num_buf = String::new();
    let mut matched_any = false;

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            num_buf.push(ch);
            continue;
        }

        let multiplier = match ch {
            'd' => Some(86_400i64),
            'h' => Some(3_600),
            'm' => Some(60),
            's' => Some(1),
            _ => None,
        };

        let Some(multiplier) = multiplier else {
            // Unknown unit letter: silently ignored, including any digits
            // that preceded it.
            num_buf.clear();
            continue;
        };

        if num_buf.is_empty() {
            // A recognized unit letter with no preceding digits contributes
            // nothing and is not itself a match.
            continue;
        }

        let value: i64 = num_buf.parse().map_err(|_| PgControlError::InvalidDuration {
            input: input.to_string(),
            reason: format!("invalid number '{num_buf}' before unit '{ch}'"),
        })?;

        total_secs += value * multiplier;
        matched_any = true;
        num_buf.clear();
    }

    if !matched_any {
        return Err(PgControlError::InvalidDuration {
            input: input.to_string(),
            reason: "no recognized duration unit (d/h/m/s) matched".to_string(),
        });
    }

    Ok(total_secs)
}
