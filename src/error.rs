//! Error types for pg_control.
//!
//! All errors that can occur in the control plane are represented by
//! [`PgControlError`]. Errors are propagated via `Result<T, PgControlError>`
//! throughout the codebase.
//!
//! # Error Classification
//!
//! Errors are classified into four categories via [`PgControlError::kind`]:
//! - **Config** — missing/invalid configuration. Always fatal to the tick.
//! - **Data** — a single row's data was unusable (bad duration, duplicate
//!   id, row-count mismatch). Fatal to that row, not the whole tick.
//! - **Connection** — the warehouse could not be reached. Fatal to the tick.
//! - **Internal** — alert/logger failures and anything else unexpected.
//!
//! # Propagation Policy
//!
//! [`PgControlError::is_fatal_to_tick`] and [`PgControlError::is_fatal_to_row`]
//! let callers branch on behavior rather than matching variants ad hoc. The
//! reclaimer isolates per-row failures; the arbiter and the pending selector
//! are all-or-nothing per tick.

use std::fmt;

/// Fixed sentinel substituted for any password-shaped field in error payloads.
pub const REDACTED: &str = "***REDACTED***";

/// Primary error type for the control plane.
#[derive(Debug, thiserror::Error)]
pub enum PgControlError {
    /// A required configuration key was missing or empty.
    #[error("config error: {0}")]
    ConfigError(String),

    /// A duration string could not be parsed.
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    /// The warehouse connection could not be opened.
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// The before-image SELECT for a `pipeline_id` returned zero rows.
    #[error("record not found: pipeline_id={0}")]
    RecordNotFound(String),

    /// The before-image SELECT returned more than one row, or a
    /// delete/insert affected a row count other than 1.
    #[error("integrity violation for pipeline_id={pipeline_id}: {reason}")]
    IntegrityViolation { pipeline_id: String, reason: String },

    /// A delete or insert affected an unexpected number of rows.
    #[error("unexpected row count for pipeline_id={pipeline_id}: expected {expected}, got {actual}")]
    UnexpectedRowCount {
        pipeline_id: String,
        expected: u64,
        actual: u64,
    },

    /// The alert dispatcher failed to send.
    #[error("alert dispatch failed: {0}")]
    AlertDispatchError(String),

    /// The logger itself failed. Only the arbiter treats this as fatal.
    #[error("logger error: {0}")]
    LoggerError(String),

    /// Anything else unexpected — indicates a bug.
    #[error("internal error: {0}")]
    InternalError(String),
}

impl PgControlError {
    /// Classify the error for monitoring.
    pub fn kind(&self) -> PgControlErrorKind {
        match self {
            PgControlError::ConfigError(_) => PgControlErrorKind::Config,

            PgControlError::InvalidDuration { .. }
            | PgControlError::RecordNotFound(_)
            | PgControlError::IntegrityViolation { .. }
            | PgControlError::UnexpectedRowCount { .. } => PgControlErrorKind::Data,

            PgControlError::ConnectionError(_) => PgControlErrorKind::Connection,

            PgControlError::AlertDispatchError(_)
            | PgControlError::LoggerError(_)
            | PgControlError::InternalError(_) => PgControlErrorKind::Internal,
        }
    }

    /// Whether this error aborts the whole tick (arbiter, selector, and any
    /// config/connection failure in the reclaimer's initial fetch).
    pub fn is_fatal_to_tick(&self) -> bool {
        matches!(
            self,
            PgControlError::ConfigError(_)
                | PgControlError::ConnectionError(_)
                | PgControlError::AlertDispatchError(_)
                | PgControlError::LoggerError(_)
        )
    }

    /// Whether this error only aborts the single row being processed,
    /// letting the reclaimer continue to the next stale row.
    pub fn is_fatal_to_row(&self) -> bool {
        matches!(
            self,
            PgControlError::RecordNotFound(_)
                | PgControlError::IntegrityViolation { .. }
                | PgControlError::UnexpectedRowCount { .. }
        )
    }
}

/// Classification of error severity/kind for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgControlErrorKind {
    Config,
    Data,
    Connection,
    Internal,
}

impl fmt::Display for PgControlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgControlErrorKind::Config => write!(f, "CONFIG"),
            PgControlErrorKind::Data => write!(f, "DATA"),
            PgControlErrorKind::Connection => write!(f, "CONNECTION"),
            PgControlErrorKind::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Redact a password-shaped field before it is embedded in any error or log
/// payload. Callers pass the raw connection-config map; this never returns
/// the real password.
pub fn redact_password(_password: &str) -> &'static str {
    REDACTED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert_eq!(
            PgControlError::ConfigError("x".into()).kind(),
            PgControlErrorKind::Config
        );
        assert_eq!(
            PgControlError::RecordNotFound("x".into()).kind(),
            PgControlErrorKind::Data
        );
        assert_eq!(
            PgControlError::ConnectionError("x".into()).kind(),
            PgControlErrorKind::Connection
        );
        assert_eq!(
            PgControlError::InternalError("x".into()).kind(),
            PgControlErrorKind::Internal
        );
    }

    #[test]
    fn test_fatal_to_tick() {
        assert!(PgControlError::ConfigError("x".into()).is_fatal_to_tick());
        assert!(PgControlError::ConnectionError("x".into()).is_fatal_to_tick());
        assert!(PgControlError::AlertDispatchError("x".into()).is_fatal_to_tick());
        assert!(!PgControlError::RecordNotFound("x".into()).is_fatal_to_tick());
    }

    #[test]
    fn test_fatal_to_row() {
        assert!(PgControlError::RecordNotFound("x".into()).is_fatal_to_row());
        assert!(
            PgControlError::IntegrityViolation {
                pipeline_id: "x".into(),
                reason: "dup".into()
            }
            .is_fatal_to_row()
        );
        assert!(!PgControlError::ConfigError("x".into()).is_fatal_to_row());
    }

    #[test]
    fn test_redact_password_never_leaks() {
        assert_eq!(redact_password("hunter2"), REDACTED);
        assert_ne!(redact_password("hunter2"), "hunter2");
    }
}
