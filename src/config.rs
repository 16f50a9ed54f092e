//! Typed, validated configuration: a TOML file with `PGCTL_`-prefixed
//! environment overrides, used in place of Postgres GUC variables since
//! this is a standalone process rather than a Postgres extension.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{redact_password, PgControlError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    pub account: String,
    pub user: String,
    pub password: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    pub table: String,
}

impl DriveConfig {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.account.trim().is_empty() {
            missing.push("account");
        }
        if self.user.trim().is_empty() {
            missing.push("user");
        }
        if self.password.trim().is_empty() {
            missing.push("password");
        }
        if self.warehouse.trim().is_empty() {
            missing.push("warehouse");
        }
        if self.database.trim().is_empty() {
            missing.push("database");
        }
        if self.schema.trim().is_empty() {
            missing.push("schema");
        }
        if self.table.trim().is_empty() {
            missing.push("table");
        }
        missing
    }

    /// A copy of this config with the password replaced by the redaction
    /// sentinel, safe to embed in error payloads or logs.
    pub fn redacted(&self) -> DriveConfig {
        DriveConfig {
            password: redact_password(&self.password).to_string(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub pipeline_name: String,
    pub source_name: String,
    pub source_category: String,
    pub source_sub_type: String,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    pub x_time_back: String,
    pub granularity: String,
    pub max_pending_records: u32,

    #[serde(default = "default_stale_threshold_factor")]
    pub stale_threshold_factor: f64,

    pub pipeline_exp_duration: String,

    pub dag_run_id: String,

    pub sf_drive_config: DriveConfig,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_stale_threshold_factor() -> f64 {
    3.0
}

impl PipelineConfig {
    /// Load configuration from a TOML file, then apply any `PGCTL_<FIELD>`
    /// environment overrides, then validate.
    pub fn load(path: &Path) -> Result<PipelineConfig, PgControlError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PgControlError::ConfigError(format!("cannot read {}: {e}", path.display())))?;
        let mut cfg: PipelineConfig = toml::from_str(&raw)
            .map_err(|e| PgControlError::ConfigError(format!("cannot parse {}: {e}", path.display())))?;
        cfg.apply_env_overrides();
        validate_config(&cfg)?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("PGCTL_PIPELINE_NAME") {
            self.pipeline_name = v;
        }
        if let Ok(v) = std::env::var("PGCTL_SOURCE_NAME") {
            self.source_name = v;
        }
        if let Ok(v) = std::env::var("PGCTL_SOURCE_CATEGORY") {
            self.source_category = v;
        }
        if let Ok(v) = std::env::var("PGCTL_SOURCE_SUB_TYPE") {
            self.source_sub_type = v;
        }
        if let Ok(v) = std::env::var("PGCTL_TIMEZONE") {
            self.timezone = v;
        }
        if let Ok(v) = std::env::var("PGCTL_X_TIME_BACK") {
            self.x_time_back = v;
        }
        if let Ok(v) = std::env::var("PGCTL_GRANULARITY") {
            self.granularity = v;
        }
        if let Ok(v) = std::env::var("PGCTL_MAX_PENDING_RECORDS") {
            if let Ok(n) = v.parse() {
                self.max_pending_records = n;
            }
        }
        if let Ok(v) = std::env::var("PGCTL_STALE_THRESHOLD_FACTOR") {
            if let Ok(n) = v.parse() {
                self.stale_threshold_factor = n;
            }
        }
        if let Ok(v) = std::env::var("PGCTL_DAG_RUN_ID") {
            self.dag_run_id = v;
        }
        if let Ok(v) = std::env::var("PGCTL_DRIVE_PASSWORD") {
            self.sf_drive_config.password = v;
        }
    }
}

/// Validate a loaded config: all required top-level fields plus the nested
/// drive config must be present and non-empty, and `dag_run_id` (consumed
/// by the arbiter) must be present too.
pub fn validate_config(cfg: &PipelineConfig) -> Result<(), PgControlError> {
    let mut missing = Vec::new();
    if cfg.pipeline_name.trim().is_empty() {
        missing.push("PIPELINE_NAME");
    }
    if cfg.source_name.trim().is_empty() {
        missing.push("SOURCE_NAME");
    }
    if cfg.source_category.trim().is_empty() {
        missing.push("SOURCE_CATEGORY");
    }
    if cfg.source_sub_type.trim().is_empty() {
        missing.push("SOURCE_SUB_TYPE");
    }
    if cfg.dag_run_id.trim().is_empty() {
        missing.push("dag_run_id");
    }
    if cfg.max_pending_records == 0 {
        missing.push("max_pending_records (must be > 0)");
    }

    let drive_missing = cfg.sf_drive_config.missing_fields();
    if !drive_missing.is_empty() {
        return Err(PgControlError::ConfigError(format!(
            "sf_drive_config missing fields: {}",
            drive_missing.join(", ")
        )));
    }

    if !missing.is_empty() {
        return Err(PgControlError::ConfigError(format!(
            "missing required config fields: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_drive() -> DriveConfig {
        DriveConfig {
            account: "acct".into(),
            user: "u".into(),
            password: "hunter2".into(),
            warehouse: "wh".into(),
            database: "db".into(),
            schema: "sch".into(),
            table: "tbl".into(),
        }
    }

    fn sample_config() -> PipelineConfig {
        PipelineConfig {
            pipeline_name: "pn".into(),
            source_name: "sn".into(),
            source_category: "sc".into(),
            source_sub_type: "st".into(),
            timezone: "UTC".into(),
            x_time_back: "1h".into(),
            granularity: "15m".into(),
            max_pending_records: 10,
            stale_threshold_factor: 3.0,
            pipeline_exp_duration: "1h".into(),
            dag_run_id: "d1".into(),
            sf_drive_config: sample_drive(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_config(&sample_config()).is_ok());
    }

    #[test]
    fn missing_dag_run_id_fails() {
        let mut cfg = sample_config();
        cfg.dag_run_id = "".into();
        let err = validate_config(&cfg).unwrap_err();
        assert!(matches!(err, PgControlError::ConfigError(_)));
    }

    #[test]
    fn missing_drive_password_fails() {
        let mut cfg = sample_config();
        cfg.sf_drive_config.password = "".into();
        let err = validate_config(&cfg).unwrap_err();
        assert!(matches!(err, PgControlError::ConfigError(_)));
    }

    #[test]
    fn redacted_drive_config_never_leaks_password() {
        let drive = sample_drive();
        let redacted = drive.redacted();
        assert_ne!(redacted.password, drive.password);
    }

    #[test]
    fn defaults_apply_when_omitted() {
        let toml_str = r#"
            pipeline_name = "pn"
            source_name = "sn"
            source_category = "sc"
            source_sub_type = "st"
            x_time_back = "1h"
            granularity = "15m"
            max_pending_records = 10
            pipeline_exp_duration = "1h"
            dag_run_id = "d1"

            [sf_drive_config]
            account = "acct"
            user = "u"
            password = "hunter2"
            warehouse = "wh"
            database = "db"
            schema = "sch"
            table = "tbl"
        "#;
        let cfg: PipelineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.timezone, "UTC");
        assert_eq!(cfg.stale_threshold_factor, 3.0);
    }
}
