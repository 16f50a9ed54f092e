//! Drive store: the typed gateway to the drive table.
//!
//! `replace_row` is the core persistence operation — before-image capture,
//! a delete-then-insert transaction with strict affected-row-count checks,
//! and rollback on any failure — mirroring the original's
//! `delete_old_in_process_record_and_insert_new_pending_record`.

use std::collections::HashMap;
use std::sync::Mutex;

use postgres::{Client, NoTls};

use crate::config::PipelineConfig;
use crate::error::PgControlError;
use crate::model::{PhaseBlock, PhaseStatus, PipelineStatus, Quadruple, WorkUnitRow, PHASES};

/// Typed gateway to the drive table. Object-safe and blocking: a tick is
/// synchronous end to end, so there is no async boundary to cross here.
pub trait DriveStore {
    fn fetch_in_process(&self, cfg: &PipelineConfig) -> Result<Vec<WorkUnitRow>, PgControlError>;

    fn fetch_admissible_pending(
        &self,
        cfg: &PipelineConfig,
        max_accepted_time: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<WorkUnitRow>, PgControlError>;

    fn replace_row(
        &self,
        original: &WorkUnitRow,
        updated: &WorkUnitRow,
        cfg: &PipelineConfig,
    ) -> Result<(), PgControlError>;

    fn delete_one(&self, pipeline_id: &str, cfg: &PipelineConfig) -> Result<(), PgControlError>;

    fn insert_one(&self, record: &WorkUnitRow, cfg: &PipelineConfig) -> Result<(), PgControlError>;
}

/// Precondition check shared by `replace_row` implementations: both records
/// must carry the same non-empty `pipeline_id`.
fn check_replace_preconditions(original: &WorkUnitRow, updated: &WorkUnitRow) -> Result<(), PgControlError> {
    if original.pipeline_id.trim().is_empty() || updated.pipeline_id.trim().is_empty() {
        return Err(PgControlError::ConfigError("pipeline_id must be non-empty for replace_row".to_string()));
    }
    if original.pipeline_id != updated.pipeline_id {
        return Err(PgControlError::ConfigError(format!(
            "replace_row pipeline_id mismatch: original={}, updated={}",
            original.pipeline_id, updated.pipeline_id
        )));
    }
    Ok(())
}

// ── Warehouse-backed implementation ─────────────────────────────────────

/// Production `DriveStore` backed by a blocking `postgres::Client`. Models
/// the analytical warehouse (reached via `sf_drive_config`) as a
/// Postgres-wire-compatible endpoint, per the connection settings the
/// original Snowflake connector used (account/user/password/warehouse/
/// database/schema).
pub struct WarehouseDriveStore {
    client: Mutex<Client>,
}

impl WarehouseDriveStore {
    pub fn connect(cfg: &PipelineConfig) -> Result<WarehouseDriveStore, PgControlError> {
        let drive = &cfg.sf_drive_config;
        let conn_str = format!(
            "host={} user={} password={} dbname={} options='--search_path={}'",
            drive.account, drive.user, drive.password, drive.database, drive.schema
        );
        let client = Client::connect(&conn_str, NoTls).map_err(|e| {
            PgControlError::ConnectionError(format!(
                "cannot connect to warehouse {}: {e} (config: {:?})",
                drive.table,
                drive.redacted()
            ))
        })?;
        Ok(WarehouseDriveStore {
            client: Mutex::new(client),
        })
    }
}

impl DriveStore for WarehouseDriveStore {
    fn fetch_in_process(&self, cfg: &PipelineConfig) -> Result<Vec<WorkUnitRow>, PgControlError> {
        let mut client = self.client.lock().expect("drive client mutex poisoned");
        let table = &cfg.sf_drive_config.table;
        let query = format!(
            "SELECT * FROM {table} WHERE PIPELINE_STATUS = 'IN_PROCESS' \
             AND CONTINUITY_CHECK_PERFORMED = 'YES' AND CAN_FETCH_HISTORICAL_DATA = 'YES' \
             AND PIPELINE_NAME = $1 AND SOURCE_NAME = $2 AND SOURCE_CATEGORY = $3 AND SOURCE_SUB_TYPE = $4 \
             ORDER BY QUERY_WINDOW_START_TIME ASC"
        );
        let rows = client
            .query(
                &query,
                &[
                    &cfg.pipeline_name,
                    &cfg.source_name,
                    &cfg.source_category,
                    &cfg.source_sub_type,
                ],
            )
            .map_err(|e| PgControlError::ConnectionError(format!("fetch_in_process failed: {e}")))?;
        rows.iter().map(row_to_work_unit).collect()
    }

    fn fetch_admissible_pending(
        &self,
        cfg: &PipelineConfig,
        max_accepted_time: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<WorkUnitRow>, PgControlError> {
        let mut client = self.client.lock().expect("drive client mutex poisoned");
        let table = &cfg.sf_drive_config.table;
        let query = format!(
            "SELECT * FROM {table} WHERE PIPELINE_STATUS = 'PENDING' \
             AND CONTINUITY_CHECK_PERFORMED = 'YES' AND CAN_FETCH_HISTORICAL_DATA = 'YES' \
             AND PIPELINE_NAME = $1 AND SOURCE_NAME = $2 AND SOURCE_CATEGORY = $3 AND SOURCE_SUB_TYPE = $4 \
             AND QUERY_WINDOW_START_TIME <= $5 \
             ORDER BY QUERY_WINDOW_START_TIME ASC LIMIT $6"
        );
        let rows = client
            .query(
                &query,
                &[
                    &cfg.pipeline_name,
                    &cfg.source_name,
                    &cfg.source_category,
                    &cfg.source_sub_type,
                    &max_accepted_time,
                    &(cfg.max_pending_records as i64),
                ],
            )
            .map_err(|e| PgControlError::ConnectionError(format!("fetch_admissible_pending failed: {e}")))?;
        rows.iter().map(row_to_work_unit).collect()
    }

    fn replace_row(
        &self,
        original: &WorkUnitRow,
        updated: &WorkUnitRow,
        cfg: &PipelineConfig,
    ) -> Result<(), PgControlError> {
        check_replace_preconditions(original, updated)?;
        let pipeline_id = &original.pipeline_id;
        let table = &cfg.sf_drive_config.table;

        tracing::info!(event = "DELETE_INSERT_TRANSACTION_START", pipeline_id = %pipeline_id);

        let mut client = self.client.lock().expect("drive client mutex poisoned");
        let mut tx = client
            .transaction()
            .map_err(|e| PgControlError::ConnectionError(format!("cannot open transaction: {e}")))?;

        let before_rows = tx
            .query(&format!("SELECT * FROM {table} WHERE PIPELINE_ID = $1"), &[pipeline_id])
            .map_err(|e| PgControlError::ConnectionError(format!("before-image select failed: {e}")))?;

        match before_rows.len() {
            0 => return Err(PgControlError::RecordNotFound(pipeline_id.clone())),
            1 => {
                let before = row_to_work_unit(&before_rows[0])?;
                tracing::info!(event = "record-before-delete", pipeline_id = %pipeline_id, record = ?before);
            }
            n => {
                return Err(PgControlError::IntegrityViolation {
                    pipeline_id: pipeline_id.clone(),
                    reason: format!("expected exactly 1 row, found {n} duplicates"),
                });
            }
        }

        let deleted = tx
            .execute(&format!("DELETE FROM {table} WHERE PIPELINE_ID = $1"), &[pipeline_id])
            .map_err(|e| PgControlError::ConnectionError(format!("delete failed: {e}")))?;
        if deleted != 1 {
            let _ = tx.rollback();
            tracing::warn!(event = "DELETE_INSERT_TRANSACTION_ROLLBACK", pipeline_id = %pipeline_id, step = "delete");
            return Err(PgControlError::UnexpectedRowCount {
                pipeline_id: pipeline_id.clone(),
                expected: 1,
                actual: deleted,
            });
        }

        let inserted = insert_within_tx(&mut tx, table, updated)?;
        if inserted != 1 {
            let _ = tx.rollback();
            tracing::warn!(event = "DELETE_INSERT_TRANSACTION_ROLLBACK", pipeline_id = %pipeline_id, step = "insert");
            return Err(PgControlError::UnexpectedRowCount {
                pipeline_id: pipeline_id.clone(),
                expected: 1,
                actual: inserted,
            });
        }

        tx.commit()
            .map_err(|e| PgControlError::ConnectionError(format!("commit failed: {e}")))?;

        tracing::info!(event = "DELETE_INSERT_TRANSACTION_SUCCESS", pipeline_id = %pipeline_id);
        Ok(())
    }

    fn delete_one(&self, pipeline_id: &str, cfg: &PipelineConfig) -> Result<(), PgControlError> {
        let mut client = self.client.lock().expect("drive client mutex poisoned");
        let table = &cfg.sf_drive_config.table;
        let deleted = client
            .execute(&format!("DELETE FROM {table} WHERE PIPELINE_ID = $1"), &[&pipeline_id])
            .map_err(|e| PgControlError::ConnectionError(format!("delete_one failed: {e}")))?;
        if deleted != 1 {
            return Err(PgControlError::UnexpectedRowCount {
                pipeline_id: pipeline_id.to_string(),
                expected: 1,
                actual: deleted,
            });
        }
        Ok(())
    }

    fn insert_one(&self, record: &WorkUnitRow, cfg: &PipelineConfig) -> Result<(), PgControlError> {
        let mut client = self.client.lock().expect("drive client mutex poisoned");
        let mut tx = client
            .transaction()
            .map_err(|e| PgControlError::ConnectionError(format!("cannot open transaction: {e}")))?;
        let inserted = insert_within_tx(&mut tx, &cfg.sf_drive_config.table, record)?;
        if inserted != 1 {
            let _ = tx.rollback();
            return Err(PgControlError::UnexpectedRowCount {
                pipeline_id: record.pipeline_id.clone(),
                expected: 1,
                actual: inserted,
            });
        }
        tx.commit()
            .map_err(|e| PgControlError::ConnectionError(format!("commit failed: {e}")))?;
        Ok(())
    }
}

fn insert_within_tx(
    tx: &mut postgres::Transaction<'_>,
    table: &str,
    record: &WorkUnitRow,
) -> Result<u64, PgControlError> {
    let columns = record.columns();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    let query = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    let values = record_to_sql_values(record);
    let params: Vec<&(dyn postgres::types::ToSql + Sync)> = values.iter().map(|v| v as &(dyn postgres::types::ToSql + Sync)).collect();
    tx.execute(&query, &params)
        .map_err(|e| PgControlError::ConnectionError(format!("insert failed: {e}")))
}

/// A value bound by column name rather than position; translated to a
/// positional `$N` slot at execution time so a caller never has to track
/// parameter ordinals by hand.
#[derive(Debug)]
enum SqlValue {
    Text(String),
    OptText(Option<String>),
    Bool(bool),
    Int(i64),
    Timestamp(chrono::DateTime<chrono::Utc>),
    OptTimestamp(Option<chrono::DateTime<chrono::Utc>>),
}

impl postgres::types::ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &postgres::types::Type,
        out: &mut bytes::BytesMut,
    ) -> Result<postgres::types::IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            SqlValue::Text(s) => s.to_sql(ty, out),
            SqlValue::OptText(s) => s.to_sql(ty, out),
            SqlValue::Bool(b) => b.to_sql(ty, out),
            SqlValue::Int(i) => i.to_sql(ty, out),
            SqlValue::Timestamp(t) => t.to_sql(ty, out),
            SqlValue::OptTimestamp(t) => t.to_sql(ty, out),
        }
    }

    fn accepts(_ty: &postgres::types::Type) -> bool {
        true
    }

    postgres::types::to_sql_checked!();
}

fn record_to_sql_values(record: &WorkUnitRow) -> Vec<SqlValue> {
    let mut values = vec![
        SqlValue::Text(record.pipeline_id.clone()),
        SqlValue::Text(record.quadruple.pipeline_name.clone()),
        SqlValue::Text(record.quadruple.source_name.clone()),
        SqlValue::Text(record.quadruple.source_category.clone()),
        SqlValue::Text(record.quadruple.source_sub_type.clone()),
        SqlValue::Text(record.query_window_start_time.clone()),
        SqlValue::Text(record.query_window_end_time.clone()),
        SqlValue::Text(record.pipeline_status.as_str().to_string()),
        SqlValue::OptText(record.pipeline_start_time.clone()),
        SqlValue::OptText(record.pipeline_end_time.clone()),
        SqlValue::OptText(record.pipeline_duration.clone()),
        SqlValue::OptText(record.pipeline_exp_duration.clone()),
        SqlValue::Int(record.retry_attempt_number),
        SqlValue::Text(yes_no(record.continuity_check_performed).to_string()),
        SqlValue::Text(yes_no(record.can_fetch_historical_data).to_string()),
    ];
    for phase in PHASES {
        let block = record.phase(phase);
        values.push(SqlValue::Bool(block.enabled));
        values.push(SqlValue::OptText(block.status.map(|s| s.as_str().to_string())));
        values.push(SqlValue::OptText(block.start_ts.clone()));
        values.push(SqlValue::OptText(block.end_ts.clone()));
        values.push(SqlValue::OptText(block.duration.clone()));
    }
    values
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "YES"
    } else {
        "NO"
    }
}

fn row_to_work_unit(row: &postgres::Row) -> Result<WorkUnitRow, PgControlError> {
    let get_opt = |name: &str| -> Option<String> { row.try_get::<_, Option<String>>(name).ok().flatten() };
    let get_str = |name: &str| -> Result<String, PgControlError> {
        row.try_get::<_, String>(name)
            .map_err(|e| PgControlError::InternalError(format!("missing column {name}: {e}")))
    };

    let mut phases_vec = Vec::with_capacity(5);
    for phase in PHASES {
        let cols = crate::model::phase_columns(phase);
        phases_vec.push(PhaseBlock {
            enabled: row.try_get::<_, bool>(cols[0]).unwrap_or(false),
            status: get_opt(cols[1]).and_then(|s| PhaseStatus::from_str(&s)),
            start_ts: get_opt(cols[2]),
            end_ts: get_opt(cols[3]),
            duration: get_opt(cols[4]),
        });
    }
    let phases: [PhaseBlock; 5] = phases_vec
        .try_into()
        .map_err(|_| PgControlError::InternalError("phase column count mismatch".to_string()))?;

    Ok(WorkUnitRow {
        pipeline_id: get_str("PIPELINE_ID")?,
        quadruple: Quadruple {
            pipeline_name: get_str("PIPELINE_NAME")?,
            source_name: get_str("SOURCE_NAME")?,
            source_category: get_str("SOURCE_CATEGORY")?,
            source_sub_type: get_str("SOURCE_SUB_TYPE")?,
        },
        query_window_start_time: get_str("QUERY_WINDOW_START_TIME")?,
        query_window_end_time: get_str("QUERY_WINDOW_END_TIME")?,
        pipeline_status: PipelineStatus::from_str(&get_str("PIPELINE_STATUS")?)
            .ok_or_else(|| PgControlError::InternalError("unrecognized PIPELINE_STATUS".to_string()))?,
        pipeline_start_time: get_opt("PIPELINE_START_TIME"),
        pipeline_end_time: get_opt("PIPELINE_END_TIME"),
        pipeline_duration: get_opt("PIPELINE_DURATION"),
        pipeline_exp_duration: get_opt("PIPELINE_EXP_DURATION"),
        retry_attempt_number: row.try_get::<_, i64>("RETRY_ATTEMPT_NUMBER").unwrap_or(0),
        continuity_check_performed: get_opt("CONTINUITY_CHECK_PERFORMED").as_deref() == Some("YES"),
        can_fetch_historical_data: get_opt("CAN_FETCH_HISTORICAL_DATA").as_deref() == Some("YES"),
        phases,
    })
}

// ── In-memory implementation (tests) ────────────────────────────────────

/// Test-only `DriveStore`: honors the same atomicity and row-count
/// contracts as [`WarehouseDriveStore`] via a mutex-guarded map, without a
/// network dependency.
pub struct InMemoryDriveStore {
    rows: Mutex<HashMap<String, WorkUnitRow>>,
    before_images: Mutex<Vec<WorkUnitRow>>,
}

impl InMemoryDriveStore {
    pub fn new() -> InMemoryDriveStore {
        InMemoryDriveStore {
            rows: Mutex::new(HashMap::new()),
            before_images: Mutex::new(Vec::new()),
        }
    }

    pub fn seed(&self, row: WorkUnitRow) {
        self.rows.lock().expect("poisoned").insert(row.pipeline_id.clone(), row);
    }

    pub fn before_images(&self) -> Vec<WorkUnitRow> {
        self.before_images.lock().expect("poisoned").clone()
    }

    pub fn get(&self, pipeline_id: &str) -> Option<WorkUnitRow> {
        self.rows.lock().expect("poisoned").get(pipeline_id).cloned()
    }
}

impl Default for InMemoryDriveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveStore for InMemoryDriveStore {
    fn fetch_in_process(&self, cfg: &PipelineConfig) -> Result<Vec<WorkUnitRow>, PgControlError> {
        let rows = self.rows.lock().expect("poisoned");
        let mut matched: Vec<WorkUnitRow> = rows
            .values()
            .filter(|r| {
                r.pipeline_status == PipelineStatus::InProcess
                    && r.is_gated_in()
                    && r.quadruple.pipeline_name == cfg.pipeline_name
                    && r.quadruple.source_name == cfg.source_name
                    && r.quadruple.source_category == cfg.source_category
                    && r.quadruple.source_sub_type == cfg.source_sub_type
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.query_window_start_time.cmp(&b.query_window_start_time));
        Ok(matched)
    }

    fn fetch_admissible_pending(
        &self,
        cfg: &PipelineConfig,
        max_accepted_time: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<WorkUnitRow>, PgControlError> {
        let rows = self.rows.lock().expect("poisoned");
        let mut matched: Vec<WorkUnitRow> = rows
            .values()
            .filter(|r| {
                r.pipeline_status == PipelineStatus::Pending
                    && r.is_gated_in()
                    && r.quadruple.pipeline_name == cfg.pipeline_name
                    && r.quadruple.source_name == cfg.source_name
                    && r.quadruple.source_category == cfg.source_category
                    && r.quadruple.source_sub_type == cfg.source_sub_type
                    && r.query_window_start_time.parse::<chrono::DateTime<chrono::Utc>>().is_ok_and(|t| t <= max_accepted_time)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.query_window_start_time.cmp(&b.query_window_start_time));
        matched.truncate(cfg.max_pending_records as usize);
        Ok(matched)
    }

    fn replace_row(
        &self,
        original: &WorkUnitRow,
        updated: &WorkUnitRow,
        _cfg: &PipelineConfig,
    ) -> Result<(), PgControlError> {
        check_replace_preconditions(original, updated)?;
        let pipeline_id = &original.pipeline_id;

        let mut rows = self.rows.lock().expect("poisoned");
        let before = match rows.get(pipeline_id) {
            None => return Err(PgControlError::RecordNotFound(pipeline_id.clone())),
            Some(r) => r.clone(),
        };
        self.before_images.lock().expect("poisoned").push(before);

        // Delete-then-insert, observed atomically under the single mutex guard.
        rows.remove(pipeline_id);
        rows.insert(updated.pipeline_id.clone(), updated.clone());
        Ok(())
    }

    fn delete_one(&self, pipeline_id: &str, _cfg: &PipelineConfig) -> Result<(), PgControlError> {
        let mut rows = self.rows.lock().expect("poisoned");
        match rows.remove(pipeline_id) {
            Some(_) => Ok(()),
            None => Err(PgControlError::UnexpectedRowCount {
                pipeline_id: pipeline_id.to_string(),
                expected: 1,
                actual: 0,
            }),
        }
    }

    fn insert_one(&self, record: &WorkUnitRow, _cfg: &PipelineConfig) -> Result<(), PgControlError> {
        let mut rows = self.rows.lock().expect("poisoned");
        rows.insert(record.pipeline_id.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PhaseBlock, Quadruple};

    fn blank_phase() -> PhaseBlock {
        PhaseBlock {
            enabled: true,
            status: None,
            start_ts: None,
            end_ts: None,
            duration: None,
        }
    }

    fn row(id: &str, status: PipelineStatus, window_start: &str) -> WorkUnitRow {
        WorkUnitRow {
            pipeline_id: id.into(),
            quadruple: Quadruple {
                pipeline_name: "pn".into(),
                source_name: "sn".into(),
                source_category: "sc".into(),
                source_sub_type: "st".into(),
            },
            query_window_start_time: window_start.into(),
            query_window_end_time: "2025-01-01T01:00:00Z".into(),
            pipeline_status: status,
            pipeline_start_time: None,
            pipeline_end_time: None,
            pipeline_duration: None,
            pipeline_exp_duration: Some("1h".into()),
            retry_attempt_number: 0,
            continuity_check_performed: true,
            can_fetch_historical_data: true,
            phases: [
                blank_phase(),
                blank_phase(),
                blank_phase(),
                blank_phase(),
                blank_phase(),
            ],
        }
    }

    fn cfg() -> PipelineConfig {
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
            sf_drive_config: crate::config::DriveConfig {
                account: "a".into(),
                user: "u".into(),
                password: "p".into(),
                warehouse: "w".into(),
                database: "d".into(),
                schema: "s".into(),
                table: "t".into(),
            },
        }
    }

    #[test]
    fn replace_row_is_atomic_and_single_copy() {
        let store = InMemoryDriveStore::new();
        store.seed(row("p1", PipelineStatus::InProcess, "2025-01-01T00:00:00Z"));

        let original = store.get("p1").unwrap();
        let mut updated = original.clone();
        updated.pipeline_status = PipelineStatus::Pending;

        store.replace_row(&original, &updated, &cfg()).unwrap();

        let after = store.get("p1").unwrap();
        assert_eq!(after.pipeline_status, PipelineStatus::Pending);
        assert_eq!(store.before_images().len(), 1);
    }

    #[test]
    fn replace_row_missing_record_fails() {
        let store = InMemoryDriveStore::new();
        let ghost = row("nope", PipelineStatus::InProcess, "2025-01-01T00:00:00Z");
        let err = store.replace_row(&ghost, &ghost, &cfg()).unwrap_err();
        assert!(matches!(err, PgControlError::RecordNotFound(_)));
    }

    #[test]
    fn s6_mismatched_pipeline_ids_fail_before_touching_storage() {
        let store = InMemoryDriveStore::new();
        store.seed(row("A", PipelineStatus::InProcess, "2025-01-01T00:00:00Z"));
        let original = row("A", PipelineStatus::InProcess, "2025-01-01T00:00:00Z");
        let updated = row("B", PipelineStatus::Pending, "2025-01-01T00:00:00Z");

        let err = store.replace_row(&original, &updated, &cfg()).unwrap_err();
        assert!(matches!(err, PgControlError::ConfigError(_)));
        assert!(store.get("A").is_some(), "original row must be untouched");
    }

    #[test]
    fn fetch_in_process_filters_by_status_and_quadruple() {
        let store = InMemoryDriveStore::new();
        store.seed(row("a", PipelineStatus::InProcess, "2025-01-01T00:00:00Z"));
        store.seed(row("b", PipelineStatus::Pending, "2025-01-01T00:00:00Z"));

        let in_process = store.fetch_in_process(&cfg()).unwrap();
        assert_eq!(in_process.len(), 1);
        assert_eq!(in_process[0].pipeline_id, "a");
    }

    #[test]
    fn fetch_in_process_orders_by_window_start_ascending() {
        let store = InMemoryDriveStore::new();
        store.seed(row("later", PipelineStatus::InProcess, "2025-01-02T00:00:00Z"));
        store.seed(row("earlier", PipelineStatus::InProcess, "2025-01-01T00:00:00Z"));

        let rows = store.fetch_in_process(&cfg()).unwrap();
        assert_eq!(rows[0].pipeline_id, "earlier");
        assert_eq!(rows[1].pipeline_id, "later");
    }
}
