//! The serialized gateway to the backing SQLite store.
//!
//! One connection per process, guarded by one async mutex: exactly one
//! statement executes at a time, system-wide, regardless of how many
//! request tasks race for it. Statements run in autocommit mode, so a
//! mutation is committed before the guard is released and no caller ever
//! observes a partially applied prior operation. This trades throughput
//! for correctness and is deliberate.

use crate::error::AppError;
use crate::sql::{row_to_json, SqliteBindValue};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome of a mutating statement.
#[derive(Clone, Copy, Debug)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_rowid: i64,
}

/// Cloneable handle to the process-wide store. Constructed once at startup
/// and passed by injection into every model binding; clones share the same
/// connection and the same exclusive-access guard.
#[derive(Clone)]
pub struct RecordStore {
    conn: Arc<Mutex<SqliteConnection>>,
}

impl RecordStore {
    /// Open the store at `database_url` (e.g. `sqlite:app.db` or
    /// `sqlite::memory:`), creating the database file if absent.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(AppError::Store)?
            .create_if_missing(true);
        let conn = opts.connect().await.map_err(AppError::Store)?;
        tracing::info!(url = %database_url, "record store connected");
        Ok(RecordStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a statement that returns rows; the whole result set is
    /// materialized as JSON objects keyed by column name.
    pub async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %sql, params = ?params, "query");
        let mut conn = self.conn.lock().await;
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(SqliteBindValue::from_json(p));
        }
        let rows = query.fetch_all(&mut *conn).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    /// Run a mutating statement. Failures (syntax, constraint violation,
    /// store unavailable) propagate unmodified; nothing is retried.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecResult, AppError> {
        tracing::debug!(sql = %sql, params = ?params, "execute");
        let mut conn = self.conn.lock().await;
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(SqliteBindValue::from_json(p));
        }
        let done = query.execute(&mut *conn).await?;
        Ok(ExecResult {
            rows_affected: done.rows_affected(),
            last_insert_rowid: done.last_insert_rowid(),
        })
    }
}
