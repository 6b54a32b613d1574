//! Per-call SQLite database handle.
//!
//! Every operation opens the file, runs the SQL built from raw caller
//! fragments, and closes the connection again before returning. Like
//! `sqlite3_exec`, every statement in the text is run. Failures are logged and
//! surface only as `false` or an empty report.

use rusqlite::{Batch, Connection};
use std::path::{Path, PathBuf};

use crate::error::{DbError, Result, CONNECT_FAILED, CREATE_FAILED};
use crate::report::Report;
use crate::sql;

/// Handle to a single SQLite file.
///
/// No connection is held between calls. The handle is deliberately neither
/// `Clone` nor `Copy`.
#[derive(Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Open (creating if absent) the file at `path` to check that it is usable,
    /// then close it again.
    ///
    /// Failure is logged and otherwise silent: a handle is always returned and
    /// later calls on it fail the same way.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match Connection::open(&path) {
            Ok(conn) => release(conn),
            Err(e) => DbError::connection(CREATE_FAILED, e).log(),
        }
        Self { path }
    }

    /// Path the handle was constructed with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// SQL: CREATE TABLE IF NOT EXISTS {table}({definition});
    pub fn create_table(&self, table: &str, definition: &str) -> bool {
        self.execute_logged(&sql::create_table_sql(table, definition))
    }

    /// SQL: INSERT INTO {table} ({columns}) VALUES ({values});
    ///
    /// `values` must already be quoted.
    pub fn insert_data(&self, table: &str, columns: &str, values: &str) -> bool {
        self.execute_logged(&sql::insert_sql(table, columns, values))
    }

    /// SQL: UPDATE {table} SET {set_values} WHERE {condition};
    pub fn update_data(&self, table: &str, set_values: &str, condition: &str) -> bool {
        self.execute_logged(&sql::update_sql(table, set_values, condition))
    }

    /// SQL: DELETE FROM {table} WHERE {condition};
    pub fn delete_data(&self, table: &str, condition: &str) -> bool {
        self.execute_logged(&sql::delete_sql(table, condition))
    }

    /// SQL: SELECT {columns} FROM {table} [WHERE {condition}];
    ///
    /// Returns the result report, or an empty string on failure. An empty
    /// string is also what a query matching no rows returns.
    pub fn select_data(&self, table: &str, columns: &str, condition: &str) -> String {
        self.query_report(&sql::select_sql(table, columns, condition))
            .unwrap_or_else(|e| {
                e.log();
                String::new()
            })
    }

    /// SQL: SELECT * FROM {table};
    ///
    /// The rows are read and rendered, but the report is discarded and an
    /// empty string is always returned. Callers that need the data should use
    /// [`Database::select_data`] with `*`, or
    /// [`SqliteService::select_all`](crate::service::SqliteService::select_all).
    pub fn select_all_data(&self, table: &str) -> String {
        match self.query_report(&sql::select_all_sql(table)) {
            Ok(report) => {
                tracing::debug!(table, bytes = report.len(), "select_all_data report discarded");
            }
            Err(e) => e.log(),
        }
        String::new()
    }

    /// Run `sql` on a fresh connection. All statements in `sql` are executed
    /// and any rows they produce are ignored.
    pub fn execute(&self, sql: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(sql).map_err(DbError::execution)?;
        tracing::debug!(sql, "executed");
        release(conn);
        Ok(())
    }

    /// Run every statement in `sql` on a fresh connection, rendering the rows
    /// of each into one report.
    pub fn query_report(&self, sql: &str) -> Result<String> {
        let conn = self.connect()?;
        let mut report = Report::new();
        {
            let mut batch = Batch::new(&conn, sql);
            while let Some(mut stmt) = batch.next().map_err(DbError::execution)? {
                report.append(&mut stmt, [])?;
            }
        }
        tracing::debug!(sql, rows = report.rows(), "queried");
        release(conn);
        Ok(report.into_string())
    }

    fn execute_logged(&self, sql: &str) -> bool {
        match self.execute(sql) {
            Ok(()) => true,
            Err(e) => {
                e.log();
                false
            }
        }
    }

    fn connect(&self) -> Result<Connection> {
        tracing::trace!(path = %self.path.display(), "opening connection");
        Connection::open(&self.path).map_err(|e| DbError::connection(CONNECT_FAILED, e))
    }
}

/// Close a connection, logging rather than propagating a failed close. The
/// connection is dropped either way.
pub(crate) fn release(conn: Connection) {
    if let Err((_conn, e)) = conn.close() {
        tracing::warn!(error = %e, "failed to close connection");
    }
}
