//! Long-lived SQLite handle.
//!
//! The connection is acquired once in [`SqliteService::open`] and released
//! when the service is dropped or closed. Statements take bound parameters.

use rusqlite::{Batch, Connection, Statement};

use crate::config::SqliteConfig;
use crate::error::{DbError, Result, CONNECT_FAILED};
use crate::query::CrudOperation;
use crate::report::Report;
use crate::schema::{Schema, TableDefinition};
use crate::sql::quote_ident;
use crate::value::SqlQuery;

/// Result of a CRUD operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrudOutcome {
    /// Rows changed by a create, update or delete.
    Affected(usize),
    /// Rendered result of a read.
    Report(String),
}

/// SQLite handle that owns one connection for its whole lifetime.
#[derive(Debug)]
pub struct SqliteService {
    config: SqliteConfig,
    connection: Connection,
}

impl SqliteService {
    /// Open the configured database and apply its schema.
    pub fn open(config: SqliteConfig) -> Result<Self> {
        tracing::info!(path = %config.db_path, "opening sqlite service");
        let connection = if config.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&config.db_path)
        }
        .map_err(|e| DbError::connection(CONNECT_FAILED, e))?;

        if let Some(timeout) = config.busy_timeout {
            connection
                .busy_timeout(timeout)
                .map_err(|e| DbError::connection(CONNECT_FAILED, e))?;
        }

        let service = Self { config, connection };
        service.initialize_schema(&service.config.schema)?;
        Ok(service)
    }

    /// Configured database path, `:memory:` included.
    pub fn path(&self) -> &str {
        &self.config.db_path
    }

    /// Configuration the service was opened with.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Create every table and index in `schema` that does not exist yet.
    pub fn initialize_schema(&self, schema: &Schema) -> Result<()> {
        for table in &schema.tables {
            self.create_table(table)?;
        }
        Ok(())
    }

    /// Create `table` and its indexes if they do not exist yet.
    pub fn create_table(&self, table: &TableDefinition) -> Result<()> {
        for statement in table.to_sql() {
            self.connection
                .execute_batch(&statement)
                .map_err(DbError::execution)?;
        }
        tracing::debug!(table = %table.name, "table ensured");
        Ok(())
    }

    /// Run a single statement with its bound parameters, returning the number
    /// of rows changed.
    pub fn execute_sql(&self, query: &SqlQuery) -> Result<usize> {
        let mut stmt = self.prepare_single(&query.statement)?;
        let changed = stmt
            .execute(query.params.as_named().as_slice())
            .map_err(DbError::execution)?;
        tracing::debug!(sql = %query.statement, changed, "executed");
        Ok(changed)
    }

    /// Run a single query with its bound parameters and render the rows.
    pub fn query_report(&self, query: &SqlQuery) -> Result<String> {
        let mut stmt = self.prepare_single(&query.statement)?;
        let report = Report::collect(&mut stmt, query.params.as_named().as_slice())?;
        tracing::debug!(sql = %query.statement, rows = report.rows(), "queried");
        Ok(report.into_string())
    }

    /// Perform a CRUD operation
    pub fn execute_crud(&self, op: &CrudOperation) -> Result<CrudOutcome> {
        let query = op.to_sql_query();
        match op {
            CrudOperation::Read(_) => self.query_report(&query).map(CrudOutcome::Report),
            _ => self.execute_sql(&query).map(CrudOutcome::Affected),
        }
    }

    /// Every row of `table` as a report. Unlike
    /// [`Database::select_all_data`](crate::sqlite::Database::select_all_data),
    /// the collected report is returned.
    pub fn select_all(&self, table: &str) -> Result<String> {
        self.query_report(&SqlQuery::new(&format!("SELECT * FROM {}", quote_ident(table))))
    }

    /// Prepare `sql`, refusing anything after the first statement: bound
    /// parameters belong to exactly one statement.
    fn prepare_single(&self, sql: &str) -> Result<Statement<'_>> {
        let mut batch = Batch::new(&self.connection, sql);
        let first = batch.next().map_err(DbError::execution)?;
        if batch.next().map_err(DbError::execution)?.is_some() {
            let err = DbError::execution(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some("multiple statements provided".to_string()),
            ));
            err.log();
            return Err(err);
        }
        match first {
            Some(stmt) => Ok(stmt),
            None => self.connection.prepare(sql).map_err(DbError::execution),
        }
    }

    /// Close the connection, reporting any error the engine raises on close.
    pub fn close(self) -> Result<()> {
        tracing::info!(path = %self.config.db_path, "closing sqlite service");
        self.connection
            .close()
            .map_err(|(_conn, e)| DbError::connection(CONNECT_FAILED, e))
    }
}
