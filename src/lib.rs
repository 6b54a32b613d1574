//! Minimal SQLite data-access wrapper.
//!
//! # Intention
//!
//! - [`Database`] builds SQL text from raw caller fragments and runs it on a
//!   connection opened and closed per call. Reads come back as a flat
//!   `column = value` report.
//! - [`SqliteService`] keeps one connection for its lifetime and binds every
//!   value as a parameter.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite access belongs here. The storage engine itself is rusqlite's
//!   bundled SQLite.
//! - No SQL parsing, validation or schema migrations.

pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod report;
pub mod schema;
pub mod service;
pub mod sql;
pub mod sqlite;
pub mod value;

pub use config::SqliteConfig;
pub use error::{DbError, ErrorKind, Result};
pub use query::{
    CreateOperation, CrudOperation, DeleteOperation, Query, QueryOperator, ReadOperation,
    UpdateOperation,
};
pub use schema::{
    ColumnConstraint, ColumnDefinition, DataType, DefaultValue, IndexDefinition, Schema,
    TableDefinition,
};
pub use service::{CrudOutcome, SqliteService};
pub use sqlite::Database;
pub use value::{Params, SqlQuery, Value};
