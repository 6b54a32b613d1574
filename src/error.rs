//! Error types for database operations.
//!
//! There are exactly two failure kinds: the file could not be opened, or the
//! engine rejected a statement. Both carry the engine's own diagnostic.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

pub(crate) const CREATE_FAILED: &str = "Failed to create database";
pub(crate) const CONNECT_FAILED: &str = "Failed to connect to database";
pub(crate) const EXECUTE_FAILED: &str = "Failed to execute SQL code";

#[derive(Error, Debug)]
pub enum DbError {
    #[error("{message}: {source}")]
    Connection {
        message: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{message}: {source}")]
    Execution {
        message: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Execution,
}

impl DbError {
    pub(crate) fn connection(message: &'static str, source: rusqlite::Error) -> Self {
        DbError::Connection { message, source }
    }

    pub(crate) fn execution(source: rusqlite::Error) -> Self {
        DbError::Execution {
            message: EXECUTE_FAILED,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::Connection { .. } => ErrorKind::Connection,
            DbError::Execution { .. } => ErrorKind::Execution,
        }
    }

    /// Emit the `[ERROR] <phase>: <engine text>` diagnostic line.
    pub(crate) fn log(&self) {
        tracing::error!(target: "dblib", "[ERROR] {}", self);
    }
}
