//! Configuration for [`SqliteService`](crate::service::SqliteService).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::schema::Schema;

/// Path used to request an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// SQLite service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Path to the SQLite database file, or `:memory:`
    pub db_path: String,
    /// Tables created (if missing) when the service opens
    #[serde(default)]
    pub schema: Schema,
    /// How long to wait on a locked database before failing
    #[serde(default)]
    pub busy_timeout: Option<Duration>,
}

impl SqliteConfig {
    /// Create a new SQLite config with path and schema
    pub fn new(db_path: impl Into<String>, schema: Schema) -> Self {
        Self {
            db_path: db_path.into(),
            schema,
            busy_timeout: None,
        }
    }

    /// Config for a private in-memory database.
    pub fn in_memory(schema: Schema) -> Self {
        Self::new(IN_MEMORY, schema)
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path == IN_MEMORY
    }
}
