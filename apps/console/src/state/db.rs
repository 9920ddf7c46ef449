//! # Database State
//!
//! Wraps the `Database` handle for use in console commands.
//!
//! ## Thread Safety
//! The `Database` from `opsdesk-db` holds a `SqlitePool`, which is
//! thread-safe. Commands from several sessions can run concurrently
//! without explicit locking; SQLite serializes the writers.

use opsdesk_db::{Database, DbConfig, DbResult};
use tracing::info;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Opens (and migrates) the database described by `config`.
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        let db = Database::new(config).await?;
        info!("Database connected and migrations applied");
        Ok(DbState::new(db))
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let orders = db_state.inner().orders().list().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
