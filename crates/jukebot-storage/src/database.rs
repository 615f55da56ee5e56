// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with schema setup and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use jukebot_core::JukebotError;
use tracing::debug;

/// The `command_invocations` schema, applied on open.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS command_invocations (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    scope_id TEXT NOT NULL,
    command TEXT NOT NULL,
    params TEXT NOT NULL,
    started_at TEXT NOT NULL,
    completed_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_invocations_scope ON command_invocations(scope_id);
CREATE INDEX IF NOT EXISTS idx_invocations_command ON command_invocations(command);
";

/// Convert a tokio-rusqlite error into JukebotError::Storage.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> JukebotError {
    JukebotError::Storage {
        source: Box::new(e),
    }
}

/// Single-writer database handle.
///
/// Wraps one `tokio_rusqlite::Connection`; all closure calls are serialized
/// on its background thread, which eliminates SQLITE_BUSY errors under
/// concurrent access.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub async fn open(path: &str) -> Result<Self, JukebotError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| JukebotError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.init().await?;
        debug!(path = path, "database opened");
        Ok(db)
    }

    /// Opens an in-memory database with the schema applied (tests).
    pub async fn open_in_memory() -> Result<Self, JukebotError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| JukebotError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> Result<(), JukebotError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// The underlying connection, for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}
