// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Invocation-record persistence.
//!
//! Each completed command invocation is written as one row in
//! `command_invocations`, with the parameter mapping serialized as a JSON
//! text column. The primary key backs the write-once contract: inserting
//! the same invocation id twice is an error.

use async_trait::async_trait;
use jukebot_core::types::InvocationRecord;
use jukebot_core::{JukebotError, RecordStore, ScopeId, UserId};
use rusqlite::params;
use tracing::info;

use crate::database::{Database, map_tr_err};

/// SQLite-backed [`RecordStore`].
pub struct SqliteRecordStore {
    db: Database,
}

impl SqliteRecordStore {
    /// Creates a store over an opened database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Fetches a saved record by invocation id.
    pub async fn get_invocation(
        &self,
        id: &str,
    ) -> Result<Option<InvocationRecord>, JukebotError> {
        let id = id.to_string();
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, scope_id, command, params, started_at, completed_at
                     FROM command_invocations WHERE id = ?1",
                )?;
                let result = stmt.query_row(params![id], |row| {
                    let params_json: String = row.get(4)?;
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        params_json,
                        row.get::<_, String>(5)?,
                        row.get::<_, Option<String>>(6)?,
                    ))
                });
                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(map_tr_err)?
            .map(
                |(id, user_id, scope_id, command, params_json, started_at, completed_at)| {
                    let params = serde_json::from_str(&params_json).map_err(|e| {
                        JukebotError::Storage {
                            source: Box::new(e),
                        }
                    })?;
                    Ok(InvocationRecord {
                        id,
                        user_id: UserId(user_id),
                        scope_id: ScopeId(scope_id),
                        command,
                        params,
                        started_at,
                        completed_at,
                    })
                },
            )
            .transpose()
    }

    /// Number of stored records (test and reporting helper).
    pub async fn count_invocations(&self) -> Result<i64, JukebotError> {
        self.db
            .connection()
            .call(|conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM command_invocations",
                    [],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn save_invocation(&self, record: &InvocationRecord) -> Result<(), JukebotError> {
        let id = record.id.clone();
        let user_id = record.user_id.0.clone();
        let scope_id = record.scope_id.0.clone();
        let command = record.command.clone();
        let params_json =
            serde_json::to_string(&record.params).map_err(|e| JukebotError::Storage {
                source: Box::new(e),
            })?;
        let started_at = record.started_at.clone();
        let completed_at = record.completed_at.clone();

        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO command_invocations \
                     (id, user_id, scope_id, command, params, started_at, completed_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        id,
                        user_id,
                        scope_id,
                        command,
                        params_json,
                        started_at,
                        completed_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        info!(
            invocation = %record.id,
            command = %record.command,
            scope = %record.scope_id,
            "invocation record stored"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn test_store() -> SqliteRecordStore {
        SqliteRecordStore::new(Database::open_in_memory().await.unwrap())
    }

    fn sample_record(id: &str) -> InvocationRecord {
        let mut params = serde_json::Map::new();
        params.insert("prompt".to_string(), json!("a cat"));
        params.insert("ai_director".to_string(), json!(true));
        InvocationRecord {
            id: id.to_string(),
            user_id: UserId("u1".into()),
            scope_id: ScopeId("g1".into()),
            command: "video".to_string(),
            params,
            started_at: "2026-03-01T10:00:00.000Z".to_string(),
            completed_at: Some("2026-03-01T10:01:30.000Z".to_string()),
        }
    }

    #[tokio::test]
    async fn save_inserts_row_with_params_json() {
        let store = test_store().await;
        store.save_invocation(&sample_record("inv-1")).await.unwrap();

        let fetched = store.get_invocation("inv-1").await.unwrap().unwrap();
        assert_eq!(fetched.command, "video");
        assert_eq!(fetched.params.get("prompt"), Some(&json!("a cat")));
        assert_eq!(fetched.params.get("ai_director"), Some(&json!(true)));
        assert_eq!(
            fetched.completed_at.as_deref(),
            Some("2026-03-01T10:01:30.000Z")
        );
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let store = test_store().await;
        store.save_invocation(&sample_record("inv-1")).await.unwrap();

        let err = store.save_invocation(&sample_record("inv-1")).await;
        assert!(err.is_err(), "primary key should reject a second write");
        assert_eq!(store.count_invocations().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn get_missing_invocation_returns_none() {
        let store = test_store().await;
        assert!(store.get_invocation("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn count_reflects_saves() {
        let store = test_store().await;
        assert_eq!(store.count_invocations().await.unwrap(), 0);
        store.save_invocation(&sample_record("inv-1")).await.unwrap();
        store.save_invocation(&sample_record("inv-2")).await.unwrap();
        assert_eq!(store.count_invocations().await.unwrap(), 2);
    }
}
