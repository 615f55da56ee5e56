// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record store for tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use jukebot_core::types::InvocationRecord;
use jukebot_core::{JukebotError, RecordStore};

/// Captures saved invocation records in memory.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<InvocationRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records saved so far.
    pub async fn records(&self) -> Vec<InvocationRecord> {
        self.records.lock().await.clone()
    }

    /// Number of records saved.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn save_invocation(&self, record: &InvocationRecord) -> Result<(), JukebotError> {
        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(JukebotError::AlreadySaved {
                invocation: record.id.clone(),
            });
        }
        records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jukebot_core::{ScopeId, UserId};

    fn record(id: &str) -> InvocationRecord {
        InvocationRecord {
            id: id.to_string(),
            user_id: UserId("u1".into()),
            scope_id: ScopeId("g1".into()),
            command: "say".to_string(),
            params: serde_json::Map::new(),
            started_at: "2026-03-01T10:00:00.000Z".to_string(),
            completed_at: Some("2026-03-01T10:00:01.000Z".to_string()),
        }
    }

    #[tokio::test]
    async fn saves_and_lists_records() {
        let store = MemoryRecordStore::new();
        store.save_invocation(&record("a")).await.unwrap();
        store.save_invocation(&record("b")).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn duplicate_id_rejected() {
        let store = MemoryRecordStore::new();
        store.save_invocation(&record("a")).await.unwrap();
        let err = store.save_invocation(&record("a")).await.unwrap_err();
        assert!(matches!(err, JukebotError::AlreadySaved { .. }));
    }
}
