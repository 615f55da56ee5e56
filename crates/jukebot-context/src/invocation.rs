// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-invocation command context.
//!
//! A [`CommandInvocation`] is opened at the start of a command handler,
//! mutated only by that handler's execution path, and saved exactly once
//! at the end -- on every terminal path, including early returns.

use jukebot_core::types::InvocationRecord;
use jukebot_core::{JukebotError, RecordStore, ScopeId, UserId};
use serde_json::Value;
use tracing::debug;

/// Build a parameter map from literal entries.
///
/// Convenience for handlers opening an invocation:
/// `param_map([("prompt", json!(p)), ("model", json!(m))])`.
pub fn param_map<const N: usize>(
    entries: [(&str, Value); N],
) -> serde_json::Map<String, Value> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// One user-triggered command execution, start to finish.
///
/// Parameters are fixed at creation except for fields explicitly added
/// during execution (a rewritten prompt, a resolved flag). The record is
/// write-once: a second [`save`](Self::save) is rejected.
#[derive(Debug)]
pub struct CommandInvocation {
    record: InvocationRecord,
    saved: bool,
}

impl CommandInvocation {
    /// Opens a new invocation context.
    ///
    /// Pure in-memory construction: assigns a UUID and a start timestamp,
    /// performs no I/O.
    pub fn open(
        user: UserId,
        scope: ScopeId,
        command: &str,
        initial_params: serde_json::Map<String, Value>,
    ) -> Self {
        Self {
            record: InvocationRecord {
                id: uuid::Uuid::new_v4().to_string(),
                user_id: user,
                scope_id: scope,
                command: command.to_string(),
                params: initial_params,
                started_at: now_iso(),
                completed_at: None,
            },
            saved: false,
        }
    }

    /// The invocation identifier.
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// The scope this invocation belongs to.
    pub fn scope(&self) -> &ScopeId {
        &self.record.scope_id
    }

    /// The invoking user.
    pub fn user(&self) -> &UserId {
        &self.record.user_id
    }

    /// Adds or overwrites a parameter.
    ///
    /// This is how multi-step pipelines thread state forward (a rewritten
    /// prompt, a computed flag) without re-deriving it.
    pub fn set_param(&mut self, key: &str, value: Value) {
        self.record.params.insert(key.to_string(), value);
    }

    /// Reads a parameter previously set.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.record.params.get(key)
    }

    /// The current parameter mapping.
    pub fn params(&self) -> &serde_json::Map<String, Value> {
        &self.record.params
    }

    /// Whether this invocation has already been saved.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Stamps a completion timestamp and writes the record to durable storage.
    ///
    /// Must be called on every command path that reaches a terminal state.
    /// A second call is rejected with [`JukebotError::AlreadySaved`]. A
    /// storage failure surfaces to the caller; the user-visible reply has
    /// already been sent and is not rolled back.
    pub async fn save(&mut self, store: &dyn RecordStore) -> Result<(), JukebotError> {
        if self.saved {
            return Err(JukebotError::AlreadySaved {
                invocation: self.record.id.clone(),
            });
        }

        self.record.completed_at = Some(now_iso());
        store.save_invocation(&self.record).await?;
        self.saved = true;

        debug!(
            invocation = %self.record.id,
            command = %self.record.command,
            "invocation record saved"
        );

        Ok(())
    }
}

/// ISO 8601 timestamp with millisecond precision.
fn now_iso() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
