// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-scope registry of cancellable talk-session handles.
//!
//! At most one talk session drives audio output per scope: beginning a
//! session for a scope that already has one cancels and replaces the
//! existing handle. The stored token also gives a future explicit "stop"
//! operation something to signal, instead of relying solely on the
//! liveness predicate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use jukebot_core::ScopeId;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Handle for one registered talk session.
#[derive(Debug, Clone)]
pub struct TalkHandle {
    /// Registry-assigned session id; distinguishes a session from its
    /// replacement in the same scope.
    pub id: u64,
    pub token: CancellationToken,
}

/// Registry of active talk sessions, keyed by scope.
#[derive(Debug, Default)]
pub struct TalkRegistry {
    sessions: Mutex<HashMap<ScopeId, TalkHandle>>,
    next_id: AtomicU64,
}

impl TalkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session for `scope`, cancelling and replacing any
    /// existing one (replace policy).
    pub async fn begin(&self, scope: &ScopeId) -> TalkHandle {
        let handle = TalkHandle {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            token: CancellationToken::new(),
        };

        let mut sessions = self.sessions.lock().await;
        if let Some(previous) = sessions.insert(scope.clone(), handle.clone()) {
            previous.token.cancel();
            info!(scope = %scope, replaced = previous.id, "replaced active talk session");
        } else {
            debug!(scope = %scope, id = handle.id, "talk session registered");
        }
        handle
    }

    /// Signals the scope's active session to stop. Returns whether a
    /// session was present.
    pub async fn stop(&self, scope: &ScopeId) -> bool {
        match self.sessions.lock().await.remove(scope) {
            Some(handle) => {
                handle.token.cancel();
                info!(scope = %scope, id = handle.id, "talk session stopped");
                true
            }
            None => false,
        }
    }

    /// Clears a finished session's handle, unless it was already replaced
    /// by a newer one.
    pub async fn finish(&self, scope: &ScopeId, handle: &TalkHandle) {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(scope).is_some_and(|current| current.id == handle.id) {
            sessions.remove(scope);
            debug!(scope = %scope, id = handle.id, "talk session finished");
        }
    }

    /// Whether a session is registered for the scope.
    pub async fn is_active(&self, scope: &ScopeId) -> bool {
        self.sessions.lock().await.contains_key(scope)
    }
}
