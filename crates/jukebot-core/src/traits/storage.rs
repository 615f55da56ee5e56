// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable-record boundary trait.
//!
//! The core only writes completed invocation records; no read API is
//! required by the command core itself.

use async_trait::async_trait;

use crate::error::JukebotError;
use crate::types::InvocationRecord;

/// Write contract for durable command-invocation records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists one completed invocation record.
    ///
    /// The record's `id` is unique; writing the same id twice is a caller
    /// bug and the store may reject it.
    async fn save_invocation(&self, record: &InvocationRecord) -> Result<(), JukebotError>;
}
