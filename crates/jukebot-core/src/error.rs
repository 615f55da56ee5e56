// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Jukebot command core.

use thiserror::Error;

/// The primary error type used across all Jukebot boundary traits and core operations.
#[derive(Debug, Error)]
pub enum JukebotError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage errors (database connection, insert failure, artifact file I/O).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat-platform errors (reply delivery, audio playback, attachment upload).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generation-backend errors (API failure, malformed response, download failure).
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend rejected the prompt at submission (content policy).
    #[error("prompt rejected: {message}")]
    PromptRejected { message: String },

    /// A generation job reached terminal failed status after polling.
    #[error("job {job_id} failed ({code}): {message}")]
    JobFailed {
        job_id: String,
        code: String,
        message: String,
    },

    /// The daily quota for a constrained resource is exhausted.
    #[error("daily quota exhausted for `{resource}` (limit {limit})")]
    QuotaExceeded { resource: String, limit: u32 },

    /// The invoking user is not on the allow-list for this command.
    #[error("user {user} is not authorized for this command")]
    NotAuthorized { user: String },

    /// A command invocation was saved more than once.
    #[error("invocation {invocation} was already saved")]
    AlreadySaved { invocation: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
