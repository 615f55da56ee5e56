// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across boundary traits and the Jukebot command core.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier for the chat-platform grouping (guild/server) under which
/// quota and session state are partitioned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub String);

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for the chat-platform user who triggered a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The storage-facing form of a completed command invocation.
///
/// One row per invocation; `params` holds the final parameter mapping at
/// save time, including values added mid-pipeline (rewritten prompts,
/// resolved flags).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRecord {
    /// Unique record identifier (UUID v4).
    pub id: String,
    /// User who invoked the command.
    pub user_id: UserId,
    /// Scope (guild) the command was invoked in.
    pub scope_id: ScopeId,
    /// Command name, e.g. "image".
    pub command: String,
    /// Final parameter mapping (keys unique, insertion order irrelevant).
    pub params: serde_json::Map<String, serde_json::Value>,
    /// ISO 8601 start timestamp.
    pub started_at: String,
    /// ISO 8601 completion timestamp, stamped at save.
    pub completed_at: Option<String>,
}

// --- Channel reply types ---

/// A rich display object attached to a reply (title, body, optional
/// attachment image and footer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCard {
    pub title: String,
    pub body: String,
    /// File name of an attachment to render inside the card.
    pub image_attachment: Option<String>,
    pub footer: Option<String>,
    /// Accent color, 24-bit RGB.
    pub color: u32,
}

impl DisplayCard {
    pub fn new(title: impl Into<String>, body: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            image_attachment: None,
            footer: None,
            color,
        }
    }
}

/// An outbound reply: plain text, an optional display card, and zero or
/// more file attachments.
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub text: Option<String>,
    pub card: Option<DisplayCard>,
    pub attachments: Vec<PathBuf>,
}

impl Reply {
    /// A plain-text reply with no card or attachments.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_card(mut self, card: DisplayCard) -> Self {
        self.card = Some(card);
        self
    }

    pub fn with_attachment(mut self, path: PathBuf) -> Self {
        self.attachments.push(path);
        self
    }
}

// --- Text generation types ---

/// A text-generation request (chat, vision, prompt rewriting).
#[derive(Debug, Clone, Default)]
pub struct TextRequest {
    pub prompt: String,
    /// Optional system-level instructions.
    pub instructions: Option<String>,
    /// Model override; the backend's default applies when `None`.
    pub model: Option<String>,
    /// Remote image to include as vision input.
    pub image_url: Option<String>,
    /// Continuation identifier from a previous response.
    pub previous_response_id: Option<String>,
    pub max_output_tokens: Option<u32>,
}

/// A text-generation response with a continuation identifier for
/// follow-up turns.
#[derive(Debug, Clone)]
pub struct TextResponse {
    pub id: String,
    pub text: String,
    /// Set when this response continued an earlier one.
    pub previous_response_id: Option<String>,
}

// --- Image generation types ---

/// An image-generation request.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub model: String,
    /// Background transparency option (constrained model family only).
    pub background: Option<String>,
    /// Moderation strictness (constrained model family only).
    pub moderation: Option<String>,
    /// Response encoding, e.g. "b64_json" (legacy model family).
    pub response_format: Option<String>,
}

/// One generated image: inline base64 bytes or a reference URL.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub b64_data: Option<String>,
    pub url: Option<String>,
    /// Backend-rewritten prompt, when the model rewrites prompts.
    pub revised_prompt: Option<String>,
}

/// The full image-generation response.
#[derive(Debug, Clone)]
pub struct ImageResponse {
    /// Backend creation timestamp (unix seconds), used in artifact names.
    pub created: i64,
    pub images: Vec<GeneratedImage>,
}

// --- Speech synthesis types ---

/// A speech-synthesis request; the response is raw audio bytes.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: String,
    pub model: String,
    /// Output container, e.g. "wav".
    pub format: Option<String>,
}

// --- Video job types ---

/// Status of an asynchronous video-generation job.
///
/// Monotonic: a job never regresses from a terminal status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether no further transition can occur from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Backend-reported failure detail for a terminal failed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobError {
    pub code: String,
    pub message: String,
}

/// One outstanding video-generation job as reported by the backend.
#[derive(Debug, Clone)]
pub struct VideoJob {
    /// Backend-assigned job identifier.
    pub id: String,
    pub status: JobStatus,
    pub error: Option<JobError>,
    pub model: String,
}

/// A video-generation submission.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub prompt: String,
    pub model: String,
    /// Requested duration in seconds; the backend takes it as a string enum.
    pub seconds: String,
    /// Output resolution, e.g. "1280x720".
    pub size: String,
    /// Local path of a reference image to attach to the submission.
    pub input_reference: Option<PathBuf>,
}
