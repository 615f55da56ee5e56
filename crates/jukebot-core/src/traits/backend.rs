// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation-backend boundary trait.

use async_trait::async_trait;

use crate::error::JukebotError;
use crate::types::{
    ImageRequest, ImageResponse, SpeechRequest, TextRequest, TextResponse, VideoJob,
    VideoRequest,
};

/// Adapter for the generative-media provider.
///
/// Covers the four generation surfaces the commands use: text (chat,
/// vision, prompt rewriting), images, speech, and asynchronous video jobs
/// with an opaque submit/poll/download contract.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generates text from a prompt, with optional instructions, vision
    /// input, and a continuation identifier for follow-up turns.
    async fn generate_text(&self, request: TextRequest) -> Result<TextResponse, JukebotError>;

    /// Generates one or more images from a prompt.
    async fn generate_image(&self, request: ImageRequest)
    -> Result<ImageResponse, JukebotError>;

    /// Synthesizes speech audio for the given text and voice.
    async fn synthesize_speech(&self, request: SpeechRequest)
    -> Result<Vec<u8>, JukebotError>;

    /// Submits a video-generation job. Returns the job in its initial
    /// (non-terminal) status, or an error when the submission is rejected.
    async fn submit_video(&self, request: VideoRequest) -> Result<VideoJob, JukebotError>;

    /// Polls a previously submitted job's current status.
    async fn poll_video(&self, job_id: &str) -> Result<VideoJob, JukebotError>;

    /// Downloads the rendered content of a completed job.
    async fn download_video(&self, job_id: &str) -> Result<Vec<u8>, JukebotError>;

    /// Submits a remix of an existing job with a new prompt.
    async fn remix_video(&self, job_id: &str, prompt: &str)
    -> Result<VideoJob, JukebotError>;
}
