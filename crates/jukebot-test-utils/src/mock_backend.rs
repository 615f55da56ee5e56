// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation backend for deterministic testing.
//!
//! `MockBackend` implements `GenerationBackend` with pre-configured
//! responses, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use base64::Engine as _;
use tokio::sync::Mutex;

use jukebot_core::types::{
    GeneratedImage, ImageRequest, ImageResponse, JobError, JobStatus, SpeechRequest,
    TextRequest, TextResponse, VideoJob, VideoRequest,
};
use jukebot_core::{GenerationBackend, JukebotError};

/// Scripted outcome for the next video submission.
#[derive(Debug, Clone)]
enum SubmitOutcome {
    Accept,
    Reject(String),
}

/// A mock generation backend with scripted responses.
///
/// Text responses are popped from a FIFO queue (defaulting to "mock text"
/// when empty). Video polls pop from a status queue, defaulting to
/// `Completed` so supervisor loops terminate.
pub struct MockBackend {
    text_responses: Arc<Mutex<VecDeque<String>>>,
    image_rejections: Arc<Mutex<VecDeque<String>>>,
    submit_outcomes: Arc<Mutex<VecDeque<SubmitOutcome>>>,
    poll_statuses: Arc<Mutex<VecDeque<JobStatus>>>,
    /// Error detail attached when a Failed status is popped.
    job_error: Arc<Mutex<JobError>>,
    text_calls: AtomicU32,
    submit_calls: AtomicU32,
    poll_calls: AtomicU32,
    speech_calls: AtomicU32,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            text_responses: Arc::new(Mutex::new(VecDeque::new())),
            image_rejections: Arc::new(Mutex::new(VecDeque::new())),
            submit_outcomes: Arc::new(Mutex::new(VecDeque::new())),
            poll_statuses: Arc::new(Mutex::new(VecDeque::new())),
            job_error: Arc::new(Mutex::new(JobError {
                code: "internal_error".to_string(),
                message: "mock job failure".to_string(),
            })),
            text_calls: AtomicU32::new(0),
            submit_calls: AtomicU32::new(0),
            poll_calls: AtomicU32::new(0),
            speech_calls: AtomicU32::new(0),
        }
    }

    /// Queue a text-generation response.
    pub async fn push_text(&self, text: impl Into<String>) {
        self.text_responses.lock().await.push_back(text.into());
    }

    /// Make the next image generation fail with a prompt rejection.
    pub async fn reject_next_image(&self, message: impl Into<String>) {
        self.image_rejections.lock().await.push_back(message.into());
    }

    /// Make the next video submission fail with a prompt rejection.
    pub async fn reject_next_submit(&self, message: impl Into<String>) {
        self.submit_outcomes
            .lock()
            .await
            .push_back(SubmitOutcome::Reject(message.into()));
    }

    /// Queue a poll status for the outstanding video job.
    pub async fn push_poll_status(&self, status: JobStatus) {
        self.poll_statuses.lock().await.push_back(status);
    }

    /// Set the error detail reported when a job fails.
    pub async fn set_job_error(&self, code: impl Into<String>, message: impl Into<String>) {
        *self.job_error.lock().await = JobError {
            code: code.into(),
            message: message.into(),
        };
    }

    pub fn text_call_count(&self) -> u32 {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn submit_call_count(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_call_count(&self) -> u32 {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn speech_call_count(&self) -> u32 {
        self.speech_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate_text(&self, request: TextRequest) -> Result<TextResponse, JukebotError> {
        let n = self.text_calls.fetch_add(1, Ordering::SeqCst);
        let text = self
            .text_responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock text".to_string());
        Ok(TextResponse {
            id: format!("mock-resp-{n}"),
            text,
            previous_response_id: request.previous_response_id,
        })
    }

    async fn generate_image(
        &self,
        _request: ImageRequest,
    ) -> Result<ImageResponse, JukebotError> {
        if let Some(message) = self.image_rejections.lock().await.pop_front() {
            return Err(JukebotError::PromptRejected { message });
        }
        Ok(ImageResponse {
            created: 1_750_000_000,
            images: vec![GeneratedImage {
                b64_data: Some(base64::engine::general_purpose::STANDARD.encode(b"png bytes")),
                url: None,
                revised_prompt: None,
            }],
        })
    }

    async fn synthesize_speech(
        &self,
        _request: SpeechRequest,
    ) -> Result<Vec<u8>, JukebotError> {
        self.speech_calls.fetch_add(1, Ordering::SeqCst);
        Ok(b"mock audio".to_vec())
    }

    async fn submit_video(&self, request: VideoRequest) -> Result<VideoJob, JukebotError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .submit_outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or(SubmitOutcome::Accept);
        match outcome {
            SubmitOutcome::Accept => Ok(VideoJob {
                id: "video-mock".to_string(),
                status: JobStatus::Queued,
                error: None,
                model: request.model,
            }),
            SubmitOutcome::Reject(message) => Err(JukebotError::PromptRejected { message }),
        }
    }

    async fn poll_video(&self, job_id: &str) -> Result<VideoJob, JukebotError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let status = self
            .poll_statuses
            .lock()
            .await
            .pop_front()
            .unwrap_or(JobStatus::Completed);
        let error = if status == JobStatus::Failed {
            Some(self.job_error.lock().await.clone())
        } else {
            None
        };
        Ok(VideoJob {
            id: job_id.to_string(),
            status,
            error,
            model: "mock-video-model".to_string(),
        })
    }

    async fn download_video(&self, _job_id: &str) -> Result<Vec<u8>, JukebotError> {
        Ok(b"mock video bytes".to_vec())
    }

    async fn remix_video(
        &self,
        _job_id: &str,
        _prompt: &str,
    ) -> Result<VideoJob, JukebotError> {
        Ok(VideoJob {
            id: "video-remix".to_string(),
            status: JobStatus::Queued,
            error: None,
            model: "mock-video-model".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn text_responses_pop_in_order_then_default() {
        let backend = MockBackend::new();
        backend.push_text("first").await;
        backend.push_text("second").await;

        let req = || TextRequest {
            prompt: "p".into(),
            ..TextRequest::default()
        };
        assert_eq!(backend.generate_text(req()).await.unwrap().text, "first");
        assert_eq!(backend.generate_text(req()).await.unwrap().text, "second");
        assert_eq!(backend.generate_text(req()).await.unwrap().text, "mock text");
        assert_eq!(backend.text_call_count(), 3);
    }

    #[tokio::test]
    async fn poll_defaults_to_completed() {
        let backend = MockBackend::new();
        let job = backend.poll_video("video-1").await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn failed_poll_carries_error_detail() {
        let backend = MockBackend::new();
        backend.set_job_error("moderation_blocked", "nope").await;
        backend.push_poll_status(JobStatus::Failed).await;
        let job = backend.poll_video("video-1").await.unwrap();
        let error = job.error.unwrap();
        assert_eq!(error.code, "moderation_blocked");
        assert_eq!(error.message, "nope");
    }

    #[tokio::test]
    async fn rejected_submit_surfaces_prompt_rejection() {
        let backend = MockBackend::new();
        backend.reject_next_submit("policy violation").await;
        let err = backend
            .submit_video(VideoRequest {
                prompt: "p".into(),
                model: "sora-2".into(),
                seconds: "4".into(),
                size: "1280x720".into(),
                input_reference: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, JukebotError::PromptRejected { .. }));
    }
}
