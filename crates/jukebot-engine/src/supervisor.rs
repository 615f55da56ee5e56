// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submit/poll/download/cleanup state machine for long-running generation jobs.
//!
//! The supervisor drives one video job from submission to artifact
//! persistence: Idle -> Submitted -> Polling -> {Completed, Failed}.
//! An optional prompt-rewriting pre-step ("director") runs before
//! submission, and an optional reference image is fetched into a
//! [`TempFile`] guard whose Drop deletes it on every exit path --
//! completion, terminal failure, and submission error alike.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use jukebot_context::CommandInvocation;
use jukebot_core::types::{
    DisplayCard, JobError, JobStatus, TextRequest, VideoRequest,
};
use jukebot_core::{GenerationBackend, JukebotError};
use jukebot_media::{ArtifactStore, BROWSER_USER_AGENT, TempFile};
use serde_json::json;
use tracing::{debug, info, warn};

/// Accent color for video-generation cards.
const VIDEO_CARD_COLOR: u32 = 3_426_654;

/// States in the generation-job FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// No job yet.
    Idle,
    /// Submission attempted; not yet polling.
    Submitted,
    /// Waiting on the backend to reach a terminal status.
    Polling,
    /// Artifact downloaded and persisted.
    Completed,
    /// Backend reported terminal failure.
    Failed,
}

impl std::fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupervisorState::Idle => write!(f, "idle"),
            SupervisorState::Submitted => write!(f, "submitted"),
            SupervisorState::Polling => write!(f, "polling"),
            SupervisorState::Completed => write!(f, "completed"),
            SupervisorState::Failed => write!(f, "failed"),
        }
    }
}

/// A reference image to fetch and attach to the submission.
#[derive(Debug, Clone)]
pub struct ReferenceSource {
    pub url: String,
    pub file_name: String,
}

/// Prompt-rewriting pre-step settings.
#[derive(Debug, Clone)]
pub struct DirectorSettings {
    /// Full instruction text (already parameterized by duration).
    pub instructions: String,
    /// Text model override for the rewrite call.
    pub model: Option<String>,
}

/// Everything the supervisor needs to drive one video job.
#[derive(Debug, Clone)]
pub struct VideoJobSpec {
    pub prompt: String,
    pub model: String,
    pub seconds: String,
    pub size: String,
    pub reference: Option<ReferenceSource>,
    pub director: Option<DirectorSettings>,
}

/// Result of a completed job: persisted files plus the display card.
#[derive(Debug)]
pub struct SupervisorOutcome {
    pub files: Vec<PathBuf>,
    pub card: DisplayCard,
}

/// Drives one long-running generation job to artifact persistence.
///
/// One supervisor instance handles exactly one job; nothing is shared
/// between concurrent invocations except the backend client.
pub struct GenerationSupervisor {
    backend: Arc<dyn GenerationBackend>,
    artifacts: Arc<ArtifactStore>,
    poll_interval: Duration,
    state: SupervisorState,
}

impl GenerationSupervisor {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        artifacts: Arc<ArtifactStore>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            backend,
            artifacts,
            poll_interval,
            state: SupervisorState::Idle,
        }
    }

    /// The current FSM state.
    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Runs the job: optional director rewrite, optional reference fetch,
    /// submit, poll to terminal, download and persist.
    ///
    /// On terminal failure the backend's error code and message surface
    /// verbatim via [`JukebotError::JobFailed`]; a director rewrite that
    /// already happened is still written under a `FAILED-` marked name.
    /// The reference temp file is deleted on every exit path.
    pub async fn run(
        &mut self,
        ctx: &mut CommandInvocation,
        spec: VideoJobSpec,
    ) -> Result<SupervisorOutcome, JukebotError> {
        let mut description = format!("### User Input:\n> {}", spec.prompt);

        // Fetch the reference input before submission. The guard owns the
        // file for the rest of this call; Drop deletes it no matter which
        // branch returns.
        let reference_file = match &spec.reference {
            Some(source) => Some(TempFile::adopt(
                self.artifacts
                    .download(
                        &source.url,
                        &source.file_name,
                        &[("User-Agent", BROWSER_USER_AGENT)],
                    )
                    .await?,
            )),
            None => None,
        };

        // Director pre-step: one text-generation call whose output replaces
        // the submission prompt. The original stays in the description.
        let mut submission_prompt = spec.prompt.clone();
        let mut director_text = None;
        if let Some(director) = &spec.director {
            let response = self
                .backend
                .generate_text(TextRequest {
                    prompt: spec.prompt.clone(),
                    instructions: Some(director.instructions.clone()),
                    model: director.model.clone(),
                    ..TextRequest::default()
                })
                .await?;
            debug!(chars = response.text.len(), "director rewrote the prompt");
            ctx.set_param("prompt", json!(response.text));
            submission_prompt = response.text.clone();
            director_text = Some(response.text);
            description.push_str("\n### AI Director:\n`True`");
        }

        // Transition: Idle -> Submitted
        self.state = SupervisorState::Submitted;
        let job = self
            .backend
            .submit_video(VideoRequest {
                prompt: submission_prompt,
                model: spec.model.clone(),
                seconds: spec.seconds.clone(),
                size: spec.size.clone(),
                input_reference: reference_file.as_ref().map(|f| f.path().to_path_buf()),
            })
            .await?;

        info!(job_id = %job.id, model = %spec.model, "video job submitted");

        // Transition: Submitted -> Polling
        self.state = SupervisorState::Polling;
        let mut job = job;
        while !job.status.is_terminal() {
            tokio::time::sleep(self.poll_interval).await;
            job = self.backend.poll_video(&job.id).await?;
            debug!(job_id = %job.id, status = %job.status, "poll");
        }

        if job.status == JobStatus::Failed {
            self.state = SupervisorState::Failed;

            // Keep the rewritten prompt for inspection, marked as failed.
            if let Some(text) = &director_text {
                let failed_name =
                    format!("FAILED-{}-director-prompt-{}.txt", spec.model, job.id);
                self.artifacts
                    .write(ctx.id(), &failed_name, text.as_bytes())
                    .await?;
            }

            let error = job.error.unwrap_or(JobError {
                code: "unknown".to_string(),
                message: "backend reported no error detail".to_string(),
            });
            warn!(job_id = %job.id, code = %error.code, "video job failed");
            return Err(JukebotError::JobFailed {
                job_id: job.id,
                code: error.code,
                message: error.message,
            });
        }

        // Transition: Polling -> Completed
        self.state = SupervisorState::Completed;
        let bytes = self.backend.download_video(&job.id).await?;
        let video_file_name = format!("{}-{}.mp4", spec.model, job.id);
        let video_path = self
            .artifacts
            .write(ctx.id(), &video_file_name, &bytes)
            .await?;

        let mut files = vec![video_path];

        if let Some(text) = &director_text {
            let text_file_name = format!("{}-director-prompt-{}.txt", spec.model, job.id);
            files.push(
                self.artifacts
                    .write(ctx.id(), &text_file_name, text.as_bytes())
                    .await?,
            );
        }

        let mut card = DisplayCard::new(
            format!("`{}` Video Generation", spec.model),
            description,
            VIDEO_CARD_COLOR,
        );

        // Re-display the reference image as a persisted artifact; the
        // downloaded temp copy is still deleted when the guard drops.
        if let (Some(source), Some(temp)) = (&spec.reference, &reference_file) {
            let reference_bytes =
                tokio::fs::read(temp.path())
                    .await
                    .map_err(|e| JukebotError::Storage {
                        source: Box::new(e),
                    })?;
            files.push(
                self.artifacts
                    .write(ctx.id(), &source.file_name, &reference_bytes)
                    .await?,
            );
            card.image_attachment = Some(source.file_name.clone());
            card.footer = Some("Used image for reference.".to_string());
        }

        info!(job_id = %job.id, files = files.len(), "video job completed");
        Ok(SupervisorOutcome { files, card })
    }

    /// Remixes an existing job with a new prompt and drives the result to
    /// artifact persistence through the same poll/download path.
    pub async fn run_remix(
        &mut self,
        ctx: &mut CommandInvocation,
        source_job_id: &str,
        prompt: &str,
    ) -> Result<SupervisorOutcome, JukebotError> {
        let description = format!("### Remix of `{source_job_id}`:\n> {prompt}");

        // Transition: Idle -> Submitted
        self.state = SupervisorState::Submitted;
        let mut job = self.backend.remix_video(source_job_id, prompt).await?;
        ctx.set_param("remix_of", json!(source_job_id));
        info!(job_id = %job.id, source = %source_job_id, "remix job submitted");

        // Transition: Submitted -> Polling
        self.state = SupervisorState::Polling;
        while !job.status.is_terminal() {
            tokio::time::sleep(self.poll_interval).await;
            job = self.backend.poll_video(&job.id).await?;
            debug!(job_id = %job.id, status = %job.status, "poll");
        }

        if job.status == JobStatus::Failed {
            self.state = SupervisorState::Failed;
            let error = job.error.unwrap_or(JobError {
                code: "unknown".to_string(),
                message: "backend reported no error detail".to_string(),
            });
            warn!(job_id = %job.id, code = %error.code, "remix job failed");
            return Err(JukebotError::JobFailed {
                job_id: job.id,
                code: error.code,
                message: error.message,
            });
        }

        // Transition: Polling -> Completed
        self.state = SupervisorState::Completed;
        let bytes = self.backend.download_video(&job.id).await?;
        let label = if job.model.is_empty() { "remix" } else { &job.model };
        let file_name = format!("{}-{}.mp4", label, job.id);
        let path = self.artifacts.write(ctx.id(), &file_name, &bytes).await?;

        let card = DisplayCard::new(
            format!("`{label}` Video Remix"),
            description,
            VIDEO_CARD_COLOR,
        );

        info!(job_id = %job.id, "remix job completed");
        Ok(SupervisorOutcome {
            files: vec![path],
            card,
        })
    }
}
