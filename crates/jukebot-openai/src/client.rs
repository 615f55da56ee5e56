// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI generation endpoints.
//!
//! Provides [`OpenAiClient`] which handles request construction,
//! authentication, multipart video submission, and transient error retry.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use jukebot_core::types::{
    GeneratedImage, ImageRequest, ImageResponse, SpeechRequest, TextRequest, TextResponse,
    VideoJob, VideoRequest,
};
use jukebot_core::{GenerationBackend, JukebotError};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{
    ApiErrorResponse, ImagesRequest, ImagesResponse, InputContent, InputItem, ResponseInput,
    ResponsesRequest, ResponsesResponse, SpeechApiRequest, VideoCreateRequest,
    VideoJobWire, VideoRemixRequest,
};

/// Base URL for the OpenAI API.
const API_BASE_URL: &str = "https://api.openai.com/v1";

/// HTTP client for OpenAI API communication.
///
/// Manages authentication headers, connection pooling, and retry logic
/// for transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    default_text_model: String,
    max_retries: u32,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new OpenAI API client.
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key for bearer authentication
    /// * `default_text_model` - Model used when a text request names none
    pub fn new(api_key: String, default_text_model: String) -> Result<Self, JukebotError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer).map_err(|e| {
                JukebotError::Config(format!("invalid API key header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| JukebotError::Backend {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            default_text_model,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (config override, wiremock tests).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends a JSON POST and decodes the JSON response, with transient retry.
    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, JukebotError> {
        let bytes = self
            .request_with_retry(|| {
                self.client
                    .post(format!("{}{}", self.base_url, path))
                    .json(body)
            })
            .await?;
        serde_json::from_slice(&bytes).map_err(|e| JukebotError::Backend {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Sends a JSON POST and returns the raw response bytes (audio).
    async fn post_bytes(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<Vec<u8>, JukebotError> {
        self.request_with_retry(|| {
            self.client
                .post(format!("{}{}", self.base_url, path))
                .json(body)
        })
        .await
    }

    /// Sends a GET and returns the raw response bytes.
    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, JukebotError> {
        self.request_with_retry(|| self.client.get(format!("{}{}", self.base_url, path)))
            .await
    }

    /// Sends a GET and decodes the JSON response (poll endpoint).
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, JukebotError> {
        let bytes = self.get_bytes(path).await?;
        serde_json::from_slice(&bytes).map_err(|e| JukebotError::Backend {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Executes a request, retrying once on transient statuses (429/500/503).
    ///
    /// A 400 is reported as [`JukebotError::PromptRejected`]: on these
    /// endpoints a bad request at submission means the prompt or options
    /// were refused (content policy, malformed parameters), and it is
    /// never retried.
    async fn request_with_retry(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<Vec<u8>, JukebotError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = build().send().await.map_err(|e| JukebotError::Backend {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

            let status = response.status();
            debug!(status = %status, attempt, "backend response received");

            if status.is_success() {
                let bytes = response.bytes().await.map_err(|e| JukebotError::Backend {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return Ok(bytes.to_vec());
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(JukebotError::Backend {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.clone());

            if status == reqwest::StatusCode::BAD_REQUEST {
                return Err(JukebotError::PromptRejected { message: detail });
            }
            return Err(JukebotError::Backend {
                message: format!("API returned {status}: {detail}"),
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| JukebotError::Backend {
            message: "request failed after retries".into(),
            source: None,
        }))
    }

    /// Submits a video job with a reference image attached as multipart form data.
    async fn submit_video_multipart(
        &self,
        request: &VideoRequest,
        reference: &Path,
    ) -> Result<Vec<u8>, JukebotError> {
        let file_name = reference
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reference".to_string());
        let bytes = tokio::fs::read(reference)
            .await
            .map_err(|e| JukebotError::Storage {
                source: Box::new(e),
            })?;

        // Multipart bodies are not cloneable; the form is rebuilt per
        // attempt from the same bytes.
        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying multipart submission after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let form = reqwest::multipart::Form::new()
                .text("prompt", request.prompt.clone())
                .text("model", request.model.clone())
                .text("seconds", request.seconds.clone())
                .text("size", request.size.clone())
                .part(
                    "input_reference",
                    reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone()),
                );

            let response = self
                .client
                .post(format!("{}/videos", self.base_url))
                .multipart(form)
                .send()
                .await
                .map_err(|e| JukebotError::Backend {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "video submission response received");

            if status.is_success() {
                let bytes = response.bytes().await.map_err(|e| JukebotError::Backend {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return Ok(bytes.to_vec());
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(JukebotError::Backend {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.clone());
            if status == reqwest::StatusCode::BAD_REQUEST {
                return Err(JukebotError::PromptRejected { message: detail });
            }
            return Err(JukebotError::Backend {
                message: format!("API returned {status}: {detail}"),
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| JukebotError::Backend {
            message: "multipart submission failed after retries".into(),
            source: None,
        }))
    }
}

fn wire_to_job(wire: VideoJobWire, fallback_model: &str) -> VideoJob {
    VideoJob {
        id: wire.id,
        status: wire.status,
        error: wire.error.map(|e| jukebot_core::types::JobError {
            code: e.code,
            message: e.message,
        }),
        model: wire.model.unwrap_or_else(|| fallback_model.to_string()),
    }
}

#[async_trait]
impl GenerationBackend for OpenAiClient {
    async fn generate_text(&self, request: TextRequest) -> Result<TextResponse, JukebotError> {
        let model = request
            .model
            .unwrap_or_else(|| self.default_text_model.clone());

        let input = match &request.image_url {
            Some(image_url) => ResponseInput::Items(vec![InputItem {
                role: "user".to_string(),
                content: vec![
                    InputContent::Text {
                        text: request.prompt.clone(),
                    },
                    InputContent::Image {
                        image_url: image_url.clone(),
                    },
                ],
            }]),
            None => ResponseInput::Text(request.prompt.clone()),
        };

        let api_request = ResponsesRequest {
            model,
            input,
            instructions: request.instructions,
            previous_response_id: request.previous_response_id,
            max_output_tokens: request.max_output_tokens,
        };

        let response: ResponsesResponse = self.post_json("/responses", &api_request).await?;
        Ok(TextResponse {
            text: response.output_text(),
            previous_response_id: response.previous_response_id.clone(),
            id: response.id,
        })
    }

    async fn generate_image(
        &self,
        request: ImageRequest,
    ) -> Result<ImageResponse, JukebotError> {
        let api_request = ImagesRequest {
            prompt: request.prompt,
            model: request.model,
            background: request.background,
            moderation: request.moderation,
            response_format: request.response_format,
        };

        let response: ImagesResponse =
            self.post_json("/images/generations", &api_request).await?;
        Ok(ImageResponse {
            created: response.created,
            images: response
                .data
                .into_iter()
                .map(|d| GeneratedImage {
                    b64_data: d.b64_json,
                    url: d.url,
                    revised_prompt: d.revised_prompt,
                })
                .collect(),
        })
    }

    async fn synthesize_speech(
        &self,
        request: SpeechRequest,
    ) -> Result<Vec<u8>, JukebotError> {
        let api_request = SpeechApiRequest {
            model: request.model,
            input: request.text,
            voice: request.voice,
            response_format: request.format,
        };
        self.post_bytes("/audio/speech", &api_request).await
    }

    async fn submit_video(&self, request: VideoRequest) -> Result<VideoJob, JukebotError> {
        let model = request.model.clone();
        let bytes = match &request.input_reference {
            Some(reference) => self.submit_video_multipart(&request, reference).await?,
            None => {
                let api_request = VideoCreateRequest {
                    prompt: request.prompt,
                    model: request.model,
                    seconds: request.seconds,
                    size: request.size,
                };
                self.post_bytes("/videos", &api_request).await?
            }
        };

        let wire: VideoJobWire =
            serde_json::from_slice(&bytes).map_err(|e| JukebotError::Backend {
                message: format!("failed to parse video job: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(wire_to_job(wire, &model))
    }

    async fn poll_video(&self, job_id: &str) -> Result<VideoJob, JukebotError> {
        let wire: VideoJobWire = self.get_json(&format!("/videos/{job_id}")).await?;
        Ok(wire_to_job(wire, ""))
    }

    async fn download_video(&self, job_id: &str) -> Result<Vec<u8>, JukebotError> {
        self.get_bytes(&format!("/videos/{job_id}/content?variant=video"))
            .await
    }

    async fn remix_video(
        &self,
        job_id: &str,
        prompt: &str,
    ) -> Result<VideoJob, JukebotError> {
        let wire: VideoJobWire = self
            .post_json(
                &format!("/videos/{job_id}/remix"),
                &VideoRemixRequest {
                    prompt: prompt.to_string(),
                },
            )
            .await?;
        Ok(wire_to_job(wire, ""))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
