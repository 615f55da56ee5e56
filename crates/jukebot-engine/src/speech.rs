// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spoken-reply generation: text generation followed by speech synthesis,
//! with the audio persisted as an invocation artifact.
//!
//! Shared by the one-shot voice commands (say, rather) and the recurring
//! talk loop.

use std::path::PathBuf;

use jukebot_context::CommandInvocation;
use jukebot_core::types::{SpeechRequest, TextRequest};
use jukebot_core::{GenerationBackend, JukebotError};
use jukebot_media::ArtifactStore;
use serde_json::json;
use tracing::debug;

/// Voice and model selection for speech generation.
#[derive(Debug, Clone)]
pub struct SpeechSettings {
    pub voice: String,
    pub speech_model: String,
    /// Text model for the line-generation step; backend default when `None`.
    pub text_model: Option<String>,
}

/// One generated spoken line: the text and its persisted audio file.
#[derive(Debug)]
pub struct SpokenReply {
    pub text: String,
    pub audio_path: PathBuf,
}

/// Generates one spoken line for a prompt.
///
/// Runs a text-generation call, synthesizes the result with the configured
/// voice, writes the audio under the invocation's artifact directory
/// (timestamp-named), and records the spoken text on the invocation
/// context.
pub async fn generate_spoken_reply(
    backend: &dyn GenerationBackend,
    artifacts: &ArtifactStore,
    ctx: &mut CommandInvocation,
    prompt: &str,
    settings: &SpeechSettings,
) -> Result<SpokenReply, JukebotError> {
    let response = backend
        .generate_text(TextRequest {
            prompt: prompt.to_string(),
            model: settings.text_model.clone(),
            ..TextRequest::default()
        })
        .await?;

    let audio = backend
        .synthesize_speech(SpeechRequest {
            text: response.text.clone(),
            voice: settings.voice.clone(),
            model: settings.speech_model.clone(),
            format: Some("wav".to_string()),
        })
        .await?;

    let file_name = format!("{}.wav", chrono::Utc::now().format("%Y%m%d%H%M%S%3f"));
    let audio_path = artifacts.write(ctx.id(), &file_name, &audio).await?;

    ctx.set_param("tts", json!(response.text));
    debug!(
        invocation = ctx.id(),
        audio = %audio_path.display(),
        "spoken reply generated"
    );

    Ok(SpokenReply {
        text: response.text,
        audio_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jukebot_context::param_map;
    use jukebot_core::{ScopeId, UserId};
    use jukebot_test_utils::MockBackend;

    fn settings() -> SpeechSettings {
        SpeechSettings {
            voice: "onyx".to_string(),
            speech_model: "gpt-4o-mini-tts".to_string(),
            text_model: None,
        }
    }

    #[tokio::test]
    async fn generates_text_then_audio_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = ArtifactStore::new(dir.path()).unwrap();
        let backend = MockBackend::new();
        backend.push_text("a short absurd sentence").await;

        let mut ctx = CommandInvocation::open(
            UserId("u1".into()),
            ScopeId("g1".into()),
            "rather",
            param_map([]),
        );

        let spoken =
            generate_spoken_reply(&backend, &artifacts, &mut ctx, "say something", &settings())
                .await
                .unwrap();

        assert_eq!(spoken.text, "a short absurd sentence");
        assert_eq!(std::fs::read(&spoken.audio_path).unwrap(), b"mock audio");
        assert_eq!(
            ctx.param("tts"),
            Some(&serde_json::json!("a short absurd sentence"))
        );
        assert_eq!(backend.speech_call_count(), 1);
    }
}
