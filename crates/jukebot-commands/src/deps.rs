// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit dependency bundle handed to every command handler.
//!
//! All shared state (quota tracker, talk registry, thread tracker) is
//! injected through this struct rather than reached through globals, so
//! tests can substitute any seam.

use std::sync::Arc;

use jukebot_config::JukebotConfig;
use jukebot_core::{ChannelPort, GenerationBackend, RecordStore};
use jukebot_engine::{SpeechSettings, TalkRegistry};
use jukebot_media::ArtifactStore;
use jukebot_quota::QuotaTracker;

use crate::chat::ThreadTracker;

/// Everything a command handler needs.
pub struct CommandDeps {
    pub channel: Arc<dyn ChannelPort>,
    pub backend: Arc<dyn GenerationBackend>,
    pub records: Arc<dyn RecordStore>,
    pub artifacts: Arc<ArtifactStore>,
    pub quota: Arc<QuotaTracker>,
    pub talks: Arc<TalkRegistry>,
    pub threads: Arc<ThreadTracker>,
    pub config: Arc<JukebotConfig>,
}

impl CommandDeps {
    /// Speech settings from config, with an optional voice override.
    pub fn speech_settings(&self, voice: Option<String>) -> SpeechSettings {
        SpeechSettings {
            voice: voice.unwrap_or_else(|| self.config.backend.speech_voice.clone()),
            speech_model: self.config.backend.speech_model.clone(),
            text_model: None,
        }
    }
}

/// A chat-platform attachment referenced by URL.
#[derive(Debug, Clone)]
pub struct AttachmentRef {
    pub url: String,
    pub file_name: String,
}
