// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Jukebot command framework.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level Jukebot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JukebotConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Generation-backend settings (API key, models, polling).
    #[serde(default)]
    pub backend: BackendConfig,

    /// Daily limits for constrained generation resources.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Prompt templates and topic prompts.
    #[serde(default)]
    pub prompts: PromptsConfig,

    /// Command authorization settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Durable-record storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Generated-artifact storage settings.
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "jukebot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Generation-backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Backend API key. `None` requires environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Override of the backend base URL (testing, proxies).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Default model for chat text generation.
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used for image-description (vision) requests.
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Default image-generation model.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Speech-synthesis model.
    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    /// Default speech voice identifier.
    #[serde(default = "default_speech_voice")]
    pub speech_voice: String,

    /// Default video-generation model.
    #[serde(default = "default_video_model")]
    pub video_model: String,

    /// Maximum tokens per text-generation response.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Seconds between polls of an outstanding video job.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            text_model: default_text_model(),
            vision_model: default_vision_model(),
            image_model: default_image_model(),
            speech_model: default_speech_model(),
            speech_voice: default_speech_voice(),
            video_model: default_video_model(),
            max_output_tokens: default_max_output_tokens(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_text_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_vision_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_image_model() -> String {
    "gpt-image-1-mini".to_string()
}

fn default_speech_model() -> String {
    "gpt-4o-mini-tts".to_string()
}

fn default_speech_voice() -> String {
    "onyx".to_string()
}

fn default_video_model() -> String {
    "sora-2".to_string()
}

fn default_max_output_tokens() -> u32 {
    500
}

fn default_poll_interval_secs() -> u64 {
    5
}

/// Daily limits for constrained generation resources.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Daily cap on constrained-family image generations per scope.
    #[serde(default = "default_image_daily_limit")]
    pub image_daily_limit: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            image_daily_limit: default_image_daily_limit(),
        }
    }
}

fn default_image_daily_limit() -> u32 {
    3
}

/// Prompt templates and topic prompts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptsConfig {
    /// Default prompt for the vision command when the user supplies none.
    #[serde(default = "default_vision_prompt")]
    pub vision: String,

    /// Instruction template for the video prompt-rewriting pre-step.
    /// `{seconds}` is replaced with the requested duration.
    #[serde(default = "default_video_director")]
    pub video_director: String,

    /// Default instructions for the chat command.
    #[serde(default = "default_chat_instructions")]
    pub chat_instructions: String,

    /// Topic-keyed prompts for the talk and rather commands
    /// (e.g. `talk_nonsense`, `rather_normal`).
    #[serde(default = "default_topics")]
    pub topics: HashMap<String, String>,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            vision: default_vision_prompt(),
            video_director: default_video_director(),
            chat_instructions: default_chat_instructions(),
            topics: default_topics(),
        }
    }
}

impl PromptsConfig {
    /// Look up the prompt for a topic key.
    pub fn topic(&self, key: &str) -> Option<&str> {
        self.topics.get(key).map(String::as_str)
    }

    /// Render the video-director instruction template for a duration.
    pub fn director_instructions(&self, seconds: &str) -> String {
        self.video_director.replace("{seconds}", seconds)
    }
}

fn default_vision_prompt() -> String {
    "What is in this image?".to_string()
}

fn default_video_director() -> String {
    "You are a video director. Rewrite the user's idea as a detailed shot \
     description for a {seconds}-second video: subject, motion, framing, \
     lighting, and mood. Reply with the rewritten prompt only."
        .to_string()
}

fn default_chat_instructions() -> String {
    "Ensure your response is under 2,000 characters and uses markdown \
     compatible with the chat platform."
        .to_string()
}

fn default_topics() -> HashMap<String, String> {
    HashMap::from([
        (
            "talk_nonsense".to_string(),
            "Say one short absurd sentence about everyday life.".to_string(),
        ),
        (
            "talk_quotes".to_string(),
            "Recite one short famous quote, slightly wrong.".to_string(),
        ),
        (
            "rather_normal".to_string(),
            "Pose one short 'would you rather' question about ordinary situations."
                .to_string(),
        ),
        (
            "rather_games".to_string(),
            "Pose one short 'would you rather' question about video games.".to_string(),
        ),
        (
            "rather_fitness".to_string(),
            "Pose one short 'would you rather' question about fitness.".to_string(),
        ),
    ])
}

/// Command authorization configuration.
///
/// The video allow-list replaces a hardcoded privileged identity; an empty
/// list disables the video command for everyone.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// User ids allowed to run the video command.
    #[serde(default)]
    pub video_allowed_users: Vec<String>,
}

/// Durable-record storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "jukebot.db".to_string()
}

/// Generated-artifact storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsConfig {
    /// Root directory for generated media files.
    #[serde(default = "default_artifacts_root")]
    pub root: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            root: default_artifacts_root(),
        }
    }
}

fn default_artifacts_root() -> String {
    "content".to_string()
}
