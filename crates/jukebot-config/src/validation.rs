// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and usable polling intervals.

use crate::diagnostic::ConfigError;
use crate::model::JukebotConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &JukebotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.artifacts.root.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "artifacts.root must not be empty".to_string(),
        });
    }

    if config.backend.poll_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.poll_interval_secs must be at least 1".to_string(),
        });
    }

    if config.backend.max_output_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.max_output_tokens must be at least 1".to_string(),
        });
    }

    // Validate model names are non-empty
    for (key, value) in [
        ("backend.text_model", &config.backend.text_model),
        ("backend.vision_model", &config.backend.vision_model),
        ("backend.image_model", &config.backend.image_model),
        ("backend.speech_model", &config.backend.speech_model),
        ("backend.video_model", &config.backend.video_model),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
