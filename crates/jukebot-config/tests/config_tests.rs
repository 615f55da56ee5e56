// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Jukebot configuration system.

use jukebot_config::diagnostic::{ConfigError, suggest_key};
use jukebot_config::model::JukebotConfig;
use jukebot_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_jukebot_config() {
    let toml = r#"
[agent]
name = "test-bot"
log_level = "debug"

[backend]
api_key = "sk-test-123"
text_model = "gpt-4.1"
video_model = "sora-2-pro"
poll_interval_secs = 2

[limits]
image_daily_limit = 5

[auth]
video_allowed_users = ["42", "43"]

[storage]
database_path = "/tmp/test.db"

[artifacts]
root = "/tmp/content"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-bot");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.backend.api_key.as_deref(), Some("sk-test-123"));
    assert_eq!(config.backend.text_model, "gpt-4.1");
    assert_eq!(config.backend.video_model, "sora-2-pro");
    assert_eq!(config.backend.poll_interval_secs, 2);
    assert_eq!(config.limits.image_daily_limit, 5);
    assert_eq!(config.auth.video_allowed_users, vec!["42", "43"]);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert_eq!(config.artifacts.root, "/tmp/content");
}

/// Unknown field in [backend] section produces an error.
#[test]
fn unknown_field_in_backend_produces_error() {
    let toml = r#"
[backend]
image_modle = "gpt-image-1"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("image_modle"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "jukebot");
    assert_eq!(config.agent.log_level, "info");
    assert!(config.backend.api_key.is_none());
    assert_eq!(config.backend.image_model, "gpt-image-1-mini");
    assert_eq!(config.backend.speech_voice, "onyx");
    assert_eq!(config.backend.poll_interval_secs, 5);
    assert_eq!(config.limits.image_daily_limit, 3);
    assert!(config.auth.video_allowed_users.is_empty());
    assert_eq!(config.storage.database_path, "jukebot.db");
    assert_eq!(config.artifacts.root, "content");
}

/// Env-style dotted overrides win over TOML values.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let toml_content = r#"
[agent]
name = "from-toml"
"#;

    let config: JukebotConfig = Figment::new()
        .merge(Serialized::defaults(JukebotConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("agent.name", "envtest"))
        .extract()
        .expect("should merge env override");

    assert_eq!(config.agent.name, "envtest");
}

/// JUKEBOT_BACKEND_API_KEY maps to backend.api_key
/// (NOT backend.api.key -- the env provider maps sections explicitly).
#[test]
fn dotted_override_sets_backend_api_key() {
    use figment::{Figment, providers::Serialized};

    let config: JukebotConfig = Figment::new()
        .merge(Serialized::defaults(JukebotConfig::default()))
        .merge(("backend.api_key", "xyz-from-env"))
        .extract()
        .expect("should set api_key via dot notation");

    assert_eq!(config.backend.api_key.as_deref(), Some("xyz-from-env"));
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: JukebotConfig = Figment::new()
        .merge(Serialized::defaults(JukebotConfig::default()))
        .merge(Toml::file("/nonexistent/path/jukebot.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.agent.name, "jukebot");
}

/// Topic prompts can be extended from TOML.
#[test]
fn topic_prompts_extend_from_toml() {
    let toml = r#"
[prompts.topics]
talk_history = "Share one short dubious historical fact."
"#;

    let config = load_config_from_str(toml).expect("topic map should parse");
    assert_eq!(
        config.prompts.topic("talk_history"),
        Some("Share one short dubious historical fact.")
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[telemetry]
level = "debug"
"#;

    let err =
        load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("telemetry"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown key "image_modle" produces suggestion "did you mean `image_model`?"
#[test]
fn diagnostic_error_includes_unknown_key() {
    let toml = r#"
[backend]
image_modle = "gpt-image-1"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    assert!(!errors.is_empty(), "should have at least one error");

    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "image_modle"
                && suggestion.as_deref() == Some("image_model")
                && valid_keys.contains("image_model")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'image_modle' with suggestion, got: {errors:?}"
    );
}

/// Invalid type (string where number expected) produces clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[limits]
image_daily_limit = "not_a_number"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("image_daily_limit"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// ConfigError implements miette::Diagnostic (can be rendered).
#[test]
fn config_error_implements_diagnostic() {
    use miette::Diagnostic;

    let error = ConfigError::UnknownKey {
        key: "image_modle".to_string(),
        suggestion: Some("image_model".to_string()),
        valid_keys: "image_model, text_model, speech_voice".to_string(),
        span: None,
        src: None,
    };

    let code = error.code();
    assert!(code.is_some(), "should have diagnostic code");

    let help = error.help();
    assert!(help.is_some(), "should have help text");
    let help_str = help.unwrap().to_string();
    assert!(
        help_str.contains("did you mean `image_model`"),
        "help should contain suggestion, got: {help_str}"
    );
}

/// load_and_validate_str with valid TOML returns Ok config.
#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[agent]
name = "test"
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.agent.name, "test");
}

/// Validation catches zero poll interval.
#[test]
fn validation_catches_zero_poll_interval() {
    let toml = r#"
[backend]
poll_interval_secs = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero interval should fail");
    let has_validation_error = errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("poll_interval_secs"))
    });
    assert!(
        has_validation_error,
        "should have validation error for zero poll interval"
    );
}

/// suggest_key matches close typos only.
#[test]
fn suggest_key_threshold() {
    let valid = &["video_allowed_users"];
    assert_eq!(
        suggest_key("video_alowed_users", valid),
        Some("video_allowed_users".to_string())
    );
    assert_eq!(suggest_key("qqq", valid), None);
}
