// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end command-flow tests over mocked boundaries.

use std::sync::Arc;

use jukebot_commands::{
    AttachmentRef, ChatCommand, CommandDeps, ImageCommand, RatherCommand, SayCommand,
    TalkCommand, ThreadTracker, VideoCommand, VisionCommand,
};
use jukebot_config::JukebotConfig;
use jukebot_core::types::JobStatus;
use jukebot_core::{ScopeId, UserId};
use jukebot_engine::TalkRegistry;
use jukebot_media::ArtifactStore;
use jukebot_quota::QuotaTracker;
use jukebot_test_utils::{MemoryRecordStore, MockBackend, MockChannel};
use serde_json::json;

struct Harness {
    deps: CommandDeps,
    backend: Arc<MockBackend>,
    channel: Arc<MockChannel>,
    records: Arc<MemoryRecordStore>,
    _artifacts_dir: tempfile::TempDir,
}

fn harness(configure: impl FnOnce(&mut JukebotConfig)) -> Harness {
    let artifacts_dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MockBackend::new());
    let channel = Arc::new(MockChannel::new());
    let records = Arc::new(MemoryRecordStore::new());
    let mut config = JukebotConfig::default();
    configure(&mut config);

    let deps = CommandDeps {
        channel: channel.clone(),
        backend: backend.clone(),
        records: records.clone(),
        artifacts: Arc::new(ArtifactStore::new(artifacts_dir.path()).unwrap()),
        quota: Arc::new(QuotaTracker::new()),
        talks: Arc::new(TalkRegistry::new()),
        threads: Arc::new(ThreadTracker::new()),
        config: Arc::new(config),
    };

    Harness {
        deps,
        backend,
        channel,
        records,
        _artifacts_dir: artifacts_dir,
    }
}

fn user() -> UserId {
    UserId("42".into())
}

fn scope() -> ScopeId {
    ScopeId("G1".into())
}

fn image_command(model: &str) -> ImageCommand {
    ImageCommand {
        user: user(),
        scope: scope(),
        prompt: "a cat in a hat".into(),
        model: model.into(),
        background: "auto".into(),
    }
}

#[tokio::test]
async fn image_quota_admits_exactly_the_limit() {
    let h = harness(|c| c.limits.image_daily_limit = 3);

    for _ in 0..4 {
        jukebot_commands::image(&h.deps, image_command("gpt-image-1"))
            .await
            .unwrap();
    }

    let replies = h.channel.replies().await;
    assert_eq!(replies.len(), 4);
    // First three carry the generated image card.
    for reply in &replies[..3] {
        assert!(reply.1.card.is_some());
        assert_eq!(reply.1.attachments.len(), 1);
    }
    // The fourth is the quota denial.
    assert!(
        replies[3]
            .1
            .text
            .as_deref()
            .is_some_and(|t| t.contains("used too much today"))
    );

    // Every terminal path saved its record.
    assert_eq!(h.records.len().await, 4);
}

#[tokio::test]
async fn image_usage_footer_reports_count() {
    let h = harness(|c| c.limits.image_daily_limit = 3);

    jukebot_commands::image(&h.deps, image_command("gpt-image-1"))
        .await
        .unwrap();

    let replies = h.channel.replies().await;
    let card = replies[0].1.card.as_ref().unwrap();
    assert!(
        card.footer
            .as_deref()
            .is_some_and(|f| f.contains("Used 1 out of 3")),
        "footer: {:?}",
        card.footer
    );
}

#[tokio::test]
async fn legacy_image_model_skips_the_quota_gate() {
    let h = harness(|c| c.limits.image_daily_limit = 1);

    for _ in 0..3 {
        jukebot_commands::image(&h.deps, image_command("dall-e-3"))
            .await
            .unwrap();
    }

    let replies = h.channel.replies().await;
    assert_eq!(replies.len(), 3);
    assert!(replies.iter().all(|r| r.1.card.is_some()));
}

#[tokio::test]
async fn image_policy_rejection_echoes_prompt_and_saves() {
    let h = harness(|_| {});
    h.backend.reject_next_image("safety system").await;

    jukebot_commands::image(&h.deps, image_command("dall-e-3"))
        .await
        .unwrap();

    let replies = h.channel.replies().await;
    let text = replies[0].1.text.as_deref().unwrap();
    assert!(text.contains("a cat in a hat"));
    assert!(text.contains("content policy"));
    assert_eq!(h.records.len().await, 1);
}

fn video_command(ai_director: bool) -> VideoCommand {
    VideoCommand {
        user: user(),
        scope: scope(),
        prompt: "a cat on a motorcycle".into(),
        model: "sora-2".into(),
        seconds: "4".into(),
        size: "1280x720".into(),
        reference: None,
        ai_director,
    }
}

#[tokio::test]
async fn video_requires_allow_list_membership() {
    // Default config: empty allow-list.
    let h = harness(|_| {});

    jukebot_commands::video(&h.deps, video_command(false))
        .await
        .unwrap();

    let replies = h.channel.replies().await;
    assert!(
        replies[0]
            .1
            .text
            .as_deref()
            .is_some_and(|t| t.contains("allow-list"))
    );
    assert_eq!(h.backend.submit_call_count(), 0, "no job submitted");
    assert_eq!(h.records.len().await, 1, "early return still saves");
}

#[tokio::test]
async fn video_with_director_delivers_files_and_records_flags() {
    let h = harness(|c| {
        c.auth.video_allowed_users = vec!["42".into()];
        c.backend.poll_interval_secs = 1;
    });
    h.backend.push_text("a detailed dolly shot").await;

    jukebot_commands::video(&h.deps, video_command(true))
        .await
        .unwrap();

    let replies = h.channel.replies().await;
    let reply = &replies[0].1;
    assert!(reply.card.as_ref().unwrap().body.contains("AI Director"));
    // Video artifact plus director prompt text.
    assert_eq!(reply.attachments.len(), 2);

    let records = h.records.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].params.get("ai_director"), Some(&json!(true)));
    // The rewritten prompt was threaded onto the record.
    assert_eq!(
        records[0].params.get("prompt"),
        Some(&json!("a detailed dolly shot"))
    );
}

#[tokio::test]
async fn video_job_failure_replies_with_backend_detail() {
    let h = harness(|c| {
        c.auth.video_allowed_users = vec!["42".into()];
        c.backend.poll_interval_secs = 1;
    });
    h.backend
        .set_job_error("moderation_blocked", "blocked by guardrails")
        .await;
    h.backend.push_poll_status(JobStatus::Failed).await;

    jukebot_commands::video(&h.deps, video_command(false))
        .await
        .unwrap();

    let replies = h.channel.replies().await;
    let text = replies[0].1.text.as_deref().unwrap();
    assert!(text.contains("moderation_blocked"));
    assert!(text.contains("blocked by guardrails"));
    assert_eq!(h.records.len().await, 1);
}

#[tokio::test]
async fn talk_precondition_failure_saves_and_runs_no_cycles() {
    let h = harness(|_| {});
    // Voice predicate defaults to false.

    jukebot_commands::talk(
        &h.deps,
        TalkCommand {
            user: user(),
            scope: scope(),
            topic: "nonsense".into(),
            wait_minutes: 5.0,
        },
    )
    .await
    .unwrap();

    let replies = h.channel.replies().await;
    assert!(
        replies[0]
            .1
            .text
            .as_deref()
            .is_some_and(|t| t.contains("voice channel"))
    );
    assert_eq!(h.backend.speech_call_count(), 0);
    assert_eq!(h.records.len().await, 1);
}

#[tokio::test]
async fn talk_runs_cycles_until_predicate_goes_false() {
    let h = harness(|_| {});
    // One check in the handler precondition, then one per cycle.
    h.channel
        .script_voice_connected(&[true, true, true, false])
        .await;

    jukebot_commands::talk(
        &h.deps,
        TalkCommand {
            user: user(),
            scope: scope(),
            topic: "nonsense".into(),
            wait_minutes: 0.0001,
        },
    )
    .await
    .unwrap();

    // "Starting talk loop." plus two spoken lines.
    let replies = h.channel.replies().await;
    assert_eq!(replies.len(), 3);
    assert_eq!(h.channel.played().await.len(), 2);

    let records = h.records.records().await;
    assert_eq!(records[0].params.get("cycles"), Some(&json!(2)));
    assert!(!h.deps.talks.is_active(&scope()).await, "handle cleared");
}

#[tokio::test]
async fn chat_keep_chatting_continues_the_thread() {
    let h = harness(|_| {});
    h.backend.push_text("first answer").await;
    h.backend.push_text("second answer").await;

    let command = |keep| ChatCommand {
        user: user(),
        scope: scope(),
        prompt: "tell me more".into(),
        keep_chatting: keep,
        model: None,
        instructions: None,
    };

    jukebot_commands::chat(&h.deps, command(false)).await.unwrap();
    jukebot_commands::chat(&h.deps, command(true)).await.unwrap();

    let replies = h.channel.replies().await;
    let first_card = replies[0].1.card.as_ref().unwrap();
    let second_card = replies[1].1.card.as_ref().unwrap();
    assert!(!first_card.title.contains("Continued"));
    assert!(second_card.title.contains("Continued"));
    assert_eq!(second_card.body, "second answer");
}

#[tokio::test]
async fn say_plays_audio_when_voice_is_connected() {
    let h = harness(|_| {});
    h.channel.set_voice_connected(true);

    jukebot_commands::say(
        &h.deps,
        SayCommand {
            user: user(),
            scope: scope(),
            text: "hello everyone".into(),
            voice: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(h.channel.played().await.len(), 1);
    let replies = h.channel.replies().await;
    assert_eq!(replies[0].1.text.as_deref(), Some("hello everyone"));
    assert_eq!(replies[0].1.attachments.len(), 1);
    assert_eq!(h.records.len().await, 1);
}

#[tokio::test]
async fn rather_generates_a_spoken_question() {
    let h = harness(|_| {});
    h.backend.push_text("Would you rather fly or swim?").await;

    jukebot_commands::rather(
        &h.deps,
        RatherCommand {
            user: user(),
            scope: scope(),
            topic: "normal".into(),
        },
    )
    .await
    .unwrap();

    let replies = h.channel.replies().await;
    assert_eq!(
        replies[0].1.text.as_deref(),
        Some("Would you rather fly or swim?")
    );
    let records = h.records.records().await;
    assert_eq!(
        records[0].params.get("tts"),
        Some(&json!("Would you rather fly or swim?"))
    );
}

#[tokio::test]
async fn join_early_return_still_saves() {
    let h = harness(|_| {});
    // User not in voice.

    jukebot_commands::join(&h.deps, user(), scope()).await.unwrap();

    let replies = h.channel.replies().await;
    assert!(
        replies[0]
            .1
            .text
            .as_deref()
            .is_some_and(|t| t.contains("not in a voice channel"))
    );
    assert_eq!(h.records.len().await, 1);
}

#[tokio::test]
async fn vision_describes_image_and_cleans_up_the_download() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
        .mount(&server)
        .await;

    let h = harness(|_| {});
    h.backend.push_text("A photo of a lighthouse.").await;

    jukebot_commands::vision(
        &h.deps,
        VisionCommand {
            user: user(),
            scope: scope(),
            attachment: AttachmentRef {
                url: format!("{}/photo.png", server.uri()),
                file_name: "photo.png".into(),
            },
            prompt: None,
        },
    )
    .await
    .unwrap();

    let replies = h.channel.replies().await;
    let card = replies[0].1.card.as_ref().unwrap();
    assert_eq!(card.footer.as_deref(), Some("A photo of a lighthouse."));
    assert_eq!(card.image_attachment.as_deref(), Some("photo.png"));

    // The re-displayed download was transient.
    let downloads = h._artifacts_dir.path().join("downloads").join("photo.png");
    assert!(!downloads.exists(), "vision download deleted after reply");
}
