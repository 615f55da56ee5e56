// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice commands: say, rather, talk, join, leave.

use std::time::Duration;

use jukebot_context::{CommandInvocation, param_map};
use jukebot_core::types::{Reply, SpeechRequest};
use jukebot_core::{JukebotError, ScopeId, UserId};
use jukebot_engine::{TalkLoop, TalkSpec, generate_spoken_reply};
use serde_json::json;
use tracing::info;

use crate::deps::CommandDeps;

/// Typed request for the say command.
#[derive(Debug, Clone)]
pub struct SayCommand {
    pub user: UserId,
    pub scope: ScopeId,
    pub text: String,
    pub voice: Option<String>,
}

/// Speaks the given text: synthesizes audio, plays it when a voice
/// connection is up, and attaches the file to the reply.
pub async fn say(deps: &CommandDeps, cmd: SayCommand) -> Result<(), JukebotError> {
    let voice = cmd
        .voice
        .clone()
        .unwrap_or_else(|| deps.config.backend.speech_voice.clone());

    let mut ctx = CommandInvocation::open(
        cmd.user.clone(),
        cmd.scope.clone(),
        "say",
        param_map([
            ("text_to_speech", json!(cmd.text)),
            ("voice", json!(voice)),
        ]),
    );

    let audio = deps
        .backend
        .synthesize_speech(SpeechRequest {
            text: cmd.text.clone(),
            voice,
            model: deps.config.backend.speech_model.clone(),
            format: Some("wav".to_string()),
        })
        .await?;

    let file_name = format!("{}.wav", chrono::Utc::now().format("%Y%m%d%H%M%S"));
    let path = deps.artifacts.write(ctx.id(), &file_name, &audio).await?;

    if deps.channel.voice_connected(&cmd.scope).await {
        deps.channel.play_audio(&cmd.scope, &path).await?;
    }

    deps.channel
        .reply(
            &cmd.scope,
            Reply::text(cmd.text.clone()).with_attachment(path),
        )
        .await?;

    ctx.save(deps.records.as_ref()).await
}

/// Typed request for the rather command.
#[derive(Debug, Clone)]
pub struct RatherCommand {
    pub user: UserId,
    pub scope: ScopeId,
    /// Topic suffix, e.g. "normal" -> prompt key "rather_normal".
    pub topic: String,
}

/// Generates a spoken hypothetical question for the topic and replies
/// with it, playing over voice when connected.
pub async fn rather(deps: &CommandDeps, cmd: RatherCommand) -> Result<(), JukebotError> {
    let topic_key = format!("rather_{}", cmd.topic);

    let mut ctx = CommandInvocation::open(
        cmd.user.clone(),
        cmd.scope.clone(),
        "rather",
        param_map([("topic", json!(topic_key))]),
    );

    let Some(prompt) = deps.config.prompts.topic(&topic_key).map(str::to_string) else {
        deps.channel
            .reply(
                &cmd.scope,
                Reply::text(format!("No prompt configured for topic `{topic_key}`.")),
            )
            .await?;
        return ctx.save(deps.records.as_ref()).await;
    };

    let spoken = generate_spoken_reply(
        deps.backend.as_ref(),
        &deps.artifacts,
        &mut ctx,
        &prompt,
        &deps.speech_settings(None),
    )
    .await?;

    if deps.channel.voice_connected(&cmd.scope).await {
        deps.channel.play_audio(&cmd.scope, &spoken.audio_path).await?;
    }

    deps.channel
        .reply(
            &cmd.scope,
            Reply::text(spoken.text.clone()).with_attachment(spoken.audio_path.clone()),
        )
        .await?;

    ctx.save(deps.records.as_ref()).await
}

/// Typed request for the talk command.
#[derive(Debug, Clone)]
pub struct TalkCommand {
    pub user: UserId,
    pub scope: ScopeId,
    /// Topic suffix, e.g. "nonsense" -> prompt key "talk_nonsense".
    pub topic: String,
    pub wait_minutes: f64,
}

/// Starts the recurring talk loop for the scope.
///
/// Precondition: the bot must already hold a voice connection in the
/// scope, otherwise the loop never starts and the failure is reported.
/// A second talk invocation for the same scope replaces the first (the
/// registry cancels the old session's token).
pub async fn talk(deps: &CommandDeps, cmd: TalkCommand) -> Result<(), JukebotError> {
    let topic_key = format!("talk_{}", cmd.topic);

    let mut ctx = CommandInvocation::open(
        cmd.user.clone(),
        cmd.scope.clone(),
        "talk",
        param_map([
            ("topic", json!(topic_key)),
            ("wait_minutes", json!(cmd.wait_minutes)),
        ]),
    );

    let Some(prompt) = deps.config.prompts.topic(&topic_key).map(str::to_string) else {
        deps.channel
            .reply(
                &cmd.scope,
                Reply::text(format!("No prompt configured for topic `{topic_key}`.")),
            )
            .await?;
        return ctx.save(deps.records.as_ref()).await;
    };

    if !deps.channel.voice_connected(&cmd.scope).await {
        deps.channel
            .reply(
                &cmd.scope,
                Reply::text("I must be in a voice channel before you use this command."),
            )
            .await?;
        return ctx.save(deps.records.as_ref()).await;
    }

    deps.channel
        .reply(&cmd.scope, Reply::text("Starting talk loop."))
        .await?;

    let handle = deps.talks.begin(&cmd.scope).await;
    let talk_loop = TalkLoop::new(
        deps.backend.clone(),
        deps.artifacts.clone(),
        deps.channel.clone(),
    );
    let spec = TalkSpec {
        topic: topic_key,
        prompt,
        interval: Duration::from_secs_f64(cmd.wait_minutes * 60.0),
        speech: deps.speech_settings(None),
    };

    let result = talk_loop.run(&mut ctx, &spec, handle.token.clone()).await;
    deps.talks.finish(&cmd.scope, &handle).await;

    match result {
        Ok(cycles) => {
            info!(scope = %cmd.scope, cycles, "talk loop finished");
            ctx.set_param("cycles", json!(cycles));
            ctx.save(deps.records.as_ref()).await
        }
        Err(e) => {
            deps.channel
                .reply(
                    &cmd.scope,
                    Reply::text("The talk loop hit an error and stopped."),
                )
                .await?;
            ctx.save(deps.records.as_ref()).await?;
            Err(e)
        }
    }
}

/// Joins the voice channel the invoking user is in.
///
/// The early-return path ("user is not in a voice channel") still saves
/// the invocation record.
pub async fn join(deps: &CommandDeps, user: UserId, scope: ScopeId) -> Result<(), JukebotError> {
    let mut ctx = CommandInvocation::open(user.clone(), scope.clone(), "join", param_map([]));

    if deps.channel.user_in_voice(&scope, &user).await {
        deps.channel.join_voice(&scope, &user).await?;
        deps.channel
            .reply(&scope, Reply::text("I have joined the voice chat."))
            .await?;
    } else {
        deps.channel
            .reply(&scope, Reply::text(format!("{user} is not in a voice channel.")))
            .await?;
    }

    ctx.save(deps.records.as_ref()).await
}

/// Leaves the scope's voice channel, if connected.
pub async fn leave(deps: &CommandDeps, user: UserId, scope: ScopeId) -> Result<(), JukebotError> {
    let mut ctx = CommandInvocation::open(user, scope.clone(), "leave", param_map([]));

    if deps.channel.voice_connected(&scope).await {
        deps.channel.leave_voice(&scope).await?;
        deps.channel
            .reply(&scope, Reply::text("I have left the voice chat."))
            .await?;
    }

    ctx.save(deps.records.as_ref()).await
}
