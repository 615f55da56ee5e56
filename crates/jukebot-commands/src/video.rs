// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The video command: allow-list gated, optionally director-rewritten,
//! supervised to completion.

use std::time::Duration;

use jukebot_context::{CommandInvocation, param_map};
use jukebot_core::types::Reply;
use jukebot_core::{JukebotError, ScopeId, UserId};
use jukebot_engine::{
    DirectorSettings, GenerationSupervisor, ReferenceSource, VideoJobSpec,
};
use serde_json::json;
use tracing::info;

use crate::deps::{AttachmentRef, CommandDeps};

/// Typed request for the video command.
#[derive(Debug, Clone)]
pub struct VideoCommand {
    pub user: UserId,
    pub scope: ScopeId,
    pub prompt: String,
    pub model: String,
    pub seconds: String,
    pub size: String,
    pub reference: Option<AttachmentRef>,
    pub ai_director: bool,
}

/// Generates a video through the supervisor and replies with the result.
///
/// Only users on the configured allow-list may run this. A terminal job
/// failure replies with the backend's code and message verbatim. The
/// `ai_director` flag is recorded on the context before save.
pub async fn video(deps: &CommandDeps, cmd: VideoCommand) -> Result<(), JukebotError> {
    let mut ctx = CommandInvocation::open(
        cmd.user.clone(),
        cmd.scope.clone(),
        "video",
        param_map([
            ("prompt", json!(cmd.prompt)),
            ("model", json!(cmd.model)),
            ("seconds", json!(cmd.seconds)),
            ("size", json!(cmd.size)),
        ]),
    );

    if !deps
        .config
        .auth
        .video_allowed_users
        .iter()
        .any(|allowed| allowed == &cmd.user.0)
    {
        deps.channel
            .reply(
                &cmd.scope,
                Reply::text("You are not on the allow-list for video generation."),
            )
            .await?;
        return ctx.save(deps.records.as_ref()).await;
    }

    let spec = VideoJobSpec {
        prompt: cmd.prompt.clone(),
        model: cmd.model.clone(),
        seconds: cmd.seconds.clone(),
        size: cmd.size.clone(),
        reference: cmd.reference.clone().map(|attachment| ReferenceSource {
            url: attachment.url,
            file_name: attachment.file_name,
        }),
        director: cmd.ai_director.then(|| DirectorSettings {
            instructions: deps.config.prompts.director_instructions(&cmd.seconds),
            model: None,
        }),
    };

    let mut supervisor = GenerationSupervisor::new(
        deps.backend.clone(),
        deps.artifacts.clone(),
        Duration::from_secs(deps.config.backend.poll_interval_secs),
    );

    match supervisor.run(&mut ctx, spec).await {
        Ok(outcome) => {
            info!(invocation = ctx.id(), files = outcome.files.len(), "video delivered");
            let mut reply = Reply::default().with_card(outcome.card);
            for file in outcome.files {
                reply = reply.with_attachment(file);
            }
            deps.channel.reply(&cmd.scope, reply).await?;
        }
        Err(JukebotError::JobFailed {
            job_id,
            code,
            message,
        }) => {
            deps.channel
                .reply(
                    &cmd.scope,
                    Reply::text(format!(
                        "Video ID, `{job_id}`, has failed.\n\n\
                         ERROR: `{code}`\nMESSAGE: `{message}`\n\n\
                         Guidelines and restrictions for video models: \
                         https://platform.openai.com/docs/guides/video-generation#guardrails-and-restrictions"
                    )),
                )
                .await?;
        }
        Err(JukebotError::PromptRejected { message }) => {
            deps.channel
                .reply(
                    &cmd.scope,
                    Reply::text(format!(
                        "Your prompt:\n> {}\nWas rejected at submission: {message}",
                        cmd.prompt
                    )),
                )
                .await?;
        }
        Err(e) => return Err(e),
    }

    ctx.set_param("ai_director", json!(cmd.ai_director));
    ctx.save(deps.records.as_ref()).await
}
