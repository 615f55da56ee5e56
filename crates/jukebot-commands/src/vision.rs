// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The vision command: describe an attached image with a text prompt.

use jukebot_context::{CommandInvocation, param_map};
use jukebot_core::types::{DisplayCard, Reply, TextRequest};
use jukebot_core::{JukebotError, ScopeId, UserId};
use jukebot_media::{BROWSER_USER_AGENT, TempFile};
use serde_json::json;

use crate::deps::{AttachmentRef, CommandDeps};

const VISION_CARD_COLOR: u32 = 5_763_719;

/// Typed request for the vision command.
#[derive(Debug, Clone)]
pub struct VisionCommand {
    pub user: UserId,
    pub scope: ScopeId,
    pub attachment: AttachmentRef,
    /// Falls back to the configured vision prompt when empty.
    pub prompt: Option<String>,
}

/// Interprets an attached image and replies with a card: the image
/// re-displayed, the description in the footer.
///
/// The image is re-downloaded for display and deleted after the reply is
/// sent (scoped temp-file guard).
pub async fn vision(deps: &CommandDeps, cmd: VisionCommand) -> Result<(), JukebotError> {
    let prompt = cmd
        .prompt
        .clone()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| deps.config.prompts.vision.clone());

    let mut ctx = CommandInvocation::open(
        cmd.user.clone(),
        cmd.scope.clone(),
        "vision",
        param_map([
            ("vision_prompt", json!(prompt)),
            ("attachment", json!(cmd.attachment.file_name)),
        ]),
    );

    let response = deps
        .backend
        .generate_text(TextRequest {
            prompt: prompt.clone(),
            model: Some(deps.config.backend.vision_model.clone()),
            image_url: Some(cmd.attachment.url.clone()),
            max_output_tokens: Some(deps.config.backend.max_output_tokens),
            ..TextRequest::default()
        })
        .await?;

    // Re-download the image so the reply can display it; the local copy
    // is transient and deleted once the guard drops.
    let temp = TempFile::adopt(
        deps.artifacts
            .download(
                &cmd.attachment.url,
                &cmd.attachment.file_name,
                &[("User-Agent", BROWSER_USER_AGENT)],
            )
            .await?,
    );

    let mut card = DisplayCard::new(
        "Vision Response",
        format!("User Input:\n```{prompt}```"),
        VISION_CARD_COLOR,
    );
    card.image_attachment = Some(cmd.attachment.file_name.clone());
    card.footer = Some(response.text);

    deps.channel
        .reply(
            &cmd.scope,
            Reply::default()
                .with_card(card)
                .with_attachment(temp.path().to_path_buf()),
        )
        .await?;
    drop(temp);

    ctx.save(deps.records.as_ref()).await
}
