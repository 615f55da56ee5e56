// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The image command: prompt-to-image with a daily quota on the
//! constrained model family.

use base64::Engine as _;
use jukebot_context::{CommandInvocation, param_map};
use jukebot_core::types::{DisplayCard, ImageRequest, Reply};
use jukebot_core::{JukebotError, ScopeId, UserId};
use serde_json::json;
use tracing::info;

use crate::deps::CommandDeps;

const IMAGE_CARD_COLOR: u32 = 10_181_046;

/// Model family that is quota-gated and supports background/moderation
/// options.
const CONSTRAINED_FAMILY: &str = "gpt-image-1";

/// Typed request for the image command.
#[derive(Debug, Clone)]
pub struct ImageCommand {
    pub user: UserId,
    pub scope: ScopeId,
    pub prompt: String,
    pub model: String,
    pub background: String,
}

/// Generates an image and replies with it as a card attachment.
///
/// The constrained family passes the daily quota gate before submission;
/// a content-policy rejection echoes the prompt back to the user. Every
/// terminal path saves the invocation record.
pub async fn image(deps: &CommandDeps, cmd: ImageCommand) -> Result<(), JukebotError> {
    let mut ctx = CommandInvocation::open(
        cmd.user.clone(),
        cmd.scope.clone(),
        "image",
        param_map([
            ("prompt", json!(cmd.prompt)),
            ("model", json!(cmd.model)),
            ("background", json!(cmd.background)),
        ]),
    );

    let mut card = DisplayCard::new(
        format!("`{}` Image Generation", cmd.model),
        format!("### User Input:\n> {}", cmd.prompt),
        IMAGE_CARD_COLOR,
    );

    let constrained = cmd.model.contains(CONSTRAINED_FAMILY);
    let mut request = ImageRequest {
        prompt: cmd.prompt.clone(),
        model: cmd.model.clone(),
        background: None,
        moderation: None,
        response_format: None,
    };

    if constrained {
        let limit = deps.config.limits.image_daily_limit;
        if !deps.quota.check_and_increment(&cmd.scope, &cmd.model, limit) {
            deps.channel
                .reply(
                    &cmd.scope,
                    Reply::text(format!(
                        "`{}` has been used too much today. Try again tomorrow!",
                        cmd.model
                    )),
                )
                .await?;
            return ctx.save(deps.records.as_ref()).await;
        }

        request.background = Some(cmd.background.clone());
        request.moderation = Some("low".to_string());

        // Usage footer for the flagship constrained model only.
        if cmd.model == CONSTRAINED_FAMILY
            && let Some(count) = deps.quota.usage(&cmd.scope, &cmd.model)
        {
            card.footer = Some(format!(
                "Used {count} out of {limit} image generations with {} today.",
                cmd.model
            ));
        }
    } else {
        // The legacy family returns inline base64 only on request and has
        // no background option.
        request.response_format = Some("b64_json".to_string());
    }

    let response = match deps.backend.generate_image(request).await {
        Ok(response) => response,
        Err(JukebotError::PromptRejected { .. }) => {
            deps.channel
                .reply(
                    &cmd.scope,
                    Reply::text(format!(
                        "Your prompt:\n> {}\nProbably violated the content policy. \
                         Clean up your act.",
                        cmd.prompt
                    )),
                )
                .await?;
            return ctx.save(deps.records.as_ref()).await;
        }
        Err(e) => return Err(e),
    };

    let Some(generated) = response.images.first() else {
        return Err(JukebotError::Backend {
            message: "backend returned no images".to_string(),
            source: None,
        });
    };
    let Some(b64) = &generated.b64_data else {
        return Err(JukebotError::Backend {
            message: "backend returned no inline image data".to_string(),
            source: None,
        });
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| JukebotError::Backend {
            message: format!("invalid base64 image data: {e}"),
            source: Some(Box::new(e)),
        })?;

    let file_name = format!("{}-{}.png", cmd.model, response.created);
    let path = deps.artifacts.write(ctx.id(), &file_name, &bytes).await?;
    info!(invocation = ctx.id(), file = %path.display(), "image generated");

    card.image_attachment = Some(file_name);
    if let Some(revised) = &generated.revised_prompt {
        card.footer = Some(format!("Revised Prompt:\n{revised}"));
    }

    deps.channel
        .reply(&cmd.scope, Reply::default().with_card(card).with_attachment(path))
        .await?;

    ctx.save(deps.records.as_ref()).await
}
