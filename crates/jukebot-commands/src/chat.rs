// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chat command: conversational text generation with per-user
//! continuation threading.

use std::collections::HashMap;

use jukebot_context::{CommandInvocation, param_map};
use jukebot_core::types::{DisplayCard, Reply, TextRequest};
use jukebot_core::{JukebotError, ScopeId, UserId};
use serde_json::json;
use tokio::sync::Mutex;

use crate::deps::CommandDeps;

const CHAT_CARD_COLOR: u32 = 1_752_220;

/// Tracks the last response id per user so `keep_chatting` can continue
/// the previous turn.
#[derive(Debug, Default)]
pub struct ThreadTracker {
    threads: Mutex<HashMap<String, String>>,
}

impl ThreadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last response id recorded for the user, if any.
    pub async fn last(&self, user: &UserId) -> Option<String> {
        self.threads.lock().await.get(&user.0).cloned()
    }

    /// Records the user's latest response id.
    pub async fn remember(&self, user: &UserId, response_id: String) {
        self.threads.lock().await.insert(user.0.clone(), response_id);
    }
}

/// Typed request for the chat command.
#[derive(Debug, Clone)]
pub struct ChatCommand {
    pub user: UserId,
    pub scope: ScopeId,
    pub prompt: String,
    /// Continue from the user's previous response.
    pub keep_chatting: bool,
    pub model: Option<String>,
    pub instructions: Option<String>,
}

/// Generates a chat response and replies with the prompt quoted above a
/// response card.
pub async fn chat(deps: &CommandDeps, cmd: ChatCommand) -> Result<(), JukebotError> {
    let instructions = cmd
        .instructions
        .clone()
        .unwrap_or_else(|| deps.config.prompts.chat_instructions.clone());
    let model = cmd
        .model
        .clone()
        .unwrap_or_else(|| deps.config.backend.text_model.clone());

    let mut ctx = CommandInvocation::open(
        cmd.user.clone(),
        cmd.scope.clone(),
        "chat",
        param_map([
            ("chat_prompt", json!(cmd.prompt)),
            ("topic", json!(cmd.user.0)),
            ("custom_instructions", json!(instructions)),
            ("keep_chatting", json!(cmd.keep_chatting)),
            ("model", json!(model)),
        ]),
    );

    let previous_response_id = if cmd.keep_chatting {
        deps.threads.last(&cmd.user).await
    } else {
        None
    };

    let response = match deps
        .backend
        .generate_text(TextRequest {
            prompt: cmd.prompt.clone(),
            instructions: Some(instructions),
            model: Some(model.clone()),
            previous_response_id,
            ..TextRequest::default()
        })
        .await
    {
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

    deps.threads.remember(&cmd.user, response.id.clone()).await;

    let title = format!(
        "`{model}` Response{}",
        if response.previous_response_id.is_some() {
            " (Continued)"
        } else {
            ""
        }
    );
    let card = DisplayCard::new(title, response.text, CHAT_CARD_COLOR);

    deps.channel
        .reply(
            &cmd.scope,
            Reply::text(format!("> {}", cmd.prompt)).with_card(card),
        )
        .await?;

    ctx.save(deps.records.as_ref()).await
}
