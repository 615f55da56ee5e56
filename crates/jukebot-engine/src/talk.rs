// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timer-driven repeat of a generate+emit cycle, gated by voice presence.
//!
//! Each cycle re-checks the liveness predicate (the bot's voice connection
//! in the scope); when it goes false the loop stops cleanly -- that is the
//! expected termination path, not an error. The interval wait races a
//! [`CancellationToken`] so a replacing invocation or shutdown stops the
//! loop without leaking the task.

use std::sync::Arc;
use std::time::Duration;

use jukebot_context::CommandInvocation;
use jukebot_core::types::Reply;
use jukebot_core::{ChannelPort, GenerationBackend, JukebotError};
use jukebot_media::ArtifactStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::speech::{SpeechSettings, generate_spoken_reply};

/// Parameters of one talk session.
#[derive(Debug, Clone)]
pub struct TalkSpec {
    /// Topic key, e.g. "talk_nonsense" (recorded on the invocation).
    pub topic: String,
    /// Resolved topic prompt fed to each cycle's generation step.
    pub prompt: String,
    /// Pause between cycles.
    pub interval: Duration,
    pub speech: SpeechSettings,
}

/// Runs the recurring generate+emit cycle for one scope.
///
/// The loop owns no exclusive resource: the voice connection is shared
/// with one-shot commands and may disappear between iterations, which the
/// per-cycle predicate check absorbs.
pub struct TalkLoop {
    backend: Arc<dyn GenerationBackend>,
    artifacts: Arc<ArtifactStore>,
    channel: Arc<dyn ChannelPort>,
}

impl TalkLoop {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        artifacts: Arc<ArtifactStore>,
        channel: Arc<dyn ChannelPort>,
    ) -> Self {
        Self {
            backend,
            artifacts,
            channel,
        }
    }

    /// Runs cycles until the liveness predicate goes false or `cancel`
    /// fires. Returns the number of completed cycles.
    ///
    /// A failure inside a cycle's generation or emit step is logged and
    /// stops the loop with the error surfaced to the caller, so the
    /// handler can send a terminal message.
    pub async fn run(
        &self,
        ctx: &mut CommandInvocation,
        spec: &TalkSpec,
        cancel: CancellationToken,
    ) -> Result<u32, JukebotError> {
        let scope = ctx.scope().clone();
        let mut cycles = 0u32;

        loop {
            if cancel.is_cancelled() {
                info!(scope = %scope, cycles, "talk loop cancelled");
                break;
            }

            // Liveness predicate: stop cleanly once the voice connection
            // for this scope is gone.
            if !self.channel.voice_connected(&scope).await {
                info!(scope = %scope, cycles, "voice connection gone, talk loop stopping");
                break;
            }

            let spoken = generate_spoken_reply(
                self.backend.as_ref(),
                &self.artifacts,
                ctx,
                &spec.prompt,
                &spec.speech,
            )
            .await
            .inspect_err(|e| {
                warn!(scope = %scope, error = %e, "talk cycle generation failed, stopping loop");
            })?;

            self.channel.play_audio(&scope, &spoken.audio_path).await?;
            self.channel
                .reply(
                    &scope,
                    Reply::text(spoken.text.clone()).with_attachment(spoken.audio_path.clone()),
                )
                .await?;

            cycles += 1;
            debug!(scope = %scope, cycles, "talk cycle complete");

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(scope = %scope, cycles, "talk loop cancelled during wait");
                    break;
                }
                _ = tokio::time::sleep(spec.interval) => {}
            }
        }

        Ok(cycles)
    }
}
