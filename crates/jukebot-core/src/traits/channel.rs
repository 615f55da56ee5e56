// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-platform boundary trait.
//!
//! The concrete client (gateway connection, slash-command registration,
//! message and voice I/O primitives) lives outside the core; handlers see
//! only this seam.

use std::path::Path;

use async_trait::async_trait;

use crate::error::JukebotError;
use crate::types::{Reply, ScopeId, UserId};

/// Message and voice operations the command core needs from the chat platform.
#[async_trait]
pub trait ChannelPort: Send + Sync {
    /// Sends a reply (text, display card, attachments) into the scope's
    /// originating text channel.
    async fn reply(&self, scope: &ScopeId, reply: Reply) -> Result<(), JukebotError>;

    /// Plays a local audio file over the scope's active voice connection.
    ///
    /// Callers check [`voice_connected`](Self::voice_connected) first; the
    /// connection may still disappear in between, which surfaces as a
    /// channel error.
    async fn play_audio(&self, scope: &ScopeId, file: &Path) -> Result<(), JukebotError>;

    /// Whether the bot currently holds a voice connection in this scope.
    ///
    /// This is the liveness predicate for the recurring talk loop.
    async fn voice_connected(&self, scope: &ScopeId) -> bool;

    /// Whether the given user is currently in a voice channel in this scope.
    async fn user_in_voice(&self, scope: &ScopeId, user: &UserId) -> bool;

    /// Joins the voice channel the user is currently in.
    async fn join_voice(&self, scope: &ScopeId, user: &UserId) -> Result<(), JukebotError>;

    /// Leaves the scope's voice channel, if connected.
    async fn leave_voice(&self, scope: &ScopeId) -> Result<(), JukebotError>;
}
