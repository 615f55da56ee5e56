// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat-platform channel for deterministic testing.
//!
//! `MockChannel` records replies and played audio, and answers the voice
//! liveness predicate from a scripted sequence so recurring-loop tests can
//! control exactly how many cycles run.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use jukebot_core::types::Reply;
use jukebot_core::{ChannelPort, JukebotError, ScopeId, UserId};

/// A mock channel that captures outbound traffic.
pub struct MockChannel {
    replies: Mutex<Vec<(ScopeId, Reply)>>,
    played: Mutex<Vec<PathBuf>>,
    /// Scripted answers for `voice_connected`, popped per check.
    voice_script: Mutex<VecDeque<bool>>,
    /// Fallback answer once the script is exhausted.
    voice_default: AtomicBool,
    user_in_voice: AtomicBool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            played: Mutex::new(Vec::new()),
            voice_script: Mutex::new(VecDeque::new()),
            voice_default: AtomicBool::new(false),
            user_in_voice: AtomicBool::new(false),
        }
    }

    /// Script the next answers of the voice liveness predicate.
    pub async fn script_voice_connected(&self, answers: &[bool]) {
        self.voice_script.lock().await.extend(answers.iter().copied());
    }

    /// Set the fallback voice-connected answer.
    pub fn set_voice_connected(&self, connected: bool) {
        self.voice_default.store(connected, Ordering::SeqCst);
    }

    /// Set whether the invoking user is in a voice channel.
    pub fn set_user_in_voice(&self, in_voice: bool) {
        self.user_in_voice.store(in_voice, Ordering::SeqCst);
    }

    /// All captured replies.
    pub async fn replies(&self) -> Vec<(ScopeId, Reply)> {
        self.replies.lock().await.clone()
    }

    /// All audio files played, in order.
    pub async fn played(&self) -> Vec<PathBuf> {
        self.played.lock().await.clone()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelPort for MockChannel {
    async fn reply(&self, scope: &ScopeId, reply: Reply) -> Result<(), JukebotError> {
        self.replies.lock().await.push((scope.clone(), reply));
        Ok(())
    }

    async fn play_audio(&self, _scope: &ScopeId, file: &Path) -> Result<(), JukebotError> {
        self.played.lock().await.push(file.to_path_buf());
        Ok(())
    }

    async fn voice_connected(&self, _scope: &ScopeId) -> bool {
        match self.voice_script.lock().await.pop_front() {
            Some(answer) => answer,
            None => self.voice_default.load(Ordering::SeqCst),
        }
    }

    async fn user_in_voice(&self, _scope: &ScopeId, _user: &UserId) -> bool {
        self.user_in_voice.load(Ordering::SeqCst)
    }

    async fn join_voice(&self, _scope: &ScopeId, user: &UserId) -> Result<(), JukebotError> {
        if !self.user_in_voice.load(Ordering::SeqCst) {
            return Err(JukebotError::Channel {
                message: format!("{user} is not in a voice channel"),
                source: None,
            });
        }
        self.voice_default.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn leave_voice(&self, _scope: &ScopeId) -> Result<(), JukebotError> {
        self.voice_default.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_answers_pop_then_fall_back() {
        let channel = MockChannel::new();
        let scope = ScopeId("g1".into());
        channel.script_voice_connected(&[true, true, false]).await;

        assert!(channel.voice_connected(&scope).await);
        assert!(channel.voice_connected(&scope).await);
        assert!(!channel.voice_connected(&scope).await);
        // Script exhausted, fallback is false.
        assert!(!channel.voice_connected(&scope).await);
    }

    #[tokio::test]
    async fn replies_and_audio_are_captured() {
        let channel = MockChannel::new();
        let scope = ScopeId("g1".into());

        channel.reply(&scope, Reply::text("hi")).await.unwrap();
        channel
            .play_audio(&scope, Path::new("/tmp/a.wav"))
            .await
            .unwrap();

        assert_eq!(channel.replies().await.len(), 1);
        assert_eq!(channel.played().await, vec![PathBuf::from("/tmp/a.wav")]);
    }

    #[tokio::test]
    async fn join_voice_requires_user_presence() {
        let channel = MockChannel::new();
        let scope = ScopeId("g1".into());
        let user = UserId("u1".into());

        assert!(channel.join_voice(&scope, &user).await.is_err());

        channel.set_user_in_voice(true);
        channel.join_voice(&scope, &user).await.unwrap();
        assert!(channel.voice_connected(&scope).await);
    }
}
