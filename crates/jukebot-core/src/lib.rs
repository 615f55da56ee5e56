// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Jukebot command framework.
//!
//! This crate provides the error type, shared ids and message types, and
//! the boundary traits the command core consumes: the chat platform, the
//! generative-media backend, and durable invocation storage.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::JukebotError;
pub use types::{ScopeId, UserId};

pub use traits::{ChannelPort, GenerationBackend, RecordStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jukebot_error_has_all_variants() {
        // Verify all 10 error variants exist and can be constructed.
        let _config = JukebotError::Config("test".into());
        let _storage = JukebotError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = JukebotError::Channel {
            message: "test".into(),
            source: None,
        };
        let _backend = JukebotError::Backend {
            message: "test".into(),
            source: None,
        };
        let _rejected = JukebotError::PromptRejected {
            message: "test".into(),
        };
        let _failed = JukebotError::JobFailed {
            job_id: "video_123".into(),
            code: "moderation_blocked".into(),
            message: "test".into(),
        };
        let _quota = JukebotError::QuotaExceeded {
            resource: "gpt-image-1".into(),
            limit: 3,
        };
        let _auth = JukebotError::NotAuthorized { user: "42".into() };
        let _saved = JukebotError::AlreadySaved {
            invocation: "inv-1".into(),
        };
        let _internal = JukebotError::Internal("test".into());
    }

    #[test]
    fn error_messages_carry_detail() {
        let err = JukebotError::JobFailed {
            job_id: "video_abc".into(),
            code: "moderation_blocked".into(),
            message: "content violates policy".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("video_abc"));
        assert!(msg.contains("moderation_blocked"));
        assert!(msg.contains("content violates policy"));
    }

    #[test]
    fn scope_and_user_ids() {
        let scope = ScopeId("guild-1".into());
        let user = UserId("user-1".into());
        assert_eq!(scope.clone(), scope);
        assert_eq!(user.to_string(), "user-1");
        assert_eq!(scope.to_string(), "guild-1");
    }
}
