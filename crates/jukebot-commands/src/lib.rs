// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash-command handlers for Jukebot.
//!
//! Each handler opens a [`CommandInvocation`](jukebot_context::CommandInvocation)
//! first and saves it on every terminal path, including early returns.
//! Shared state (quota, talk registry, chat threads) arrives through
//! [`CommandDeps`] -- nothing is global.

pub mod chat;
pub mod deps;
pub mod image;
pub mod video;
pub mod vision;
pub mod voice;

pub use chat::{ChatCommand, ThreadTracker, chat};
pub use deps::{AttachmentRef, CommandDeps};
pub use image::{ImageCommand, image};
pub use video::{VideoCommand, video};
pub use vision::{VisionCommand, vision};
pub use voice::{RatherCommand, SayCommand, TalkCommand, join, leave, rather, say, talk};
