// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration core for Jukebot's long-running commands.
//!
//! This crate provides:
//! - **GenerationSupervisor**: submit/poll/download/cleanup state machine
//!   for asynchronous video jobs, with an optional prompt-rewriting pre-step
//! - **TalkLoop**: timer-driven generate+emit cycles gated by voice presence
//! - **TalkRegistry**: cancellable per-scope talk-session handles
//! - **generate_spoken_reply**: the shared text-to-speech cycle

pub mod registry;
pub mod speech;
pub mod supervisor;
pub mod talk;

pub use registry::{TalkHandle, TalkRegistry};
pub use speech::{SpeechSettings, SpokenReply, generate_spoken_reply};
pub use supervisor::{
    DirectorSettings, GenerationSupervisor, ReferenceSource, SupervisorOutcome,
    SupervisorState, VideoJobSpec,
};
pub use talk::{TalkLoop, TalkSpec};
