// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boundary traits for Jukebot's external collaborators.
//!
//! The command core consumes three seams: the chat platform
//! ([`ChannelPort`]), the generative-media backend ([`GenerationBackend`]),
//! and durable invocation storage ([`RecordStore`]).

pub mod backend;
pub mod channel;
pub mod storage;

pub use backend::GenerationBackend;
pub use channel::ChannelPort;
pub use storage::RecordStore;
