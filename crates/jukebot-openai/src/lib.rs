// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI generation-backend adapter for Jukebot.
//!
//! Implements the [`GenerationBackend`](jukebot_core::GenerationBackend)
//! boundary over the OpenAI HTTP API: text responses, image generation,
//! speech synthesis, and asynchronous video jobs.

pub mod client;
pub mod types;

pub use client::OpenAiClient;
