// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-invocation command context for the Jukebot command framework.
//!
//! Captures the inputs to a command invocation and guarantees they are
//! durably recorded exactly once, regardless of how the handler's logic
//! branches or fails.

pub mod invocation;

pub use invocation::{CommandInvocation, param_map};
