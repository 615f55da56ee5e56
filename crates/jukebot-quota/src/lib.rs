// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily quota tracking for the Jukebot command framework.
//!
//! Enforces a hard daily ceiling on constrained generation resources,
//! shared across all concurrent invocations in the process, without a
//! durable backing store. The day boundary is the **UTC** calendar date.

pub mod tracker;

pub use tracker::QuotaTracker;
