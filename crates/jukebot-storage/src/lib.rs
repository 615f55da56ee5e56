// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed durable invocation records for Jukebot.
//!
//! This crate provides:
//! - **Database**: single-writer connection wrapper with schema setup
//! - **SqliteRecordStore**: the [`RecordStore`](jukebot_core::RecordStore)
//!   implementation used in deployment

pub mod database;
pub mod records;

pub use database::Database;
pub use records::SqliteRecordStore;
