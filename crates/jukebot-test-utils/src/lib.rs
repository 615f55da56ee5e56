// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Jukebot: mock backend, mock channel, and an
//! in-memory record store.

pub mod memory_store;
pub mod mock_backend;
pub mod mock_channel;

pub use memory_store::MemoryRecordStore;
pub use mock_backend::MockBackend;
pub use mock_channel::MockChannel;
