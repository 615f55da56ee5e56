// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Artifact storage and temp-file lifecycle for Jukebot's generated media.

pub mod store;
pub mod temp;

pub use store::{ArtifactStore, BROWSER_USER_AGENT};
pub use temp::TempFile;
