// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped-acquisition wrapper for transient files.
//!
//! Every caller that creates a transient (non-final-artifact) file must
//! delete it on every exit path of its operation. [`TempFile`] makes that
//! structural: deletion happens on Drop, so `?` propagation and early
//! returns cannot leak the file.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Owns a transient file and deletes it when dropped.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Takes ownership of an existing file at `path`.
    pub fn adopt(path: PathBuf) -> Self {
        Self { path }
    }

    /// The file's location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "temp file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove temp file"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transient.png");
        std::fs::write(&path, b"bytes").unwrap();

        {
            let temp = TempFile::adopt(path.clone());
            assert!(temp.path().exists());
        }
        assert!(!path.exists(), "file deleted when guard dropped");
    }

    #[test]
    fn drop_on_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-created.png");
        drop(TempFile::adopt(path));
    }

    #[test]
    fn drop_runs_on_early_return() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transient.png");
        std::fs::write(&path, b"bytes").unwrap();

        fn fails_midway(guard: TempFile) -> Result<(), std::io::Error> {
            let _guard = guard;
            Err(std::io::Error::other("boom"))
        }

        let result = fails_midway(TempFile::adopt(path.clone()));
        assert!(result.is_err());
        assert!(!path.exists(), "file deleted on the error path too");
    }
}
