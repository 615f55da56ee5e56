// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic naming and storage of generated files.
//!
//! Final artifacts live under `<root>/<invocation id>/<file name>`;
//! transient downloads (reference images, re-displayed attachments) live
//! under `<root>/downloads/<target name>` and are owned by the caller via
//! [`TempFile`](crate::temp::TempFile).

use std::path::PathBuf;
use std::time::Duration;

use jukebot_core::JukebotError;
use tracing::debug;

/// Browser-like user agent for fetching chat-platform CDN attachments.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/41.0.2228.0 Safari/537.3";

/// File store for generated media.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    client: reqwest::Client,
}

impl ArtifactStore {
    /// Creates a store rooted at `root`. The directory itself is created
    /// lazily, per artifact.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, JukebotError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| JukebotError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            root: root.into(),
            client,
        })
    }

    /// Derives the storage location for an invocation's artifact.
    ///
    /// Deterministic and collision-resistant: the invocation id partitions
    /// files, and callers embed timestamp and model name in `file_name`.
    /// Ensures the parent directory exists; no other side effects.
    pub fn path_for(&self, invocation_id: &str, file_name: &str) -> Result<PathBuf, JukebotError> {
        let dir = self.root.join(invocation_id);
        std::fs::create_dir_all(&dir).map_err(|e| JukebotError::Storage {
            source: Box::new(e),
        })?;
        Ok(dir.join(file_name))
    }

    /// Writes artifact bytes under [`path_for`](Self::path_for) and returns
    /// the location.
    pub async fn write(
        &self,
        invocation_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, JukebotError> {
        let path = self.path_for(invocation_id, file_name)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| JukebotError::Storage {
                source: Box::new(e),
            })?;
        debug!(path = %path.display(), size = bytes.len(), "artifact written");
        Ok(path)
    }

    /// Fetches a remote resource to a local path under `target_name`.
    ///
    /// Used for reference-image acquisition and vision-command re-display.
    /// The caller owns the returned file and must delete it on every exit
    /// path of its operation (wrap it in a `TempFile`).
    pub async fn download(
        &self,
        url: &str,
        target_name: &str,
        headers: &[(&str, &str)],
    ) -> Result<PathBuf, JukebotError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| JukebotError::Channel {
            message: format!("failed to fetch {url}: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(JukebotError::Channel {
                message: format!("fetch of {url} returned {status}"),
                source: None,
            });
        }

        let bytes = response.bytes().await.map_err(|e| JukebotError::Channel {
            message: format!("failed to read body of {url}: {e}"),
            source: Some(Box::new(e)),
        })?;

        let dir = self.root.join("downloads");
        std::fs::create_dir_all(&dir).map_err(|e| JukebotError::Storage {
            source: Box::new(e),
        })?;
        let path = dir.join(target_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| JukebotError::Storage {
                source: Box::new(e),
            })?;

        debug!(
            url = url,
            path = %path.display(),
            size = bytes.len(),
            "downloaded remote file"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn path_for_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        let a = store.path_for("inv-1", "sora-2-job1.mp4").unwrap();
        let b = store.path_for("inv-1", "sora-2-job1.mp4").unwrap();
        assert_eq!(a, b, "same invocation and file name yield the same location");
        assert!(a.parent().unwrap().is_dir(), "parent structure created");
    }

    #[test]
    fn path_for_partitions_by_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        let a = store.path_for("inv-1", "out.png").unwrap();
        let b = store.path_for("inv-2", "out.png").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn write_persists_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        let path = store.write("inv-1", "a.bin", b"media bytes").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"media bytes");
    }

    #[tokio::test]
    async fn download_fetches_with_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attachment.png"))
            .and(header("User-Agent", BROWSER_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        let url = format!("{}/attachment.png", server.uri());
        let path = store
            .download(&url, "attachment.png", &[("User-Agent", BROWSER_USER_AGENT)])
            .await
            .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"png bytes");
    }

    #[tokio::test]
    async fn download_surfaces_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();

        let url = format!("{}/missing.png", server.uri());
        let err = store.download(&url, "missing.png", &[]).await.unwrap_err();
        assert!(matches!(err, JukebotError::Channel { .. }));
    }
}
