//! Durable storage for synthesized audio.
//!
//! Every artifact gets a fresh UUID-based file name, so sibling artifacts of
//! one run (and artifacts of different runs) never overwrite each other.
//! Bytes are written to a `.part` file that is renamed into place only after
//! the last chunk, so a reader never sees a half-written artifact.

use crate::error::{PolyvoxError, Result};
use crate::pipeline::types::AudioArtifact;
use futures_util::{Stream, StreamExt};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Directory that synthesized artifacts are written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a new artifact. Never returns the same path twice.
    pub fn allocate(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{extension}", Uuid::new_v4()))
    }

    /// Store fully materialized audio.
    pub async fn persist(
        &self,
        language: &str,
        extension: &str,
        bytes: Vec<u8>,
    ) -> Result<AudioArtifact> {
        let chunks = futures_util::stream::iter([Ok::<_, std::convert::Infallible>(bytes)]);
        self.persist_stream(language, extension, chunks).await
    }

    /// Store audio arriving as a stream of chunks.
    ///
    /// The artifact exists only once the stream has ended without error. If
    /// the stream fails or this future is dropped mid-way, the partial file
    /// is removed.
    pub async fn persist_stream<S, B, E>(
        &self,
        language: &str,
        extension: &str,
        stream: S,
    ) -> Result<AudioArtifact>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
    {
        let fail = |message: String| PolyvoxError::SynthesisFailed {
            language: language.to_string(),
            message,
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            fail(format!(
                "cannot create output directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let path = self.allocate(extension);
        let partial = PartialFile::new(path.with_extension(format!("{extension}.part")));
        let mut file = tokio::fs::File::create(&partial.path)
            .await
            .map_err(|e| fail(format!("cannot create {}: {e}", partial.path.display())))?;

        let mut bytes = Vec::new();
        let mut stream = std::pin::pin!(stream);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| fail(format!("audio stream interrupted: {e}")))?;
            let chunk = chunk.as_ref();
            if chunk.is_empty() {
                continue;
            }
            file.write_all(chunk)
                .await
                .map_err(|e| fail(format!("cannot write audio: {e}")))?;
            bytes.extend_from_slice(chunk);
        }
        file.flush()
            .await
            .map_err(|e| fail(format!("cannot write audio: {e}")))?;
        drop(file);

        tokio::fs::rename(&partial.path, &path)
            .await
            .map_err(|e| fail(format!("cannot finalize {}: {e}", path.display())))?;
        partial.commit();

        tracing::info!(
            language,
            locator = %path.display(),
            bytes = bytes.len(),
            "audio artifact saved"
        );
        Ok(AudioArtifact::new(language, path, bytes))
    }
}

/// Removes its file on drop unless committed.
struct PartialFile {
    path: PathBuf,
    committed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.committed
            && let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove partial artifact");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_allocate_never_repeats() {
        let store = ArtifactStore::new("out");
        let paths: HashSet<PathBuf> = (0..1000).map(|_| store.allocate("mp3")).collect();
        assert_eq!(paths.len(), 1000);
        assert!(paths.iter().all(|p| p.starts_with("out")));
        assert!(
            paths
                .iter()
                .all(|p| p.extension().and_then(|e| e.to_str()) == Some("mp3"))
        );
    }

    #[tokio::test]
    async fn test_persist_writes_file() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        let artifact = store.persist("es", "mp3", vec![1, 2, 3]).await.unwrap();

        assert_eq!(artifact.language_code, "es");
        assert_eq!(std::fs::read(&artifact.path).unwrap(), vec![1, 2, 3]);
        assert!(artifact.locator().ends_with(".mp3"));
    }

    #[tokio::test]
    async fn test_persist_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = ArtifactStore::new(&nested);

        let artifact = store.persist("de", "mp3", vec![9]).await.unwrap();
        assert!(artifact.path.starts_with(&nested));
    }

    #[tokio::test]
    async fn test_persist_empty_audio_is_zero_length_file() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        let artifact = store.persist("el", "mp3", Vec::new()).await.unwrap();

        assert!(artifact.is_empty());
        assert_eq!(std::fs::metadata(&artifact.path).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_stream_chunks_are_concatenated() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let chunks = futures_util::stream::iter(vec![
            Ok::<_, String>(vec![1u8, 2]),
            Ok(vec![]),
            Ok(vec![3u8]),
        ]);

        let artifact = store.persist_stream("es", "mp3", chunks).await.unwrap();

        assert_eq!(artifact.bytes, vec![1, 2, 3]);
        assert_eq!(file_names(dir.path()), vec![artifact.locator().to_string()]);
    }

    #[tokio::test]
    async fn test_interrupted_stream_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let chunks = futures_util::stream::iter(vec![
            Ok(vec![1u8, 2]),
            Err("connection reset".to_string()),
        ]);

        let err = store.persist_stream("zh-CN", "mp3", chunks).await.unwrap_err();

        assert_eq!(err.language(), Some("zh-CN"));
        assert!(err.to_string().contains("connection reset"));
        assert!(file_names(dir.path()).is_empty());
    }
}
