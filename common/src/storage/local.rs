//! Local filesystem backend.
//!
//! Keys are resolved against a fixed root directory, mirroring the layout
//! the site serves statically (`data/recipes/...`, `images/recipes/...`).
//! Intermediate directories are created on demand.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use super::key::safe_key;
use super::{ObjectStore, StorageError, StorageResult};

/// Filesystem-backed object store rooted at a directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`. The directory does not need to
    /// exist yet; it is created on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory this store writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> StorageResult<PathBuf> {
        let normalized = safe_key(key)?;
        Ok(self.root.join(normalized))
    }
}

fn io_err(context: &str, path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Io(format!("{} {}: {}", context, path.display(), err))
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, key: &str, content: Bytes, _content_type: &str) -> StorageResult<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_err("failed to create", parent, e))?;
        }
        tokio::fs::write(&path, &content)
            .await
            .map_err(|e| io_err("failed to write", &path, e))?;
        tracing::debug!(key, bytes = content.len(), "stored object");
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Some(Bytes::from(content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err("failed to read", &path, e)),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err("failed to delete", &path, e)),
        }
    }

    async fn delete_prefix(&self, prefix: &str) -> StorageResult<()> {
        // Prefixes are directory shaped; trim the trailing slash so the
        // key resolves to the directory itself.
        let path = self.resolve(prefix.trim_end_matches('/'))?;
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err("failed to delete subtree", &path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LocalStore {
        LocalStore::new(dir.path())
    }

    #[tokio::test]
    async fn should_round_trip_an_object() {
        // given
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        // when
        store
            .put("data/recipes/r1.json", Bytes::from_static(b"{}"), "application/json")
            .await
            .unwrap();
        let content = store.get("data/recipes/r1.json").await.unwrap();

        // then
        assert_eq!(content, Some(Bytes::from_static(b"{}")));
        assert!(dir.path().join("data/recipes/r1.json").is_file());
    }

    #[tokio::test]
    async fn should_create_intermediate_directories() {
        // given
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        // when
        store
            .put("images/recipes/r1/hero-1.webp", Bytes::from_static(b"img"), "image/webp")
            .await
            .unwrap();

        // then
        assert!(dir.path().join("images/recipes/r1/hero-1.webp").is_file());
    }

    #[tokio::test]
    async fn should_return_none_for_missing_object() {
        // given
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        // when
        let content = store.get("data/recipes/missing.json").await.unwrap();

        // then
        assert_eq!(content, None);
    }

    #[tokio::test]
    async fn should_reject_traversal_keys() {
        // given
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        // when
        let put = store
            .put("../escape.txt", Bytes::from_static(b"x"), "text/plain")
            .await;
        let del = store.delete("../../etc/passwd").await;

        // then
        assert!(matches!(put, Err(StorageError::InvalidKey(_))));
        assert!(matches!(del, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn should_succeed_deleting_a_missing_object() {
        // given
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        // when
        let result = store.delete("data/recipes/never-existed.json").await;

        // then
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_delete_everything_under_a_prefix() {
        // given
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store
            .put("images/recipes/r1/thumb.webp", Bytes::from_static(b"a"), "image/webp")
            .await
            .unwrap();
        store
            .put("images/recipes/r1/hero-1.webp", Bytes::from_static(b"b"), "image/webp")
            .await
            .unwrap();
        store
            .put("images/recipes/r2/thumb.webp", Bytes::from_static(b"c"), "image/webp")
            .await
            .unwrap();

        // when
        store.delete_prefix("images/recipes/r1/").await.unwrap();

        // then
        assert!(!dir.path().join("images/recipes/r1").exists());
        assert!(dir.path().join("images/recipes/r2/thumb.webp").is_file());
    }

    #[tokio::test]
    async fn should_succeed_deleting_a_missing_prefix() {
        // given
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        // when
        let result = store.delete_prefix("images/recipes/ghost/").await;

        // then
        assert!(result.is_ok());
    }
}
