//! In-memory backend for tests and `--in-memory` runs.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::key::safe_key;
use super::{ObjectStore, StorageResult};

#[derive(Debug, Clone)]
struct StoredObject {
    content: Bytes,
    content_type: String,
}

/// Object store backed by a process-local map.
///
/// Keys are validated exactly like the persistent backends so tests
/// exercise the same rejection paths.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Content type recorded for `key`, if stored.
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|obj| obj.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put(&self, key: &str, content: Bytes, content_type: &str) -> StorageResult<()> {
        let normalized = safe_key(key)?;
        self.objects.lock().unwrap().insert(
            normalized,
            StoredObject {
                content,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>> {
        let normalized = safe_key(key)?;
        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(&normalized)
            .map(|obj| obj.content.clone()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let normalized = safe_key(key)?;
        self.objects.lock().unwrap().remove(&normalized);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> StorageResult<()> {
        let normalized = safe_key(prefix.trim_end_matches('/'))?;
        let prefix = format!("{}/", normalized);
        self.objects
            .lock()
            .unwrap()
            .retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }
}
