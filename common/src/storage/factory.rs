//! Factory for creating storage backends from configuration.

use std::sync::Arc;

use super::config::StorageConfig;
use super::{InMemoryStore, LocalStore, ObjectStore, RemoteStore, StorageResult};

/// Build the object store selected by `config`.
pub fn create_store(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    match config {
        StorageConfig::Local(local) => Ok(Arc::new(LocalStore::new(local.root.clone()))),
        StorageConfig::Remote(remote) => Ok(Arc::new(RemoteStore::new(remote)?)),
        StorageConfig::InMemory => Ok(Arc::new(InMemoryStore::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::config::{LocalStoreConfig, RemoteStoreConfig};
    use bytes::Bytes;

    #[tokio::test]
    async fn should_create_in_memory_store() {
        // given
        let config = StorageConfig::InMemory;

        // when
        let store = create_store(&config).unwrap();
        store
            .put("probe.txt", Bytes::from_static(b"x"), "text/plain")
            .await
            .unwrap();

        // then
        assert!(store.get("probe.txt").await.unwrap().is_some());
    }

    #[test]
    fn should_create_local_store() {
        // given
        let config = StorageConfig::Local(LocalStoreConfig {
            root: "/tmp/catalog-data".to_string(),
        });

        // when
        let result = create_store(&config);

        // then
        assert!(result.is_ok());
    }

    #[test]
    fn should_create_remote_store() {
        // given
        let config = StorageConfig::Remote(RemoteStoreConfig::new("https://api.example.test"));

        // when
        let result = create_store(&config);

        // then
        assert!(result.is_ok());
    }
}
