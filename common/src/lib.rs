pub mod storage;

pub use storage::config::{LocalStoreConfig, RemoteStoreConfig, StorageConfig};
pub use storage::factory::create_store;
pub use storage::{InMemoryStore, LocalStore, ObjectStore, RemoteStore, StorageError, StorageResult};
