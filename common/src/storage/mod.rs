//! Object storage abstraction for catalog data and images.
//!
//! Every persisted artifact of the catalog (record JSON, the index
//! collection, encoded images, contact submissions) is a byte blob
//! addressed by a hierarchical key string such as
//! `images/recipes/<id>/hero-1.webp`. This module defines [`ObjectStore`],
//! the trait all backends implement, along with the Local, Remote and
//! InMemory variants selected by [`config::StorageConfig`].

pub mod config;
pub mod factory;
pub mod key;

mod local;
mod memory;
mod remote;

pub use local::LocalStore;
pub use memory::InMemoryStore;
pub use remote::RemoteStore;

use async_trait::async_trait;
use bytes::Bytes;

/// Error type for storage operations.
///
/// # Error Categories
///
/// - [`InvalidKey`](StorageError::InvalidKey): the logical key is empty,
///   absolute, or contains path-escaping segments. Always a caller error.
/// - [`Io`](StorageError::Io): a local filesystem operation failed.
/// - [`Remote`](StorageError::Remote): a remote authorization or transfer
///   call failed, timed out, or was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The logical key failed validation.
    InvalidKey(String),

    /// A local filesystem operation failed.
    Io(String),

    /// A remote authorization or transfer call failed.
    Remote(String),
}

impl std::error::Error for StorageError {}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::InvalidKey(msg) => write!(f, "invalid key: {}", msg),
            StorageError::Io(msg) => write!(f, "storage I/O error: {}", msg),
            StorageError::Remote(msg) => write!(f, "remote storage error: {}", msg),
        }
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// A byte-blob store addressed by hierarchical key strings.
///
/// Implementations validate keys with [`key::safe_key`] before touching
/// any backing resource, so a traversal key never reaches the filesystem
/// or the wire. `delete` and `delete_prefix` are idempotent: removing
/// something that does not exist is success.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Persist `content` under `key` with the given content type.
    async fn put(&self, key: &str, content: Bytes, content_type: &str) -> StorageResult<()>;

    /// Fetch the object stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> StorageResult<Option<Bytes>>;

    /// Remove the object stored under `key`.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Remove every object whose key starts with `prefix`.
    ///
    /// Used only for whole-record image cleanup, so prefixes are directory
    /// shaped (`images/recipes/<id>/`).
    async fn delete_prefix(&self, prefix: &str) -> StorageResult<()>;
}
