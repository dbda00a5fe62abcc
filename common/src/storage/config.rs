//! Storage backend configuration.

/// Default timeout for remote authorization and transfer calls.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Configuration for the local filesystem backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStoreConfig {
    /// Root directory keys resolve under.
    pub root: String,
}

/// Configuration for the remote signed-URL backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStoreConfig {
    /// Base URL of the authorization service.
    pub endpoint: String,

    /// Bearer token attached to authorization and admin calls.
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl RemoteStoreConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }
}

/// Which storage backend to run against.
///
/// Selected once at startup; call sites only ever see `dyn ObjectStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Write directly to a local directory tree.
    Local(LocalStoreConfig),

    /// Write through a remote authorization service.
    Remote(RemoteStoreConfig),

    /// Keep everything in memory (tests, dry runs).
    InMemory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local(LocalStoreConfig {
            root: "site".to_string(),
        })
    }
}
