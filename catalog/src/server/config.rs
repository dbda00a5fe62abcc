//! Configuration for the catalog HTTP server.

use clap::Args;

use common::storage::config::{LocalStoreConfig, RemoteStoreConfig};
use common::StorageConfig;

/// Storage selection flags shared by every subcommand.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Root directory for local object storage.
    #[arg(long, default_value = "site")]
    pub root: String,

    /// Keep everything in memory (for testing).
    #[arg(long, default_value = "false")]
    pub in_memory: bool,

    /// Remote authorization endpoint (enables the remote backend when set).
    #[arg(long)]
    pub remote: Option<String>,

    /// Bearer token attached to remote authorization and admin calls.
    #[arg(long)]
    pub token: Option<String>,

    /// Timeout in seconds for remote calls.
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,
}

impl StoreArgs {
    /// Convert storage flags to a backend configuration.
    pub fn to_storage_config(&self) -> StorageConfig {
        if self.in_memory {
            StorageConfig::InMemory
        } else if let Some(endpoint) = &self.remote {
            StorageConfig::Remote(RemoteStoreConfig {
                endpoint: endpoint.clone(),
                token: self.token.clone(),
                timeout_secs: self.timeout_secs,
            })
        } else {
            StorageConfig::Local(LocalStoreConfig {
                root: self.root.clone(),
            })
        }
    }
}

/// CLI arguments for the `serve` subcommand.
#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// HTTP server port.
    #[arg(long, default_value = "8000")]
    pub port: u16,

    /// Public base URL advertised in signed upload URLs.
    #[arg(long)]
    pub public_url: Option<String>,

    /// Bearer token required on admin endpoints (remote deployments).
    #[arg(long)]
    pub admin_token: Option<String>,

    /// Secret for signing upload authorizations.
    #[arg(long, default_value = "dev-signing-secret")]
    pub signing_secret: String,
}

/// Configuration for the catalog HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server port.
    pub port: u16,

    /// Public base URL advertised in signed upload URLs. Defaults to the
    /// loopback address of `port`.
    pub public_url: Option<String>,

    /// Bearer token required on admin endpoints; `None` leaves them open
    /// (local runs).
    pub admin_token: Option<String>,

    /// Secret for signing upload authorizations.
    pub signing_secret: String,
}

impl ServerConfig {
    /// Base URL clients reach the transfer endpoint at, no trailing slash.
    pub fn effective_public_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://127.0.0.1:{}", self.port),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            public_url: None,
            admin_token: None,
            signing_secret: "dev-signing-secret".to_string(),
        }
    }
}

impl From<&ServeArgs> for ServerConfig {
    fn from(args: &ServeArgs) -> Self {
        Self {
            port: args.port,
            public_url: args.public_url.clone(),
            admin_token: args.admin_token.clone(),
            signing_secret: args.signing_secret.clone(),
        }
    }
}
