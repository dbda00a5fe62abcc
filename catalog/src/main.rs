//! Catalog binary: `serve` runs the admin HTTP server, `upload`,
//! `delete-recipe` and `delete-object` drive the admin workflow from the
//! command line against a local directory or a remote deployment.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = cli::Cli::parse();
    if let Err(err) = cli::run(args).await {
        tracing::error!(error = %err, "command failed");
        std::process::exit(1);
    }
}
