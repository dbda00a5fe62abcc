//! Router assembly and server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tokio::signal;

use common::ObjectStore;

use super::config::ServerConfig;
use super::handlers::{self, AppState};
use super::metrics::Metrics;
use super::middleware::{AuthLayer, MetricsLayer, TracingLayer};
use super::sign::UrlSigner;
use crate::contact::ContactInbox;
use crate::store::CatalogStoreHandle;

/// Build the full route table.
///
/// Admin routes sit behind the bearer-token layer. The transfer endpoint
/// stays open: the signature in its query string is the authorization.
pub fn router(state: AppState, admin_token: Option<String>) -> Router {
    let admin = Router::new()
        .route("/upload-url", post(handlers::handle_upload_url))
        .route("/upload", post(handlers::handle_upload))
        .route("/save-recipe", post(handlers::handle_save_recipe))
        .route("/delete-recipe", post(handlers::handle_delete_recipe))
        .route("/delete-object", post(handlers::handle_delete_object))
        .route("/delete-prefix", post(handlers::handle_delete_prefix))
        .layer(AuthLayer::new(admin_token));

    let open = Router::new()
        .route("/object/{*key}", put(handlers::handle_transfer))
        .route("/contact", post(handlers::handle_contact))
        .route("/recipes", get(handlers::handle_get_index))
        .route("/recipes/{id}", get(handlers::handle_get_recipe))
        .route("/metrics", get(handlers::handle_metrics));

    admin
        .merge(open)
        .layer(TracingLayer::new())
        .layer(MetricsLayer::new(state.metrics.clone()))
        .with_state(state)
}

/// The catalog admin HTTP server.
pub struct CatalogServer {
    store: Arc<dyn ObjectStore>,
    catalog: CatalogStoreHandle,
    config: ServerConfig,
}

impl CatalogServer {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        catalog: CatalogStoreHandle,
        config: ServerConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            config,
        }
    }

    /// Run the HTTP server until a shutdown signal arrives.
    pub async fn run(self) {
        let metrics = Arc::new(Metrics::new());

        let state = AppState {
            catalog: self.catalog,
            store: self.store.clone(),
            contact: ContactInbox::new(self.store),
            signer: UrlSigner::new(&self.config.signing_secret),
            metrics,
            public_url: Arc::from(self.config.effective_public_url()),
        };

        let app = router(state, self.config.admin_token.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        tracing::info!("Starting catalog server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("failed to bind server port");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .expect("server error");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
