//! HTTP API module for vim-karuta
//!
//! Serves the Lingr webhook and the entry listings.

pub mod routes;

use crate::error::{CoreError, Result};
use crate::handlers::KarutaHandler;
use crate::store::KarutaStore;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Storage backend
    pub store: KarutaStore,
    /// Command handler for webhook batches
    pub handler: Arc<KarutaHandler>,
}

impl AppState {
    pub fn new(store: KarutaStore) -> Self {
        AppState {
            handler: Arc::new(KarutaHandler::new(store.clone())),
            store,
        }
    }
}

/// Start the HTTP API server
pub async fn serve(addr: SocketAddr, store: KarutaStore) -> Result<()> {
    let app = create_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CoreError::Api(e.to_string()))?;

    Ok(())
}

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    // Listings are read from browsers, so allow any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::list_entries))
        .route("/json", get(routes::list_entries_json))
        .route("/lingr", post(routes::lingr_webhook))
        .route("/health", get(routes::health))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
