//! Lattice API server
//!
//! Only the routes needed to exercise authentication live here; the
//! cluster-management handlers mount under the same `/v1` router.

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Extension, Json, Router};
use serde_json::{json, Value};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use lattice_auth::AuthManager;
use lattice_common::config::ServerConfig;

use crate::middleware::{authenticate, AuthenticatedUser};

/// HTTP server fronted by the authentication middleware
pub struct ApiServer {
    config: ServerConfig,
    auth: Arc<AuthManager>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, auth: Arc<AuthManager>) -> Self {
        Self { config, auth }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        let v1 = Router::new()
            .route("/v1/user", get(current_user))
            .route_layer(from_fn_with_state(self.auth.clone(), authenticate));

        Router::new()
            .route("/health", get(health))
            .merge(v1)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until ctrl-c or SIGTERM
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.socket_addr()?;

        info!("Lattice API server starting on {}", addr);

        let router = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn current_user(user: Option<Extension<AuthenticatedUser>>) -> Json<Value> {
    let name = user.map(|Extension(user)| user.name().to_string());
    Json(json!({ "user": name }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        () = terminate => info!("Received terminate signal, shutting down..."),
    }
}
