//! Axum-based HTTP server.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use curia_service::{ModerationHub, ShutdownController};
use tower_http::cors::CorsLayer;

use crate::error::RpcError;
use crate::handlers;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct RpcState {
    pub hub: Arc<ModerationHub>,
}

pub struct RpcServer {
    pub port: u16,
}

impl RpcServer {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    /// Build the API router.
    pub fn router(state: RpcState) -> Router {
        Router::new()
            .route("/v1/decision/preview", post(handlers::preview))
            .route("/v1/sessions", post(handlers::open_session))
            .route("/v1/sessions/:id", get(handlers::get_session))
            .route("/v1/sessions/:id/votes", post(handlers::submit_vote))
            .route("/v1/sessions/:id/escalate", post(handlers::escalate))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind and serve until the shutdown controller fires.
    pub async fn start(
        &self,
        hub: Arc<ModerationHub>,
        shutdown: &ShutdownController,
    ) -> Result<(), RpcError> {
        let app = Self::router(RpcState { hub });
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", self.port))
            .await
            .map_err(|e| RpcError::Bind(e.to_string()))?;
        tracing::info!(port = self.port, "HTTP API listening");

        let mut shutdown_rx = shutdown.subscribe();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
