//! Blob store HTTP service.
//!
//! Routes:
//! - `POST /blob` - store raw bytes, responds with the content address
//! - `GET /blob/{content_hash}` - fetch stored bytes, 404 on miss
//! - `GET /health` - liveness probe

use crate::config::StoreConfig;
use crate::engine::MemoryStore;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use verity_crypto::{digest_hex, parse_digest};

/// Blob store service state.
///
/// Dropping the service releases the shutdown sender, which also stops a
/// running server.
pub struct BlobStoreService {
    config: StoreConfig,
    engine: Arc<MemoryStore>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl BlobStoreService {
    /// Create a new service over an empty store.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            engine: Arc::new(MemoryStore::new()),
            shutdown_tx: None,
        }
    }

    /// Start the HTTP server.
    ///
    /// Binds the configured address, serves in a background task and
    /// returns the bound address (useful with an ephemeral port).
    pub async fn start(&mut self) -> std::io::Result<SocketAddr> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);

        let router = self.build_router();
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr()).await?;
        let addr = listener.local_addr()?;
        info!(addr = %addr, "Blob store listening");

        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move {
            if let Err(e) = server.await {
                error!(error = %e, "Blob store server error");
            }
        });

        Ok(addr)
    }

    /// Trigger graceful shutdown.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Direct handle to the storage engine (for seeding in tests).
    #[must_use]
    pub fn engine(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.engine)
    }

    /// Build the HTTP router.
    fn build_router(&self) -> Router {
        let state = AppState {
            engine: Arc::clone(&self.engine),
        };

        Router::new()
            .route("/blob", post(store_blob))
            .route("/blob/:content_hash", get(fetch_blob))
            .route("/health", get(health_check))
            .layer(DefaultBodyLimit::max(self.config.max_blob_bytes))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    engine: Arc<MemoryStore>,
}

/// Handle `POST /blob`.
async fn store_blob(State(state): State<AppState>, body: Bytes) -> Response {
    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "empty body" })),
        )
            .into_response();
    }

    let hash = state.engine.put(&body);
    Json(serde_json::json!({ "contentHash": digest_hex(&hash) })).into_response()
}

/// Handle `GET /blob/{content_hash}`.
///
/// An unparseable digest is indistinguishable from a miss: both are 404.
async fn fetch_blob(State(state): State<AppState>, Path(content_hash): Path<String>) -> Response {
    let blob = parse_digest(&content_hash)
        .ok()
        .and_then(|hash| state.engine.get(&hash));

    match blob {
        Some(bytes) => {
            ([(header::CONTENT_TYPE, "application/octet-stream")], bytes).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "not found" })),
        )
            .into_response(),
    }
}

/// Handle `GET /health`.
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
