//! HTTP exporter for pipeline metrics.
//!
//! - `/metrics` serves the Prometheus text format
//! - `/stats` serves the latest [`MetricsSnapshot`] as JSON
//! - `/health` turns unhealthy once the camera has refused a frame release

use crate::metrics::{MetricsError, MetricsRegistry, MetricsSnapshot};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

/// Errors raised while serving metrics.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind metrics listener: {0}")]
    Bind(#[from] std::io::Error),

    /// The HTTP server stopped with an error.
    #[error("metrics server error: {0}")]
    Server(String),
}

/// Pipeline metrics shared between the frame loop and the HTTP handlers.
pub struct MetricsState {
    registry: MetricsRegistry,
    latest: MetricsSnapshot,
}

impl MetricsState {
    /// Wraps a registry with an empty snapshot.
    pub fn new(registry: MetricsRegistry) -> Self {
        Self {
            registry,
            latest: MetricsSnapshot::default(),
        }
    }

    /// Publishes a new snapshot to the registry and the JSON endpoint.
    pub fn update(&mut self, snapshot: MetricsSnapshot) {
        self.registry.update(&snapshot);
        self.latest = snapshot;
    }

    /// Most recently published snapshot.
    pub fn latest(&self) -> &MetricsSnapshot {
        &self.latest
    }

    /// Encodes the registry in the Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        self.registry.encode()
    }

    /// Health verdict for the latest snapshot.
    pub fn health(&self) -> (StatusCode, String) {
        let s = &self.latest;
        if s.release_failures > 0 {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("UNHEALTHY: {} frame release failures", s.release_failures),
            )
        } else {
            (
                StatusCode::OK,
                format!(
                    "OK: {} frames, {} decoded, {} skipped",
                    s.frames_received, s.frames_decoded, s.frames_skipped
                ),
            )
        }
    }
}

/// Shared handle to [`MetricsState`].
pub type SharedMetrics = Arc<RwLock<MetricsState>>;

/// HTTP server exposing pipeline metrics.
pub struct MetricsServer {
    addr: SocketAddr,
    state: SharedMetrics,
}

impl MetricsServer {
    /// Creates a server that will listen on every interface at `port`.
    pub fn new(port: u16, registry: MetricsRegistry) -> Self {
        Self {
            addr: ([0, 0, 0, 0], port).into(),
            state: Arc::new(RwLock::new(MetricsState::new(registry))),
        }
    }

    /// Handle the frame loop publishes snapshots through.
    pub fn state(&self) -> SharedMetrics {
        Arc::clone(&self.state)
    }

    /// Address the server binds to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves until the listener fails.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = Router::new()
            .route("/metrics", get(prometheus_text))
            .route("/stats", get(stats_json))
            .route("/health", get(health))
            .layer(CorsLayer::permissive())
            .with_state(self.state);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!(addr = %self.addr, "Metrics server listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))
    }
}

async fn prometheus_text(State(state): State<SharedMetrics>) -> impl IntoResponse {
    match state.read().await.encode() {
        Ok(text) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            text,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain; charset=utf-8")],
                e.to_string(),
            )
        }
    }
}

async fn stats_json(State(state): State<SharedMetrics>) -> Json<MetricsSnapshot> {
    Json(state.read().await.latest().clone())
}

async fn health(State(state): State<SharedMetrics>) -> (StatusCode, String) {
    state.read().await.health()
}
