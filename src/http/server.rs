//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay and health handlers
//! - Wire up middleware (request ID, tracing, overall timeout)
//! - Bind server to listener and drain on shutdown
//! - Hand relay requests to the relay engine

use std::time::{Duration, Instant};

use axum::{
    extract::{RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::RelayConfig;
use crate::http::request::{request_id, MakeRequestUuidV4, RelayParams, X_REQUEST_ID};
use crate::observability::metrics;
use crate::relay::{Relay, RelayError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> reqwest::Result<Self> {
        let state = AppState {
            relay: Relay::new(&config)?,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/proxy", get(relay_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// The configured router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            pool_size = self.config.relay.proxy_pool.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Relay handler: `GET /api/proxy?url=<target>`.
async fn relay_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();

    let params = RelayParams::from_query(query.as_deref());
    let Some(target) = params.target() else {
        tracing::debug!("Relay request without url parameter");
        metrics::record_request("missing_parameter", start_time);
        return RelayError::MissingParameter.into_response();
    };

    let span = tracing::info_span!("relay", request_id = %request_id(&headers));
    match state.relay.relay(target).instrument(span).await {
        Ok(relayed) => {
            metrics::record_request("success", start_time);
            relayed.into_response()
        }
        Err(e) => {
            metrics::record_request("exhausted", start_time);
            e.into_response()
        }
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
