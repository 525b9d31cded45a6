//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: local endpoints plus the forwarding fallback
//! - Share the metrics store and the upstream HTTP client with handlers
//! - Serve with graceful shutdown
//!
//! Reserved paths answer locally only for GET; any other method on them falls
//! through to the forwarder, the same way every unreserved path does.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::uri::Authority,
    response::Html,
    routing::get,
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::dashboard;
use crate::http::forward::forward;
use crate::metrics::{MetricsSnapshot, MetricsStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<MetricsStore>,
    pub client: Client<HttpConnector, Body>,
    pub upstream: Authority,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Expects a validated config; see [`crate::config::load_config`].
    pub fn new(config: ProxyConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            metrics: MetricsStore::new(),
            client,
            upstream: config
                .upstream
                .authority()
                .expect("upstream address validated at load time"),
        };

        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler).fallback(forward))
            .route("/dashboard", get(dashboard_handler).fallback(forward))
            .fallback(forward)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /metrics`: current counters as JSON. Reads atomics only; never
/// blocks on forwarding.
async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

/// `GET /dashboard`: the static page that polls `/metrics`.
async fn dashboard_handler() -> Html<&'static str> {
    Html(dashboard::DASHBOARD_PAGE)
}
