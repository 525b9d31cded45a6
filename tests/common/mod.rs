//! Shared utilities for integration and load testing.
#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

use metered_proxy::config::ProxyConfig;
use metered_proxy::{HttpServer, Shutdown};

/// Serve the given router as a mock upstream on an ephemeral port.
pub async fn start_upstream(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start the proxy against the given upstream address. Returns the proxy's
/// address and the shutdown handle that stops it.
pub async fn start_proxy(upstream: SocketAddr) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ProxyConfig::default();
    config.listener.bind_address = addr.to_string();
    config.upstream.host = upstream.ip().to_string();
    config.upstream.port = upstream.port();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (addr, shutdown)
}

/// An address nothing is listening on (bound once, then released).
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Upstream that reflects the request it received back in a JSON body.
pub fn echo_router() -> Router {
    Router::new().fallback(echo)
}

async fn echo(request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, 1024 * 1024).await.unwrap();

    let payload = serde_json::json!({
        "method": parts.method.as_str(),
        "path": parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/"),
        "customHeader": parts
            .headers
            .get("x-custom-header")
            .and_then(|value| value.to_str().ok()),
        "body": String::from_utf8_lossy(&body_bytes),
    });

    ([("x-upstream-tag", "echo")], payload.to_string()).into_response()
}

/// Read the proxy's metrics snapshot.
pub async fn fetch_metrics(client: &reqwest::Client, proxy: SocketAddr) -> serde_json::Value {
    client
        .get(format!("http://{proxy}/metrics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}
