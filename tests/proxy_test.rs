//! End-to-end forwarding behavior.

use std::time::Duration;

use axum::http::StatusCode;
use axum::{routing::get, Router};

mod common;

#[tokio::test]
async fn preserves_method_path_headers_and_body() {
    let upstream = common::start_upstream(common::echo_router()).await;
    let (proxy, shutdown) = common::start_proxy(upstream).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{proxy}/api/v1/widgets?page=2"))
        .header("x-custom-header", "fidelity-check")
        .header("content-type", "application/json")
        .body(r#"{"name":"sprocket"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-upstream-tag"], "echo");

    let expected = serde_json::json!({
        "method": "POST",
        "path": "/api/v1/widgets?page=2",
        "customHeader": "fidelity-check",
        "body": r#"{"name":"sprocket"}"#,
    })
    .to_string();
    assert_eq!(response.text().await.unwrap(), expected);

    shutdown.trigger();
}

#[tokio::test]
async fn upstream_health_endpoint_passes_through() {
    let upstream =
        common::start_upstream(Router::new().route("/health", get(|| async { "OK" }))).await;
    let (proxy, shutdown) = common::start_proxy(upstream).await;

    let response = reqwest::get(format!("http://{proxy}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");

    shutdown.trigger();
}

#[tokio::test]
async fn upstream_error_status_is_not_a_proxy_error() {
    let upstream = common::start_upstream(Router::new().route(
        "/broken",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream fault") }),
    ))
    .await;
    let (proxy, shutdown) = common::start_proxy(upstream).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{proxy}/broken"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text().await.unwrap(), "upstream fault");

    tokio::time::sleep(Duration::from_millis(50)).await;
    let metrics = common::fetch_metrics(&client, proxy).await;
    assert_eq!(metrics["totalRequests"], 1);
    assert_eq!(metrics["totalErrors"], 0);
    assert_eq!(metrics["activeRequests"], 0);

    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_upstream_yields_bad_gateway() {
    let dead_upstream = common::unused_addr().await;
    let (proxy, shutdown) = common::start_proxy(dead_upstream).await;

    let client = reqwest::Client::new();
    for _ in 0..5 {
        let response = client
            .get(format!("http://{proxy}/anything"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.text().await.unwrap(), "Bad Gateway");
    }

    let metrics = common::fetch_metrics(&client, proxy).await;
    assert_eq!(metrics["totalRequests"], 5);
    assert_eq!(metrics["totalErrors"], 5);
    assert_eq!(metrics["activeRequests"], 0);

    shutdown.trigger();
}

#[tokio::test]
async fn non_get_on_reserved_paths_is_forwarded() {
    let upstream = common::start_upstream(common::echo_router()).await;
    let (proxy, shutdown) = common::start_proxy(upstream).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{proxy}/metrics"))
        .body("payload")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["method"], "POST");
    assert_eq!(body["path"], "/metrics");

    shutdown.trigger();
}

#[tokio::test]
async fn client_disconnect_releases_active_count() {
    let upstream = common::start_upstream(Router::new().route(
        "/stall",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            "late"
        }),
    ))
    .await;
    let (proxy, shutdown) = common::start_proxy(upstream).await;

    let client = reqwest::Client::new();
    let result = client
        .get(format!("http://{proxy}/stall"))
        .timeout(Duration::from_millis(100))
        .send()
        .await;
    assert!(result.is_err());

    // The active count must come back to zero once the proxy notices the
    // closed connection, and the abandoned request is not an error.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    let mut metrics = common::fetch_metrics(&client, proxy).await;
    while metrics["activeRequests"] != 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(100)).await;
        metrics = common::fetch_metrics(&client, proxy).await;
    }
    assert_eq!(metrics["totalRequests"], 1);
    assert_eq!(metrics["activeRequests"], 0);
    assert_eq!(metrics["totalErrors"], 0);

    shutdown.trigger();
}
