//! Outbound integration tests against a programmable mock backend.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use notes_api::config::HttpClientConfig;
use notes_api::integrations::{JsonRequester, RequestError, ReqwestTransport};
use notes_api::resilience::RetryPolicy;
use notes_api::security::api_key::API_KEY_HEADER;
use notes_api::{AppConfig, HttpServer};

mod common;
use common::{start_programmable_backend, start_server, API_KEY};

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(20),
        ..Default::default()
    }
}

/// Backend answering `failures` times with `status`, then 200 with `body`.
async fn flaky_backend(failures: u32, status: u16, body: Value) -> (SocketAddr, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let cc = calls.clone();
    let body = body.to_string();
    let addr = start_programmable_backend(move || {
        let cc = cc.clone();
        let body = body.clone();
        async move {
            let n = cc.fetch_add(1, Ordering::SeqCst);
            if n < failures {
                (status, r#"{"message":"unavailable"}"#.to_string())
            } else {
                (200, body)
            }
        }
    })
    .await;
    (addr, calls)
}

fn github_config(addr: SocketAddr) -> AppConfig {
    let mut config = AppConfig::default();
    config.github.token = Some("test-token".into());
    config.github.api_base = format!("http://{addr}");
    config.retries.max_attempts = Some(3);
    config.retries.base_backoff_ms = Some(10);
    config.retries.max_backoff_ms = Some(20);
    config
}

#[tokio::test]
async fn test_requester_retries_until_success() {
    let (addr, calls) = flaky_backend(2, 503, json!({ "ok": true })).await;
    let transport = ReqwestTransport::new(&HttpClientConfig::default()).unwrap();
    let requester = JsonRequester::new(transport, fast_policy(3));

    let value = requester.get(&format!("http://{addr}/thing")).await.unwrap();
    assert_eq!(value, json!({ "ok": true }));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_requester_exhausts_attempts() {
    let (addr, calls) = flaky_backend(u32::MAX, 502, Value::Null).await;
    let transport = ReqwestTransport::new(&HttpClientConfig::default()).unwrap();
    let requester = JsonRequester::new(transport, fast_policy(2));

    let err = requester.get(&format!("http://{addr}/thing")).await.unwrap_err();
    let RequestError::Exhausted { attempts, last_error } = err;
    assert_eq!(attempts, 2);
    assert!(last_error.contains("502"), "{last_error}");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_requester_returns_non_retryable_error_body() {
    let (addr, calls) = flaky_backend(u32::MAX, 404, Value::Null).await;
    let transport = ReqwestTransport::new(&HttpClientConfig::default()).unwrap();
    let requester = JsonRequester::new(transport, fast_policy(3));

    let value = requester.get(&format!("http://{addr}/missing")).await.unwrap();
    assert_eq!(value, json!({ "message": "unavailable" }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_requester_connection_refused_is_retried() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = ReqwestTransport::new(&HttpClientConfig::default()).unwrap();
    let requester = JsonRequester::new(transport, fast_policy(2));

    let err = requester.get(&format!("http://{addr}/")).await.unwrap_err();
    assert!(matches!(err, RequestError::Exhausted { attempts: 2, .. }));
}

#[tokio::test]
async fn test_github_repo_route_recovers_from_transient_failures() {
    let (addr, calls) = flaky_backend(2, 503, json!({ "full_name": "acme/widgets" })).await;
    let server = start_server(github_config(addr)).await;

    let res = server
        .client
        .get(server.url("/integrations/github/repos/acme/widgets"))
        .header(API_KEY_HEADER, API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap()["full_name"], "acme/widgets");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_github_route_exhaustion_maps_to_bad_gateway() {
    let (addr, calls) = flaky_backend(u32::MAX, 500, Value::Null).await;
    let server = start_server(github_config(addr)).await;

    let res = server
        .client
        .get(server.url("/integrations/github/repos/acme/widgets"))
        .header(API_KEY_HEADER, API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("3 attempts"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_github_issue_lookup_by_title() {
    let issues = json!([
        { "number": 7, "title": "Flaky build" },
        { "number": 9, "title": "Docs typo" },
    ]);
    let (addr, _) = flaky_backend(0, 200, issues).await;
    let server = start_server(github_config(addr)).await;

    let found: Value = server
        .client
        .get(server.url("/integrations/github/repos/acme/widgets/issues?title=Docs%20typo"))
        .header(API_KEY_HEADER, API_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found, json!({ "title": "Docs typo", "number": 9 }));

    let missing: Value = server
        .client
        .get(server.url("/integrations/github/repos/acme/widgets/issues?title=Nope"))
        .header(API_KEY_HEADER, API_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(missing, json!({ "title": "Nope", "number": null }));
}

#[tokio::test]
async fn test_github_route_without_token_is_not_found() {
    let server = HttpServer::new(AppConfig::default(), None).unwrap();

    let res = server
        .router()
        .oneshot(
            Request::builder()
                .uri("/integrations/github/repos/acme/widgets")
                .header(API_KEY_HEADER, API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_github_route_requires_api_key() {
    let server = HttpServer::new(AppConfig::default(), None).unwrap();

    let res = server
        .router()
        .oneshot(
            Request::builder()
                .uri("/integrations/github/repos/acme/widgets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_github_issue_lookup_without_title_is_json_error() {
    let mut config = AppConfig::default();
    config.github.token = Some("test-token".into());
    let server = HttpServer::new(config, None).unwrap();

    let res = server
        .router()
        .oneshot(
            Request::builder()
                .uri("/integrations/github/repos/acme/widgets/issues")
                .header(API_KEY_HEADER, API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "Invalid query" }));
}
