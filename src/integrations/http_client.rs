//! Resilient JSON HTTP requester.
//!
//! # Responsibilities
//! - Issue outbound JSON calls through a [`Transport`]
//! - Retry transport errors and configured statuses with capped backoff
//! - Surface a single aggregate error once attempts are exhausted
//!
//! # Design Decisions
//! - Explicit attempt loop; each attempt is strictly sequential
//! - Sleeps suspend the task, never the runtime
//! - The body of a retryable response is discarded; only its status is kept
//!   as the last error
//! - A body that fails to parse counts as a failed attempt, like a transport
//!   error
//! - No whole-call deadline; per-attempt timeouts live on the `reqwest::Client`
//! - Not idempotency-aware: a timed-out POST that landed server-side may be
//!   repeated

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Method;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::HttpClientConfig;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;

/// Failure of a single attempt at the transport level (connect, timeout, I/O).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Terminal failure of a [`JsonRequester`] call.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// An outbound call, reusable across attempts.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    /// Serialized as JSON with `Content-Type: application/json` when present.
    pub body: Option<Value>,
    /// Accept a non-JSON 2xx body as a JSON string instead of failing.
    pub accept_text: bool,
}

impl OutboundRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            accept_text: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, url).json(body)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// For endpoints that acknowledge with plain text (e.g. `ok`).
    pub fn accept_text(mut self) -> Self {
        self.accept_text = true;
        self
    }
}

/// Raw outcome of one successful round trip.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs a single HTTP round trip. No retries at this layer.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &OutboundRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// Production transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with the configured timeouts, user agent and TLS policy.
    pub fn new(config: &HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(ACCEPT, "application/json")
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// JSON requester with bounded retries.
#[derive(Debug, Clone)]
pub struct JsonRequester<T = ReqwestTransport> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> JsonRequester<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Default policy applied by [`JsonRequester::request`].
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn get(&self, url: &str) -> Result<Value, RequestError> {
        self.request(&OutboundRequest::get(url)).await
    }

    pub async fn request(&self, request: &OutboundRequest) -> Result<Value, RequestError> {
        self.request_with_policy(request, &self.policy).await
    }

    /// Issue `request` under `policy`.
    ///
    /// The first response whose status is outside the retry set is parsed and
    /// returned, whatever its status class.
    pub async fn request_with_policy(
        &self,
        request: &OutboundRequest,
        policy: &RetryPolicy,
    ) -> Result<Value, RequestError> {
        let attempts = policy.attempts();
        let mut last_error = String::new();

        for attempt in 0..attempts {
            match self.transport.send(request).await {
                Ok(response) if policy.is_retryable_status(response.status) => {
                    warn!(
                        method = %request.method,
                        url = %request.url,
                        attempt = attempt + 1,
                        status = response.status,
                        "Retryable status from upstream"
                    );
                    last_error = format!("retryable status {}", response.status);
                }
                Ok(response) => match decode_body(request, &response) {
                    Ok(value) => {
                        debug!(
                            method = %request.method,
                            url = %request.url,
                            attempt = attempt + 1,
                            status = response.status,
                            "Upstream responded"
                        );
                        metrics::record_outbound("completed");
                        return Ok(value);
                    }
                    Err(err) => {
                        warn!(
                            method = %request.method,
                            url = %request.url,
                            attempt = attempt + 1,
                            status = response.status,
                            error = %err,
                            "Upstream body is not JSON"
                        );
                        last_error =
                            format!("invalid JSON body (status {}): {}", response.status, err);
                    }
                },
                Err(err) => {
                    warn!(
                        method = %request.method,
                        url = %request.url,
                        attempt = attempt + 1,
                        error = %err,
                        "Upstream request failed"
                    );
                    last_error = err.to_string();
                }
            }

            if attempt + 1 < attempts {
                let delay = policy.backoff(attempt);
                debug!(delay = ?delay, "Backing off before retry");
                tokio::time::sleep(delay).await;
            }
        }

        metrics::record_outbound("exhausted");
        Err(RequestError::Exhausted {
            attempts,
            last_error,
        })
    }
}

/// Empty bodies (e.g. 204) parse as `null`.
fn decode_body(
    request: &OutboundRequest,
    response: &TransportResponse,
) -> Result<Value, serde_json::Error> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    match serde_json::from_slice(&response.body) {
        Ok(value) => Ok(value),
        Err(_) if request.accept_text && (200..300).contains(&response.status) => Ok(
            Value::String(String::from_utf8_lossy(&response.body).trim().to_string()),
        ),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replays a fixed script of outcomes and records every request it sees.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        script: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
        pub(crate) seen: Mutex<Vec<OutboundRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn status(self, status: u16, body: &str) -> Self {
            self.push(Ok(TransportResponse {
                status,
                body: body.as_bytes().to_vec(),
            }))
        }

        pub(crate) fn error(self, message: &str) -> Self {
            self.push(Err(TransportError::new(message)))
        }

        fn push(self, outcome: Result<TransportResponse, TransportError>) -> Self {
            self.script.lock().unwrap().push_back(outcome);
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl Transport for ScriptedTransport {
        async fn send(
            &self,
            request: &OutboundRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new("script exhausted")))
        }
    }

    fn policy(max_attempts: u32, base_ms: u64, max_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_backoff: Duration::from_millis(base_ms),
            max_backoff: Duration::from_millis(max_ms),
            ..Default::default()
        }
    }

    fn assert_elapsed(start: Instant, expected_ms: u64) {
        let elapsed = start.elapsed();
        let expected = Duration::from_millis(expected_ms);
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(10),
            "elapsed {elapsed:?}, expected {expected:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_then_returns_third_body() {
        let transport = ScriptedTransport::new()
            .status(503, "busy")
            .status(429, "slow down")
            .status(200, r#"{"ok":true}"#);
        let requester = JsonRequester::new(transport, policy(3, 200, 2000));

        let start = Instant::now();
        let value = requester.get("http://upstream/x").await.unwrap();

        assert_eq!(value, json!({"ok": true}));
        assert_eq!(requester.transport.calls(), 3);
        assert_elapsed(start, 200 + 400);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_max_attempts() {
        let transport = ScriptedTransport::new()
            .status(500, "")
            .status(500, "")
            .status(200, "{}");
        let requester = JsonRequester::new(transport, policy(2, 200, 2000));

        let start = Instant::now();
        let err = requester.get("http://upstream/x").await.unwrap_err();

        let RequestError::Exhausted {
            attempts,
            last_error,
        } = err;
        assert_eq!(attempts, 2);
        assert_eq!(last_error, "retryable status 500");
        assert_eq!(requester.transport.calls(), 2);
        // One sleep between the two attempts, none after the last.
        assert_elapsed(start, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_status_returns_immediately() {
        let transport = ScriptedTransport::new().status(404, r#"{"message":"Not Found"}"#);
        let requester = JsonRequester::new(transport, RetryPolicy::default());

        let start = Instant::now();
        let value = requester.get("http://upstream/missing").await.unwrap();

        assert_eq!(value["message"], "Not Found");
        assert_eq!(requester.transport.calls(), 1);
        assert_elapsed(start, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_errors_are_retried_and_reported() {
        let transport = ScriptedTransport::new()
            .error("connection refused")
            .error("operation timed out")
            .error("connection reset");
        let requester = JsonRequester::new(transport, policy(3, 100, 150));

        let start = Instant::now();
        let err = requester.get("http://upstream/x").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "request failed after 3 attempts: connection reset"
        );
        assert_elapsed(start, 100 + 150);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_error_then_success() {
        let transport = ScriptedTransport::new()
            .error("connection refused")
            .status(201, r#"{"id":7}"#);
        let requester = JsonRequester::new(transport, RetryPolicy::default());

        let value = requester.get("http://upstream/x").await.unwrap();
        assert_eq!(value, json!({"id": 7}));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_capped_across_attempts() {
        let transport = ScriptedTransport::new()
            .status(502, "")
            .status(502, "")
            .status(502, "")
            .status(502, "")
            .status(200, "[]");
        let requester = JsonRequester::new(transport, policy(5, 1000, 1500));

        let start = Instant::now();
        requester.get("http://upstream/x").await.unwrap();
        // 1000 + min(2000,1500) + min(4000,1500) + min(8000,1500)
        assert_elapsed(start, 1000 + 1500 + 1500 + 1500);
    }

    #[tokio::test]
    async fn test_custom_retry_set() {
        let transport = ScriptedTransport::new().status(503, r#"{"down":true}"#);
        let mut custom = RetryPolicy::default();
        custom.retry_on_status.clear();
        let requester = JsonRequester::new(transport, custom);

        let value = requester.get("http://upstream/x").await.unwrap();
        assert_eq!(value, json!({"down": true}));
    }

    #[tokio::test]
    async fn test_body_and_method_forwarded_on_every_attempt() {
        let transport = ScriptedTransport::new()
            .status(500, "")
            .status(204, "");
        let requester = JsonRequester::new(transport, policy(2, 1, 1));

        let request = OutboundRequest::post("http://upstream/hook", json!({"text": "hi"}));
        let value = requester.request(&request).await.unwrap();

        assert_eq!(value, Value::Null);
        let seen = requester.transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for req in seen.iter() {
            assert_eq!(req.method, Method::POST);
            assert_eq!(req.body, Some(json!({"text": "hi"})));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_json_body_is_retried() {
        let transport = ScriptedTransport::new()
            .status(200, "<html>proxy error</html>")
            .status(200, r#"{"ok":true}"#);
        let requester = JsonRequester::new(transport, RetryPolicy::default());

        let start = Instant::now();
        let value = requester.get("http://upstream/x").await.unwrap();

        assert_eq!(value, json!({"ok": true}));
        assert_eq!(requester.transport.calls(), 2);
        assert_elapsed(start, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_non_json_body_exhausts() {
        let transport = ScriptedTransport::new()
            .status(404, "not found")
            .status(404, "not found");
        let requester = JsonRequester::new(transport, policy(2, 200, 2000));

        let err = requester.get("http://upstream/x").await.unwrap_err();
        let RequestError::Exhausted {
            attempts,
            last_error,
        } = err;
        assert_eq!(attempts, 2);
        assert!(last_error.starts_with("invalid JSON body (status 404)"), "{last_error}");
        assert_eq!(requester.transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_accept_text_only_for_success_statuses() {
        let transport = ScriptedTransport::new()
            .status(200, "ok\n")
            .status(400, "invalid_payload")
            .status(400, "invalid_payload");
        let requester = JsonRequester::new(transport, policy(2, 10, 10));
        let request = OutboundRequest::post("http://upstream/hook", json!({})).accept_text();

        let value = requester.request(&request).await.unwrap();
        assert_eq!(value, json!("ok"));
        assert_eq!(requester.transport.calls(), 1);

        let err = requester.request(&request).await.unwrap_err();
        assert!(matches!(err, RequestError::Exhausted { attempts: 2, .. }));
        assert_eq!(requester.transport.calls(), 3);
    }
}
