//! Request gateway shared by the JSON and protobuf clients.
//!
//! The gateway decides whether a request is metered by the [`RateLimiter`],
//! sends it over the middleware-wrapped HTTP client and owns the `429` retry loop.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{
    RetryTransientMiddleware, Retryable, RetryableStrategy, default_on_request_failure,
    default_on_request_success,
};
use reqwest_tracing::TracingMiddleware;

use crate::error::{ApiError, TravelTimeError};
use crate::rate_limit::RateLimiter;

/// Number of rate-limit hits a request body costs.
pub trait HitCost {
    /// Hits consumed from the per-minute budget.
    fn hits(&self) -> u32;
}

/// Transient-failure strategy that leaves `429` to the gateway.
struct TransientExceptRateLimit;

impl RetryableStrategy for TransientExceptRateLimit {
    fn handle(
        &self,
        res: &Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => None,
            Ok(response) => default_on_request_success(response),
            Err(error) => default_on_request_failure(error),
        }
    }
}

/// Build the HTTP client with tracing and transient retry middleware.
pub(crate) fn build_http_client(
    default_headers: HeaderMap,
    max_retries: u32,
) -> ClientWithMiddleware {
    let reqwest_client = reqwest::Client::builder()
        .default_headers(default_headers)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    ClientBuilder::new(reqwest_client)
        .with(TracingMiddleware::default())
        .with(RetryTransientMiddleware::new_with_policy_and_strategy(
            retry_policy,
            TransientExceptRateLimit,
        ))
        .build()
}

/// Basic auth for the protobuf endpoints.
#[derive(Clone)]
pub(crate) struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// A fully prepared request.
#[derive(Clone)]
pub(crate) struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub basic_auth: Option<BasicAuth>,
    pub body: Option<Vec<u8>>,
    pub hits: u32,
    pub rate_limited: bool,
}

impl RequestSpec {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            basic_auth: None,
            body: None,
            hits: 0,
            rate_limited: false,
        }
    }
}

struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

/// HTTP transport plus the client's rate limiter.
#[derive(Clone)]
pub(crate) struct Gateway {
    http: ClientWithMiddleware,
    limiter: RateLimiter,
}

impl Gateway {
    pub fn new(http: ClientWithMiddleware, limiter: RateLimiter) -> Self {
        Self { http, limiter }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Send `spec` and return the body of a successful response.
    ///
    /// A `429` with rate limiting enabled pauses the limiter for
    /// `time_between_retries` and resubmits the request at the front of the
    /// queue, at most `retry_count` times. The retry is queued before the
    /// limiter resumes, so requests that arrived during the pause run after it.
    pub async fn send(&self, spec: RequestSpec) -> Result<Vec<u8>, TravelTimeError> {
        let mut attempt: u32 = 0;
        let mut pending = self.submit(&spec, false);
        loop {
            let response = pending.await?;
            let status = response.status;
            if status.is_success() {
                return Ok(response.body);
            }

            let api_error = ApiError::from_body(&response.body);
            if status == StatusCode::TOO_MANY_REQUESTS && self.limiter.is_enabled() {
                if attempt < self.limiter.retry_count() {
                    attempt += 1;
                    let wait = self.limiter.time_between_retries();
                    tracing::warn!(
                        url = %spec.url,
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "rate limited by the API; pausing queue before retry"
                    );
                    self.limiter.set_sleeping(true);
                    tokio::time::sleep(wait).await;
                    pending = self.submit(&spec, true);
                    self.limiter.set_sleeping(false);
                    continue;
                }
                return Err(TravelTimeError::RateLimitExceeded {
                    attempts: attempt + 1,
                    api_error,
                });
            }

            return Err(match api_error {
                Some(api_error) => TravelTimeError::Api(api_error),
                None => TravelTimeError::InvalidResponse(format!(
                    "HTTP {}: {}",
                    status,
                    String::from_utf8_lossy(&response.body)
                )),
            });
        }
    }

    /// Hand `spec` to the limiter, or prepare a direct send when it is not metered.
    ///
    /// Metered requests are queued before this returns.
    fn submit(
        &self,
        spec: &RequestSpec,
        priority: bool,
    ) -> BoxFuture<'static, Result<RawResponse, TravelTimeError>> {
        let http = self.http.clone();
        let owned = spec.clone();
        if spec.rate_limited && self.limiter.is_enabled() {
            let task = self.limiter.add_and_execute(
                move || async move { execute(&http, &owned).await },
                spec.hits,
                priority,
            );
            async move { task.await? }.boxed()
        } else {
            async move { execute(&http, &owned).await }.boxed()
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("limiter", &self.limiter)
            .finish()
    }
}

async fn execute(
    http: &ClientWithMiddleware,
    spec: &RequestSpec,
) -> Result<RawResponse, TravelTimeError> {
    let mut request = http
        .request(spec.method.clone(), &spec.url)
        .headers(spec.headers.clone());
    if let Some(auth) = &spec.basic_auth {
        request = request.basic_auth(&auth.username, Some(&auth.password));
    }
    if let Some(body) = &spec.body {
        request = request.body(body.clone());
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?.to_vec();
    tracing::trace!(url = %spec.url, %status, bytes = body.len(), "response received");
    Ok(RawResponse { status, body })
}
