//! Error types for the TravelTime client library.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// The main error type for all TravelTime client operations.
#[derive(Error, Debug)]
pub enum TravelTimeError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Protobuf payload could not be decoded
    #[error("Protobuf decode error: {0}")]
    ProtoDecode(#[from] prost::DecodeError),

    /// TravelTime API returned an error body
    #[error("TravelTime API error: {0}")]
    Api(ApiError),

    /// The protobuf endpoint answered with an error message
    #[error("TravelTime protobuf API error: {0}")]
    ProtoApi(String),

    /// The API kept answering `429 Too Many Requests` after all retries were spent
    #[error("Rate limit exceeded after {attempts} attempt(s)")]
    RateLimitExceeded {
        /// Number of requests sent, including the first one
        attempts: u32,
        /// Error body returned with the last 429, if it could be parsed
        api_error: Option<ApiError>,
    },

    /// Invalid client or request configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing required credentials
    #[error("Missing credentials: application id and api key are required")]
    MissingCredentials,

    /// A scheduled task was dropped before producing a result
    #[error("Scheduled request was aborted before completion")]
    TaskAborted,
}

impl TravelTimeError {
    /// Returns the provider error body if this error carries one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            TravelTimeError::Api(err) => Some(err),
            TravelTimeError::RateLimitExceeded { api_error, .. } => api_error.as_ref(),
            _ => None,
        }
    }

    /// Check if this is a rate limit rejection.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, TravelTimeError::RateLimitExceeded { .. })
            || self.api_error().is_some_and(ApiError::is_rate_limit)
    }
}

/// TravelTime API error body.
///
/// Returned by the API with every non-2xx response, e.g.
/// `{"http_status": 422, "error_code": 15, "description": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiError {
    /// HTTP status code of the response
    pub http_status: u16,
    /// TravelTime specific error code
    pub error_code: i64,
    /// Human-readable error message
    pub description: String,
    /// Link to the documentation of this error code
    #[serde(default)]
    pub documentation_link: String,
    /// Additional information, usually per-field validation messages
    #[serde(default)]
    pub additional_info: HashMap<String, serde_json::Value>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HTTP {} (code {}): {}",
            self.http_status, self.error_code, self.description
        )
    }
}

impl ApiError {
    /// Create a new API error from status, code and description.
    pub fn new(http_status: u16, error_code: i64, description: impl Into<String>) -> Self {
        Self {
            http_status,
            error_code,
            description: description.into(),
            documentation_link: String::new(),
            additional_info: HashMap::new(),
        }
    }

    /// Parse an API error from a response body.
    ///
    /// Returns `None` unless the body has a non-zero `error_code` and a
    /// non-empty `description`.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let parsed: ApiError = serde_json::from_slice(body).ok()?;
        (parsed.error_code != 0 && !parsed.description.is_empty()).then_some(parsed)
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.http_status == 429
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_body() {
        let body = br#"{
            "http_status": 422,
            "error_code": 15,
            "description": "Travel time must be between 60 and 14400",
            "documentation_link": "https://docs.traveltime.com/api/reference/error-codes",
            "additional_info": {"departure_searches.0.travel_time": ["too high"]}
        }"#;
        let error = ApiError::from_body(body).unwrap();
        assert_eq!(error.http_status, 422);
        assert_eq!(error.error_code, 15);
        assert!(error.additional_info.contains_key("departure_searches.0.travel_time"));
    }

    #[test]
    fn test_api_error_rejects_foreign_body() {
        assert!(ApiError::from_body(b"<html>Bad gateway</html>").is_none());
        let incomplete = br#"{"http_status": 500, "error_code": 0, "description": ""}"#;
        assert!(ApiError::from_body(incomplete).is_none());
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiError::new(401, 2, "Invalid credentials");
        assert_eq!(error.to_string(), "HTTP 401 (code 2): Invalid credentials");
    }

    #[test]
    fn test_rate_limit_detection() {
        let err = TravelTimeError::RateLimitExceeded {
            attempts: 4,
            api_error: None,
        };
        assert!(err.is_rate_limit());
        assert!(TravelTimeError::Api(ApiError::new(429, 1, "Too many requests")).is_rate_limit());
        assert!(!TravelTimeError::Config("bad".into()).is_rate_limit());
    }
}
