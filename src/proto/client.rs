//! TravelTime protobuf API client implementation.

use std::sync::Arc;

use prost::Message;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use crate::auth::{CredentialsProvider, EnvCredentials};
use crate::error::TravelTimeError;
use crate::proto::types::{ProtoTimeFilterFastRequest, ProtoTimeFilterFastResponse};
use crate::proto::wire;
use crate::rate_limit::{RateLimitSettings, RateLimitSettingsUpdate, RateLimiter};
use crate::rest::gateway::{BasicAuth, Gateway, RequestSpec, build_http_client};

/// Host of the fast time-filter endpoint.
pub const DEFAULT_PROTO_BASE_URL: &str = "http://proto.api.traveltimeapp.com/api/v2";
/// Host of the fast time-filter endpoint that also returns distances.
pub const DEFAULT_PROTO_DISTANCE_BASE_URL: &str =
    "https://proto-with-distance.api.traveltimeapp.com/api/v2";

const OCTET_STREAM: &str = "application/octet-stream";

/// Client for the binary fast time-filter endpoint.
///
/// Every request costs one hit and is metered when rate limiting is enabled.
#[derive(Clone)]
pub struct TravelTimeProtoClient {
    gateway: Gateway,
    base_url: String,
    distance_base_url: String,
    credentials: Arc<dyn CredentialsProvider>,
}

impl TravelTimeProtoClient {
    /// Create a new client builder.
    pub fn builder() -> TravelTimeProtoClientBuilder {
        TravelTimeProtoClientBuilder::new()
    }

    /// Create a client with credentials from `TRAVELTIME_APP_ID` / `TRAVELTIME_API_KEY`.
    pub fn from_env() -> Result<Self, TravelTimeError> {
        Self::builder()
            .credentials(Arc::new(EnvCredentials::from_env()?))
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn distance_base_url(&self) -> &str {
        &self.distance_base_url
    }

    /// The rate limiter shared by this client's requests.
    pub fn rate_limiter(&self) -> &RateLimiter {
        self.gateway.limiter()
    }

    /// Merge `update` into the rate limit settings.
    pub fn set_rate_limit_settings(
        &self,
        update: &RateLimitSettingsUpdate,
    ) -> Result<(), TravelTimeError> {
        self.gateway.limiter().set_rate_limit_settings(update)
    }

    /// Travel times from one origin to many destinations.
    pub async fn time_filter_fast(
        &self,
        request: &ProtoTimeFilterFastRequest,
    ) -> Result<ProtoTimeFilterFastResponse, TravelTimeError> {
        let message = request.to_message(false)?;
        self.send(&self.base_url, request, message).await
    }

    /// Travel times and distances from one origin to many destinations.
    ///
    /// Only [`ProtoCountry::Uk`](crate::proto::ProtoCountry::Uk) and
    /// [`ProtoCountry::Ie`](crate::proto::ProtoCountry::Ie) with driving,
    /// driving+ferry or walking+ferry are served.
    pub async fn time_filter_fast_distance(
        &self,
        request: &ProtoTimeFilterFastRequest,
    ) -> Result<ProtoTimeFilterFastResponse, TravelTimeError> {
        if !request.country.supports_distance() {
            return Err(TravelTimeError::Config(format!(
                "Distances are not available for country {}",
                request.country
            )));
        }
        if !request.transportation.supports_distance() {
            return Err(TravelTimeError::Config(format!(
                "Distances are not available for transportation {}",
                request.transportation
            )));
        }
        let message = request.to_message(true)?;
        self.send(&self.distance_base_url, request, message).await
    }

    async fn send(
        &self,
        base_url: &str,
        request: &ProtoTimeFilterFastRequest,
        message: wire::TimeFilterFastRequest,
    ) -> Result<ProtoTimeFilterFastResponse, TravelTimeError> {
        let url = format!(
            "{}/{}/time-filter/fast/{}",
            base_url, request.country, request.transportation
        );
        let creds = self.credentials.get_credentials();

        let mut spec = RequestSpec::new(Method::POST, url);
        spec.headers.insert(CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM));
        spec.headers.insert(ACCEPT, HeaderValue::from_static(OCTET_STREAM));
        spec.basic_auth = Some(BasicAuth {
            username: creds.app_id.clone(),
            password: creds.expose_key().to_string(),
        });
        spec.body = Some(message.encode_to_vec());
        spec.hits = 1;
        spec.rate_limited = true;

        let body = self.gateway.send(spec).await?;
        let response = wire::TimeFilterFastResponse::decode(body.as_slice())?;
        response.try_into()
    }
}

impl std::fmt::Debug for TravelTimeProtoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelTimeProtoClient")
            .field("base_url", &self.base_url)
            .field("distance_base_url", &self.distance_base_url)
            .field("app_id", &self.credentials.get_credentials().app_id)
            .field("rate_limiter", self.gateway.limiter())
            .finish()
    }
}

fn normalize_base_url(url: String) -> Result<String, TravelTimeError> {
    url::Url::parse(&url)?;
    Ok(url.trim_end_matches('/').to_string())
}

/// Builder for [`TravelTimeProtoClient`].
pub struct TravelTimeProtoClientBuilder {
    base_url: String,
    distance_base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    user_agent: Option<String>,
    max_retries: u32,
    rate_limit_settings: RateLimitSettings,
    rate_limiter: Option<RateLimiter>,
}

impl TravelTimeProtoClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_PROTO_BASE_URL.to_string(),
            distance_base_url: DEFAULT_PROTO_DISTANCE_BASE_URL.to_string(),
            credentials: None,
            user_agent: None,
            max_retries: 3,
            rate_limit_settings: RateLimitSettings::default(),
            rate_limiter: None,
        }
    }

    /// Set the host of [`TravelTimeProtoClient::time_filter_fast`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the host of [`TravelTimeProtoClient::time_filter_fast_distance`].
    pub fn distance_base_url(mut self, url: impl Into<String>) -> Self {
        self.distance_base_url = url.into();
        self
    }

    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the maximum number of retries for transient transport failures.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn rate_limit_settings(mut self, settings: RateLimitSettings) -> Self {
        self.rate_limit_settings = settings;
        self
    }

    /// Share a limiter, e.g. with a [`TravelTimeClient`](crate::rest::TravelTimeClient).
    pub fn rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TravelTimeProtoClient, TravelTimeError> {
        let credentials = self.credentials.ok_or(TravelTimeError::MissingCredentials)?;
        credentials.get_credentials().validate()?;
        let base_url = normalize_base_url(self.base_url)?;
        let distance_base_url = normalize_base_url(self.distance_base_url)?;

        let limiter = match self.rate_limiter {
            Some(limiter) => limiter,
            None => RateLimiter::new(self.rate_limit_settings)?,
        };

        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("traveltime-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("traveltime-api-client"));
        headers.insert(USER_AGENT, header_value);

        Ok(TravelTimeProtoClient {
            gateway: Gateway::new(build_http_client(headers, self.max_retries), limiter),
            base_url,
            distance_base_url,
            credentials,
        })
    }
}

impl Default for TravelTimeProtoClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentials;
    use crate::proto::{ProtoCountry, ProtoTransportation};
    use crate::types::Coords;

    fn client() -> TravelTimeProtoClient {
        TravelTimeProtoClient::builder()
            .credentials(Arc::new(StaticCredentials::new("app", "key")))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_requires_credentials() {
        let result = TravelTimeProtoClient::builder().build();
        assert!(matches!(result, Err(TravelTimeError::MissingCredentials)));
    }

    #[test]
    fn test_shared_limiter() {
        let limiter = RateLimiter::default();
        let proto = TravelTimeProtoClient::builder()
            .credentials(Arc::new(StaticCredentials::new("app", "key")))
            .rate_limiter(limiter.clone())
            .build()
            .unwrap();
        limiter
            .set_rate_limit_settings(&RateLimitSettingsUpdate::default().hits_per_minute(7))
            .unwrap();
        assert_eq!(proto.rate_limiter().settings().hits_per_minute, 7);
    }

    #[tokio::test]
    async fn test_distance_rejects_unsupported_country() {
        let request = ProtoTimeFilterFastRequest {
            country: ProtoCountry::Nl,
            departure_location: Coords::new(52.37, 4.89),
            destination_coordinates: vec![Coords::new(52.38, 4.9)],
            transportation: ProtoTransportation::Driving,
            travel_time: 1800,
        };
        let result = client().time_filter_fast_distance(&request).await;
        assert!(matches!(result, Err(TravelTimeError::Config(_))));
    }
}
