//! TravelTime REST API client implementation.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::{CredentialsProvider, EnvCredentials};
use crate::error::TravelTimeError;
use crate::rate_limit::{RateLimitSettings, RateLimitSettingsUpdate, RateLimiter};
use crate::rest::endpoints::{DEFAULT_BASE_URL, is_rate_limited};
use crate::rest::gateway::{Gateway, HitCost, RequestSpec, build_http_client};
use crate::rest::geocoding::{GeocodingOptions, GeocodingResponse};
use crate::rest::isochrones::{
    DistanceMapRequest, DistanceMapResponse, TimeMapFastRequest, TimeMapRequest, TimeMapResponse,
};
use crate::rest::map_info::{MapInfoResponse, SupportedLocationsRequest, SupportedLocationsResponse};
use crate::rest::routes::{RoutesRequest, RoutesResponse};
use crate::rest::time_filter::{
    TimeFilterFastRequest, TimeFilterFastResponse, TimeFilterPostcodeDistrictsRequest,
    TimeFilterPostcodeDistrictsResponse, TimeFilterPostcodeSectorsRequest,
    TimeFilterPostcodeSectorsResponse, TimeFilterPostcodesRequest, TimeFilterPostcodesResponse,
    TimeFilterRequest, TimeFilterResponse,
};
use crate::rest::traits::TravelTimeApi;
use crate::types::Coords;

const APPLICATION_ID_HEADER: HeaderName = HeaderName::from_static("x-application-id");
const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
const APPLICATION_JSON: &str = "application/json";

/// The TravelTime REST API client.
///
/// Every request of one client instance shares a single [`RateLimiter`]. Clones
/// share it too; independently built clients do not.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use traveltime_api_client::RateLimitSettings;
/// use traveltime_api_client::auth::StaticCredentials;
/// use traveltime_api_client::rest::TravelTimeClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = TravelTimeClient::builder()
///         .credentials(Arc::new(StaticCredentials::new("app_id", "api_key")))
///         .rate_limit_settings(RateLimitSettings {
///             enabled: true,
///             hits_per_minute: 60,
///             ..Default::default()
///         })
///         .build()?;
///
///     let info = client.map_info().await?;
///     println!("{} maps available", info.maps.len());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct TravelTimeClient {
    gateway: Gateway,
    base_url: String,
    credentials: Arc<dyn CredentialsProvider>,
    batch_chunk_size: Option<usize>,
}

impl TravelTimeClient {
    /// Create a new client builder.
    pub fn builder() -> TravelTimeClientBuilder {
        TravelTimeClientBuilder::new()
    }

    /// Create a client with credentials from `TRAVELTIME_APP_ID` / `TRAVELTIME_API_KEY`.
    pub fn from_env() -> Result<Self, TravelTimeError> {
        Self::builder()
            .credentials(Arc::new(EnvCredentials::from_env()?))
            .build()
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Point the client at a different base URL.
    pub fn set_base_url(&mut self, url: impl Into<String>) -> Result<(), TravelTimeError> {
        self.base_url = normalize_base_url(url.into())?;
        Ok(())
    }

    /// Restore the default base URL.
    pub fn reset_base_url(&mut self) {
        self.base_url = DEFAULT_BASE_URL.to_string();
    }

    /// Replace the credentials used for subsequent requests.
    pub fn set_credentials(
        &mut self,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Result<(), TravelTimeError> {
        credentials.get_credentials().validate()?;
        self.credentials = credentials;
        Ok(())
    }

    /// Merge `update` into the rate limit settings.
    ///
    /// Takes effect for requests scheduled afterwards.
    pub fn set_rate_limit_settings(
        &self,
        update: &RateLimitSettingsUpdate,
    ) -> Result<(), TravelTimeError> {
        self.gateway.limiter().set_rate_limit_settings(update)
    }

    /// The rate limiter shared by this client's requests.
    ///
    /// Pass it to [`crate::proto::TravelTimeProtoClientBuilder::rate_limiter`] to
    /// meter both clients against the same budget.
    pub fn rate_limiter(&self) -> &RateLimiter {
        self.gateway.limiter()
    }

    /// Wave size used by the `_batch` methods (`None` = all at once).
    pub fn batch_chunk_size(&self) -> Option<usize> {
        self.batch_chunk_size
    }

    /// Build a request with auth headers for `path`.
    fn request_spec(&self, method: Method, path: &str) -> Result<RequestSpec, TravelTimeError> {
        let creds = self.credentials.get_credentials();
        let mut spec = RequestSpec::new(method, format!("{}{}", self.base_url, path));
        spec.headers.insert(APPLICATION_ID_HEADER, header_value(&creds.app_id)?);
        spec.headers.insert(API_KEY_HEADER, header_value(creds.expose_key())?);
        spec.rate_limited = is_rate_limited(path);
        Ok(spec)
    }

    /// Make a POST request and return the raw body.
    pub(crate) async fn post_raw<B>(
        &self,
        path: &str,
        body: &B,
        accept: Option<&str>,
    ) -> Result<Vec<u8>, TravelTimeError>
    where
        B: Serialize + HitCost,
    {
        let mut spec = self.request_spec(Method::POST, path)?;
        spec.headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        spec.headers.insert(ACCEPT, header_value(accept.unwrap_or(APPLICATION_JSON))?);
        spec.body = Some(serde_json::to_vec(body)?);
        spec.hits = body.hits();
        self.gateway.send(spec).await
    }

    /// Make a POST request with a JSON body.
    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, TravelTimeError>
    where
        B: Serialize + HitCost,
        T: DeserializeOwned,
    {
        let bytes = self.post_raw(path, body, None).await?;
        parse_json(&bytes)
    }

    /// Make a GET request with optional query parameters.
    pub(crate) async fn get<Q, T>(
        &self,
        path: &str,
        params: Option<&Q>,
        accept_language: Option<&str>,
    ) -> Result<T, TravelTimeError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut spec = self.request_spec(Method::GET, path)?;
        if let Some(params) = params {
            let query_string = serde_urlencoded::to_string(params)
                .map_err(|e| TravelTimeError::InvalidResponse(e.to_string()))?;
            if !query_string.is_empty() {
                spec.url = format!("{}?{}", spec.url, query_string);
            }
        }
        spec.headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if let Some(language) = accept_language {
            spec.headers.insert(ACCEPT_LANGUAGE, header_value(language)?);
        }
        let bytes = self.gateway.send(spec).await?;
        parse_json(&bytes)
    }
}

impl std::fmt::Debug for TravelTimeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelTimeClient")
            .field("base_url", &self.base_url)
            .field("app_id", &self.credentials.get_credentials().app_id)
            .field("rate_limiter", self.gateway.limiter())
            .finish()
    }
}

impl TravelTimeApi for TravelTimeClient {
    // ========== Isochrones ==========

    async fn time_map(&self, request: &TimeMapRequest) -> Result<TimeMapResponse, TravelTimeError> {
        TravelTimeClient::time_map(self, request).await
    }

    async fn time_map_fast(
        &self,
        request: &TimeMapFastRequest,
    ) -> Result<TimeMapResponse, TravelTimeError> {
        TravelTimeClient::time_map_fast(self, request).await
    }

    async fn distance_map(
        &self,
        request: &DistanceMapRequest,
    ) -> Result<DistanceMapResponse, TravelTimeError> {
        TravelTimeClient::distance_map(self, request).await
    }

    // ========== Matrices ==========

    async fn time_filter(
        &self,
        request: &TimeFilterRequest,
    ) -> Result<TimeFilterResponse, TravelTimeError> {
        TravelTimeClient::time_filter(self, request).await
    }

    async fn time_filter_fast(
        &self,
        request: &TimeFilterFastRequest,
    ) -> Result<TimeFilterFastResponse, TravelTimeError> {
        TravelTimeClient::time_filter_fast(self, request).await
    }

    async fn time_filter_postcodes(
        &self,
        request: &TimeFilterPostcodesRequest,
    ) -> Result<TimeFilterPostcodesResponse, TravelTimeError> {
        TravelTimeClient::time_filter_postcodes(self, request).await
    }

    async fn time_filter_postcode_districts(
        &self,
        request: &TimeFilterPostcodeDistrictsRequest,
    ) -> Result<TimeFilterPostcodeDistrictsResponse, TravelTimeError> {
        TravelTimeClient::time_filter_postcode_districts(self, request).await
    }

    async fn time_filter_postcode_sectors(
        &self,
        request: &TimeFilterPostcodeSectorsRequest,
    ) -> Result<TimeFilterPostcodeSectorsResponse, TravelTimeError> {
        TravelTimeClient::time_filter_postcode_sectors(self, request).await
    }

    // ========== Routing ==========

    async fn routes(&self, request: &RoutesRequest) -> Result<RoutesResponse, TravelTimeError> {
        TravelTimeClient::routes(self, request).await
    }

    // ========== Geocoding ==========

    async fn geocoding(
        &self,
        query: &str,
        options: &GeocodingOptions,
    ) -> Result<GeocodingResponse, TravelTimeError> {
        TravelTimeClient::geocoding(self, query, options).await
    }

    async fn geocoding_reverse(
        &self,
        coords: Coords,
        accept_language: Option<&str>,
    ) -> Result<GeocodingResponse, TravelTimeError> {
        TravelTimeClient::geocoding_reverse(self, coords, accept_language).await
    }

    // ========== Maps ==========

    async fn map_info(&self) -> Result<MapInfoResponse, TravelTimeError> {
        TravelTimeClient::map_info(self).await
    }

    async fn supported_locations(
        &self,
        request: &SupportedLocationsRequest,
    ) -> Result<SupportedLocationsResponse, TravelTimeError> {
        TravelTimeClient::supported_locations(self, request).await
    }
}

/// Parse a JSON response body.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, TravelTimeError> {
    serde_json::from_slice(body).map_err(|e| {
        TravelTimeError::InvalidResponse(format!(
            "Failed to parse response: {}. Body: {}",
            e,
            String::from_utf8_lossy(body)
        ))
    })
}

fn header_value(value: &str) -> Result<HeaderValue, TravelTimeError> {
    HeaderValue::from_str(value)
        .map_err(|e| TravelTimeError::Config(format!("Invalid header value: {e}")))
}

fn normalize_base_url(url: String) -> Result<String, TravelTimeError> {
    url::Url::parse(&url)?;
    Ok(url.trim_end_matches('/').to_string())
}

/// Builder for [`TravelTimeClient`].
pub struct TravelTimeClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    user_agent: Option<String>,
    max_retries: u32,
    rate_limit_settings: RateLimitSettings,
    rate_limiter: Option<RateLimiter>,
    batch_chunk_size: Option<usize>,
}

impl TravelTimeClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            user_agent: None,
            max_retries: 3,
            rate_limit_settings: RateLimitSettings::default(),
            rate_limiter: None,
            batch_chunk_size: None,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the credentials provider.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the maximum number of retries for transient transport failures.
    ///
    /// `429` responses are not covered by this; see [`RateLimitSettings::retry_count`].
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the rate limit settings for a new limiter.
    pub fn rate_limit_settings(mut self, settings: RateLimitSettings) -> Self {
        self.rate_limit_settings = settings;
        self
    }

    /// Reuse an existing rate limiter instead of creating one.
    pub fn rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Run `_batch` calls in waves of `size` requests.
    pub fn batch_chunk_size(mut self, size: usize) -> Self {
        self.batch_chunk_size = Some(size);
        self
    }

    /// Build the client.
    ///
    /// Fails if credentials are missing or empty, the base URL does not parse,
    /// or the rate limit settings are invalid.
    pub fn build(self) -> Result<TravelTimeClient, TravelTimeError> {
        let credentials = self.credentials.ok_or(TravelTimeError::MissingCredentials)?;
        credentials.get_credentials().validate()?;
        let base_url = normalize_base_url(self.base_url)?;

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

        let http = build_http_client(headers, self.max_retries);

        Ok(TravelTimeClient {
            gateway: Gateway::new(http, limiter),
            base_url,
            credentials,
            batch_chunk_size: self.batch_chunk_size,
        })
    }
}

impl Default for TravelTimeClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentials;

    fn credentials() -> Arc<dyn CredentialsProvider> {
        Arc::new(StaticCredentials::new("app", "key"))
    }

    #[test]
    fn test_build_requires_credentials() {
        let result = TravelTimeClient::builder().build();
        assert!(matches!(result, Err(TravelTimeError::MissingCredentials)));
    }

    #[test]
    fn test_build_rejects_empty_credentials() {
        let result = TravelTimeClient::builder()
            .credentials(Arc::new(StaticCredentials::new("", "")))
            .build();
        assert!(matches!(result, Err(TravelTimeError::Config(_))));
    }

    #[test]
    fn test_build_rejects_zero_hits_per_minute() {
        let result = TravelTimeClient::builder()
            .credentials(credentials())
            .rate_limit_settings(RateLimitSettings {
                enabled: true,
                hits_per_minute: 0,
                ..Default::default()
            })
            .build();
        assert!(matches!(result, Err(TravelTimeError::Config(_))));
    }

    #[test]
    fn test_base_url_knobs() {
        let mut client = TravelTimeClient::builder()
            .credentials(credentials())
            .base_url("http://localhost:8080/v4/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v4");

        assert!(client.set_base_url("not a url").is_err());
        client.reset_base_url();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_independent_clients_do_not_share_limiter() {
        let a = TravelTimeClient::builder().credentials(credentials()).build().unwrap();
        let b = TravelTimeClient::builder().credentials(credentials()).build().unwrap();
        a.set_rate_limit_settings(&RateLimitSettingsUpdate::default().hits_per_minute(5))
            .unwrap();
        assert_eq!(a.rate_limiter().settings().hits_per_minute, 5);
        assert_eq!(b.rate_limiter().settings().hits_per_minute, 60);

        let clone = a.clone();
        assert_eq!(clone.rate_limiter().settings().hits_per_minute, 5);
    }
}
