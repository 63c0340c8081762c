//! Trait definition for the TravelTime REST API.
//!
//! [`TravelTimeApi`] abstracts the single-request endpoints. The batch and
//! matrix flows are written against it, so they run unchanged against
//! [`TravelTimeClient`](crate::rest::TravelTimeClient) or a test double.
//!
//! # Example
//!
//! ```rust,ignore
//! use traveltime_api_client::rest::TravelTimeApi;
//!
//! use traveltime_api_client::TravelTimeError;
//!
//! async fn print_maps<C: TravelTimeApi>(client: &C) -> Result<(), TravelTimeError> {
//!     for map in client.map_info().await?.maps {
//!         println!("{}", map.name);
//!     }
//!     Ok(())
//! }
//! ```

use std::future::Future;

use crate::error::TravelTimeError;
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
use crate::types::Coords;

/// Single-request TravelTime endpoints.
///
/// All methods return `Result<T, TravelTimeError>`.
pub trait TravelTimeApi: Send + Sync {
    // ========== Isochrones ==========

    fn time_map(
        &self,
        request: &TimeMapRequest,
    ) -> impl Future<Output = Result<TimeMapResponse, TravelTimeError>> + Send;

    fn time_map_fast(
        &self,
        request: &TimeMapFastRequest,
    ) -> impl Future<Output = Result<TimeMapResponse, TravelTimeError>> + Send;

    fn distance_map(
        &self,
        request: &DistanceMapRequest,
    ) -> impl Future<Output = Result<DistanceMapResponse, TravelTimeError>> + Send;

    // ========== Matrices ==========

    fn time_filter(
        &self,
        request: &TimeFilterRequest,
    ) -> impl Future<Output = Result<TimeFilterResponse, TravelTimeError>> + Send;

    fn time_filter_fast(
        &self,
        request: &TimeFilterFastRequest,
    ) -> impl Future<Output = Result<TimeFilterFastResponse, TravelTimeError>> + Send;

    fn time_filter_postcodes(
        &self,
        request: &TimeFilterPostcodesRequest,
    ) -> impl Future<Output = Result<TimeFilterPostcodesResponse, TravelTimeError>> + Send;

    fn time_filter_postcode_districts(
        &self,
        request: &TimeFilterPostcodeDistrictsRequest,
    ) -> impl Future<Output = Result<TimeFilterPostcodeDistrictsResponse, TravelTimeError>> + Send;

    fn time_filter_postcode_sectors(
        &self,
        request: &TimeFilterPostcodeSectorsRequest,
    ) -> impl Future<Output = Result<TimeFilterPostcodeSectorsResponse, TravelTimeError>> + Send;

    // ========== Routing ==========

    fn routes(
        &self,
        request: &RoutesRequest,
    ) -> impl Future<Output = Result<RoutesResponse, TravelTimeError>> + Send;

    // ========== Geocoding ==========

    fn geocoding(
        &self,
        query: &str,
        options: &GeocodingOptions,
    ) -> impl Future<Output = Result<GeocodingResponse, TravelTimeError>> + Send;

    fn geocoding_reverse(
        &self,
        coords: Coords,
        accept_language: Option<&str>,
    ) -> impl Future<Output = Result<GeocodingResponse, TravelTimeError>> + Send;

    // ========== Maps ==========

    fn map_info(&self) -> impl Future<Output = Result<MapInfoResponse, TravelTimeError>> + Send;

    fn supported_locations(
        &self,
        request: &SupportedLocationsRequest,
    ) -> impl Future<Output = Result<SupportedLocationsResponse, TravelTimeError>> + Send;
}
