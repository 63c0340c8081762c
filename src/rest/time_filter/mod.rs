//! Travel time matrix endpoints.

mod types;

pub use types::*;

use crate::error::TravelTimeError;
use crate::rest::TravelTimeClient;
use crate::rest::batch::{BatchResponse, execute_batch};
use crate::rest::endpoints::time_filter;
use crate::rest::simple::{TimeFilterFastSimple, TimeFilterSimple};

impl TravelTimeClient {
    /// Get travel times from one location to many (or many to one).
    pub async fn time_filter(
        &self,
        request: &TimeFilterRequest,
    ) -> Result<TimeFilterResponse, TravelTimeError> {
        self.post(time_filter::TIME_FILTER, request).await
    }

    /// Send several time-filter requests; failures are reported per item.
    pub async fn time_filter_batch(
        &self,
        requests: &[TimeFilterRequest],
    ) -> Vec<BatchResponse<TimeFilterResponse>> {
        execute_batch(
            requests,
            |request| self.time_filter(request),
            self.batch_chunk_size(),
        )
        .await
    }

    /// Time filter with searches described as origin id to destination ids.
    pub async fn time_filter_simple(
        &self,
        request: &TimeFilterSimple,
    ) -> Result<TimeFilterResponse, TravelTimeError> {
        self.time_filter(&request.to_request()).await
    }

    /// Get travel times for weekday morning using the fast endpoint.
    pub async fn time_filter_fast(
        &self,
        request: &TimeFilterFastRequest,
    ) -> Result<TimeFilterFastResponse, TravelTimeError> {
        self.post(time_filter::TIME_FILTER_FAST, request).await
    }

    /// Send several fast time-filter requests; failures are reported per item.
    pub async fn time_filter_fast_batch(
        &self,
        requests: &[TimeFilterFastRequest],
    ) -> Vec<BatchResponse<TimeFilterFastResponse>> {
        execute_batch(
            requests,
            |request| self.time_filter_fast(request),
            self.batch_chunk_size(),
        )
        .await
    }

    /// Fast time filter with searches described as origin id to destination ids.
    pub async fn time_filter_fast_simple(
        &self,
        request: &TimeFilterFastSimple,
    ) -> Result<TimeFilterFastResponse, TravelTimeError> {
        self.time_filter_fast(&request.to_request()).await
    }

    /// Find postcodes reachable within a travel time.
    pub async fn time_filter_postcodes(
        &self,
        request: &TimeFilterPostcodesRequest,
    ) -> Result<TimeFilterPostcodesResponse, TravelTimeError> {
        self.post(time_filter::POSTCODES, request).await
    }

    /// Send several postcode requests; failures are reported per item.
    pub async fn time_filter_postcodes_batch(
        &self,
        requests: &[TimeFilterPostcodesRequest],
    ) -> Vec<BatchResponse<TimeFilterPostcodesResponse>> {
        execute_batch(
            requests,
            |request| self.time_filter_postcodes(request),
            self.batch_chunk_size(),
        )
        .await
    }

    /// Find postcode districts reachable within a travel time.
    pub async fn time_filter_postcode_districts(
        &self,
        request: &TimeFilterPostcodeDistrictsRequest,
    ) -> Result<TimeFilterPostcodeDistrictsResponse, TravelTimeError> {
        self.post(time_filter::POSTCODE_DISTRICTS, request).await
    }

    /// Send several postcode district requests; failures are reported per item.
    pub async fn time_filter_postcode_districts_batch(
        &self,
        requests: &[TimeFilterPostcodeDistrictsRequest],
    ) -> Vec<BatchResponse<TimeFilterPostcodeDistrictsResponse>> {
        execute_batch(
            requests,
            |request| self.time_filter_postcode_districts(request),
            self.batch_chunk_size(),
        )
        .await
    }

    /// Find postcode sectors reachable within a travel time.
    pub async fn time_filter_postcode_sectors(
        &self,
        request: &TimeFilterPostcodeSectorsRequest,
    ) -> Result<TimeFilterPostcodeSectorsResponse, TravelTimeError> {
        self.post(time_filter::POSTCODE_SECTORS, request).await
    }

    /// Send several postcode sector requests; failures are reported per item.
    pub async fn time_filter_postcode_sectors_batch(
        &self,
        requests: &[TimeFilterPostcodeSectorsRequest],
    ) -> Vec<BatchResponse<TimeFilterPostcodeSectorsResponse>> {
        execute_batch(
            requests,
            |request| self.time_filter_postcode_sectors(request),
            self.batch_chunk_size(),
        )
        .await
    }
}
