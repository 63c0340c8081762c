//! Isochrone endpoints.

mod types;

pub use types::*;

use crate::error::TravelTimeError;
use crate::rest::TravelTimeClient;
use crate::rest::batch::{BatchResponse, execute_batch};
use crate::rest::endpoints::isochrones;
use crate::rest::simple::{DistanceMapSimple, TimeMapFastSimple, TimeMapSimple};

impl TravelTimeClient {
    /// Get isochrones (areas reachable within a travel time).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use time::macros::datetime;
    /// use traveltime_api_client::rest::TravelTimeClient;
    /// use traveltime_api_client::rest::isochrones::{TimeMapDepartureSearch, TimeMapRequest};
    /// use traveltime_api_client::types::{Coords, Transportation, TransportationType};
    ///
    /// # use traveltime_api_client::TravelTimeError;
    /// # async fn run(client: TravelTimeClient) -> Result<(), TravelTimeError> {
    /// let request = TimeMapRequest {
    ///     departure_searches: vec![TimeMapDepartureSearch {
    ///         id: "london".into(),
    ///         coords: Coords::new(51.507609, -0.128315),
    ///         departure_time: datetime!(2024-06-03 08:00 UTC),
    ///         transportation: Transportation::new(TransportationType::PublicTransport),
    ///         travel_time: 900,
    ///         properties: None,
    ///         range: None,
    ///         level_of_detail: None,
    ///         single_shape: None,
    ///         polygons_filter: None,
    ///         no_holes: None,
    ///         render_mode: None,
    ///         remove_water_bodies: None,
    ///         snapping: None,
    ///     }],
    ///     ..Default::default()
    /// };
    /// let response = client.time_map(&request).await?;
    /// println!("{} shapes", response.results[0].shapes.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn time_map(
        &self,
        request: &TimeMapRequest,
    ) -> Result<TimeMapResponse, TravelTimeError> {
        self.time_map_with_format::<Json>(request).await
    }

    /// Get isochrones in a specific response format.
    pub async fn time_map_with_format<F: IsochroneFormat>(
        &self,
        request: &TimeMapRequest,
    ) -> Result<F::Response, TravelTimeError> {
        let body = self
            .post_raw(isochrones::TIME_MAP, request, Some(F::ACCEPT))
            .await?;
        F::parse(&body)
    }

    /// Send several time-map requests; failures are reported per item.
    pub async fn time_map_batch(
        &self,
        requests: &[TimeMapRequest],
    ) -> Vec<BatchResponse<TimeMapResponse>> {
        self.time_map_batch_with_format::<Json>(requests).await
    }

    /// Batch variant of [`Self::time_map_with_format`].
    pub async fn time_map_batch_with_format<F: IsochroneFormat>(
        &self,
        requests: &[TimeMapRequest],
    ) -> Vec<BatchResponse<F::Response>> {
        execute_batch(
            requests,
            |request| self.time_map_with_format::<F>(request),
            self.batch_chunk_size(),
        )
        .await
    }

    /// Isochrones for several coordinates sharing the same parameters.
    pub async fn time_map_simple(
        &self,
        request: &TimeMapSimple,
    ) -> Result<TimeMapResponse, TravelTimeError> {
        self.time_map(&request.to_request()).await
    }

    /// [`Self::time_map_simple`] in a specific response format.
    pub async fn time_map_simple_with_format<F: IsochroneFormat>(
        &self,
        request: &TimeMapSimple,
    ) -> Result<F::Response, TravelTimeError> {
        self.time_map_with_format::<F>(&request.to_request()).await
    }

    /// Get fast isochrones (weekday morning only, fewer parameters).
    pub async fn time_map_fast(
        &self,
        request: &TimeMapFastRequest,
    ) -> Result<TimeMapResponse, TravelTimeError> {
        self.time_map_fast_with_format::<Json>(request).await
    }

    /// Get fast isochrones in a specific response format.
    pub async fn time_map_fast_with_format<F: FastIsochroneFormat>(
        &self,
        request: &TimeMapFastRequest,
    ) -> Result<F::Response, TravelTimeError> {
        let body = self
            .post_raw(isochrones::TIME_MAP_FAST, request, Some(F::ACCEPT))
            .await?;
        F::parse(&body)
    }

    /// Send several fast time-map requests; failures are reported per item.
    pub async fn time_map_fast_batch(
        &self,
        requests: &[TimeMapFastRequest],
    ) -> Vec<BatchResponse<TimeMapResponse>> {
        self.time_map_fast_batch_with_format::<Json>(requests).await
    }

    /// Batch variant of [`Self::time_map_fast_with_format`].
    pub async fn time_map_fast_batch_with_format<F: FastIsochroneFormat>(
        &self,
        requests: &[TimeMapFastRequest],
    ) -> Vec<BatchResponse<F::Response>> {
        execute_batch(
            requests,
            |request| self.time_map_fast_with_format::<F>(request),
            self.batch_chunk_size(),
        )
        .await
    }

    /// Fast isochrones for several coordinates sharing the same parameters.
    pub async fn time_map_fast_simple(
        &self,
        request: &TimeMapFastSimple,
    ) -> Result<TimeMapResponse, TravelTimeError> {
        self.time_map_fast(&request.to_request()).await
    }

    /// [`Self::time_map_fast_simple`] in a specific response format.
    pub async fn time_map_fast_simple_with_format<F: FastIsochroneFormat>(
        &self,
        request: &TimeMapFastSimple,
    ) -> Result<F::Response, TravelTimeError> {
        self.time_map_fast_with_format::<F>(&request.to_request()).await
    }

    /// Get distance isochrones (areas reachable within a distance).
    pub async fn distance_map(
        &self,
        request: &DistanceMapRequest,
    ) -> Result<DistanceMapResponse, TravelTimeError> {
        self.distance_map_with_format::<Json>(request).await
    }

    /// Get distance isochrones in a specific response format.
    pub async fn distance_map_with_format<F: IsochroneFormat>(
        &self,
        request: &DistanceMapRequest,
    ) -> Result<F::Response, TravelTimeError> {
        let body = self
            .post_raw(isochrones::DISTANCE_MAP, request, Some(F::ACCEPT))
            .await?;
        F::parse(&body)
    }

    /// Send several distance-map requests; failures are reported per item.
    pub async fn distance_map_batch(
        &self,
        requests: &[DistanceMapRequest],
    ) -> Vec<BatchResponse<DistanceMapResponse>> {
        self.distance_map_batch_with_format::<Json>(requests).await
    }

    /// Batch variant of [`Self::distance_map_with_format`].
    pub async fn distance_map_batch_with_format<F: IsochroneFormat>(
        &self,
        requests: &[DistanceMapRequest],
    ) -> Vec<BatchResponse<F::Response>> {
        execute_batch(
            requests,
            |request| self.distance_map_with_format::<F>(request),
            self.batch_chunk_size(),
        )
        .await
    }

    /// Distance isochrones for several coordinates sharing the same parameters.
    pub async fn distance_map_simple(
        &self,
        request: &DistanceMapSimple,
    ) -> Result<DistanceMapResponse, TravelTimeError> {
        self.distance_map(&request.to_request()).await
    }

    /// [`Self::distance_map_simple`] in a specific response format.
    pub async fn distance_map_simple_with_format<F: IsochroneFormat>(
        &self,
        request: &DistanceMapSimple,
    ) -> Result<F::Response, TravelTimeError> {
        self.distance_map_with_format::<F>(&request.to_request()).await
    }
}
