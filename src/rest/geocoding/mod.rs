//! Geocoding endpoints.

mod types;

pub use types::*;

use serde::Serialize;

use crate::error::TravelTimeError;
use crate::rest::TravelTimeClient;
use crate::rest::batch::{BatchResponse, execute_batch};
use crate::rest::endpoints::geocoding;
use crate::types::Coords;

#[derive(Serialize)]
struct ReverseQuery {
    lat: f64,
    lng: f64,
}

impl TravelTimeClient {
    /// Find locations matching a free-text query.
    pub async fn geocoding(
        &self,
        query: &str,
        options: &GeocodingOptions,
    ) -> Result<GeocodingResponse, TravelTimeError> {
        let params = SearchQuery::new(query, options);
        self.get(
            geocoding::SEARCH,
            Some(&params),
            options.accept_language.as_deref(),
        )
        .await
    }

    /// Geocode several queries with the same options; failures are reported per item.
    pub async fn geocoding_batch<S: AsRef<str>>(
        &self,
        queries: &[S],
        options: &GeocodingOptions,
    ) -> Vec<BatchResponse<GeocodingResponse>> {
        execute_batch(
            queries,
            |query| self.geocoding(query.as_ref(), options),
            self.batch_chunk_size(),
        )
        .await
    }

    /// Find the address at a coordinate.
    pub async fn geocoding_reverse(
        &self,
        coords: Coords,
        accept_language: Option<&str>,
    ) -> Result<GeocodingResponse, TravelTimeError> {
        let params = ReverseQuery {
            lat: coords.lat,
            lng: coords.lng,
        };
        self.get(geocoding::REVERSE, Some(&params), accept_language)
            .await
    }

    /// Reverse geocode several coordinates; failures are reported per item.
    pub async fn geocoding_reverse_batch(
        &self,
        coords: &[Coords],
        accept_language: Option<&str>,
    ) -> Vec<BatchResponse<GeocodingResponse>> {
        execute_batch(
            coords,
            |coords| self.geocoding_reverse(*coords, accept_language),
            self.batch_chunk_size(),
        )
        .await
    }
}
