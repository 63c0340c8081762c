//! Map coverage endpoints.

mod types;

pub use types::*;

use crate::error::TravelTimeError;
use crate::rest::TravelTimeClient;
use crate::rest::endpoints::{MAP_INFO, SUPPORTED_LOCATIONS};

impl TravelTimeClient {
    /// List the maps available to this account and their features.
    pub async fn map_info(&self) -> Result<MapInfoResponse, TravelTimeError> {
        self.get::<(), _>(MAP_INFO, None, None).await
    }

    /// Find which map each location belongs to.
    pub async fn supported_locations(
        &self,
        request: &SupportedLocationsRequest,
    ) -> Result<SupportedLocationsResponse, TravelTimeError> {
        self.post(SUPPORTED_LOCATIONS, request).await
    }
}
