//! Routing endpoint.

mod types;

pub use types::*;

use crate::error::TravelTimeError;
use crate::rest::TravelTimeClient;
use crate::rest::batch::{BatchResponse, execute_batch};
use crate::rest::endpoints::ROUTES;
use crate::rest::simple::RoutesSimple;

impl TravelTimeClient {
    /// Get routes between locations.
    pub async fn routes(&self, request: &RoutesRequest) -> Result<RoutesResponse, TravelTimeError> {
        self.post(ROUTES, request).await
    }

    /// Send several route requests; failures are reported per item.
    pub async fn routes_batch(
        &self,
        requests: &[RoutesRequest],
    ) -> Vec<BatchResponse<RoutesResponse>> {
        execute_batch(requests, |request| self.routes(request), self.batch_chunk_size()).await
    }

    /// Routes with searches described as origin id to destination ids.
    pub async fn routes_simple(
        &self,
        request: &RoutesSimple,
    ) -> Result<RoutesResponse, TravelTimeError> {
        self.routes(&request.to_request()).await
    }
}
