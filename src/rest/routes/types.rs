//! Types for the `/routes` endpoint.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;

use crate::rest::gateway::HitCost;
use crate::types::{Fares, Location, RangeFull, Route, Transportation};

/// Properties returned per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteProperty {
    TravelTime,
    Distance,
    Fares,
    Route,
}

/// Routes from one origin, starting at `departure_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutesDepartureSearch {
    pub id: String,
    pub departure_location_id: String,
    pub arrival_location_ids: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_time: OffsetDateTime,
    pub transportation: Transportation,
    pub properties: Vec<RouteProperty>,
    pub range: Option<RangeFull>,
}

/// Routes to one destination, arriving by `arrival_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutesArrivalSearch {
    pub id: String,
    pub arrival_location_id: String,
    pub departure_location_ids: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_time: OffsetDateTime,
    pub transportation: Transportation,
    pub properties: Vec<RouteProperty>,
    pub range: Option<RangeFull>,
}

/// Request body for `/routes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoutesRequest {
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub departure_searches: Vec<RoutesDepartureSearch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arrival_searches: Vec<RoutesArrivalSearch>,
}

impl HitCost for RoutesRequest {
    fn hits(&self) -> u32 {
        (self.departure_searches.len() + self.arrival_searches.len()) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoutesProperties {
    #[serde(default)]
    pub travel_time: Option<i64>,
    #[serde(default)]
    pub distance: Option<i64>,
    #[serde(default)]
    pub fares: Option<Fares>,
    #[serde(default)]
    pub route: Option<Route>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoutesLocation {
    pub id: String,
    pub properties: Vec<RoutesProperties>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoutesResult {
    pub search_id: String,
    pub locations: Vec<RoutesLocation>,
    pub unreachable: Vec<String>,
}

/// Response of `/routes`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoutesResponse {
    pub results: Vec<RoutesResult>,
}
