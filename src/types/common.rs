//! Common wire types shared by TravelTime endpoints.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coords {
    /// Create a new coordinate.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A named location referenced by id from searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Location id, unique within a request.
    pub id: String,
    /// Location coordinates.
    pub coords: Coords,
}

impl Location {
    /// Create a new location.
    pub fn new(id: impl Into<String>, coords: Coords) -> Self {
        Self {
            id: id.into(),
            coords,
        }
    }
}

/// Transportation modes supported by the standard endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportationType {
    #[serde(rename = "cycling")]
    Cycling,
    #[serde(rename = "driving")]
    Driving,
    #[serde(rename = "driving+train")]
    DrivingTrain,
    #[serde(rename = "public_transport")]
    PublicTransport,
    #[serde(rename = "walking")]
    Walking,
    #[serde(rename = "coach")]
    Coach,
    #[serde(rename = "bus")]
    Bus,
    #[serde(rename = "train")]
    Train,
    #[serde(rename = "ferry")]
    Ferry,
    #[serde(rename = "driving+ferry")]
    DrivingFerry,
    #[serde(rename = "cycling+ferry")]
    CyclingFerry,
    #[serde(rename = "cycling+public_transport")]
    CyclingPublicTransport,
    #[serde(rename = "driving+public_transport")]
    DrivingPublicTransport,
}

/// Transportation modes supported by the fast endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportationFastType {
    #[serde(rename = "public_transport")]
    PublicTransport,
    #[serde(rename = "driving")]
    Driving,
    #[serde(rename = "driving+public_transport")]
    DrivingPublicTransport,
    #[serde(rename = "driving+ferry")]
    DrivingFerry,
    #[serde(rename = "cycling")]
    Cycling,
    #[serde(rename = "cycling+ferry")]
    CyclingFerry,
    #[serde(rename = "walking")]
    Walking,
    #[serde(rename = "walking+ferry")]
    WalkingFerry,
}

/// Traffic model for driving modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficModel {
    /// Typical traffic for the chosen time of day
    #[default]
    Balanced,
    /// Lighter traffic
    Optimistic,
    /// Heavier traffic
    Pessimistic,
}

/// Traffic model for the fast endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficModelFast {
    /// Midweek morning traffic
    #[default]
    Peak,
    /// Night time traffic
    OffPeak,
}

/// Additional road types for driving searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeRoad {
    /// Unpaved roads
    Track,
    /// Roads that are not publicly accessible
    Restricted,
}

/// Limit on public transport changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxChanges {
    pub enabled: bool,
    pub limit: u32,
}

/// Transportation parameters for the standard endpoints.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transportation {
    /// Transportation mode.
    #[serde(rename = "type")]
    pub kind: TransportationType,
    pub include_roads: Option<Vec<IncludeRoad>>,
    pub disable_border_crossing: Option<bool>,
    pub pt_change_delay: Option<u32>,
    pub walking_time: Option<u32>,
    pub driving_time_to_station: Option<u32>,
    pub cycling_time_to_station: Option<u32>,
    pub parking_time: Option<u32>,
    pub boarding_time: Option<u32>,
    pub max_changes: Option<MaxChanges>,
    pub traffic_model: Option<TrafficModel>,
}

impl Transportation {
    /// Transportation with only the mode set.
    pub fn new(kind: TransportationType) -> Self {
        Self {
            kind,
            include_roads: None,
            disable_border_crossing: None,
            pt_change_delay: None,
            walking_time: None,
            driving_time_to_station: None,
            cycling_time_to_station: None,
            parking_time: None,
            boarding_time: None,
            max_changes: None,
            traffic_model: None,
        }
    }

    /// Set the traffic model.
    pub fn traffic_model(mut self, model: TrafficModel) -> Self {
        self.traffic_model = Some(model);
        self
    }
}

impl From<TransportationType> for Transportation {
    fn from(kind: TransportationType) -> Self {
        Self::new(kind)
    }
}

/// Transportation parameters for the fast endpoints.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportationFast {
    /// Transportation mode.
    #[serde(rename = "type")]
    pub kind: TransportationFastType,
    pub traffic_model: Option<TrafficModelFast>,
}

impl TransportationFast {
    /// Transportation with only the mode set.
    pub fn new(kind: TransportationFastType) -> Self {
        Self {
            kind,
            traffic_model: None,
        }
    }
}

impl From<TransportationFastType> for TransportationFast {
    fn from(kind: TransportationFastType) -> Self {
        Self::new(kind)
    }
}

/// Fast endpoints only support the weekday morning time period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalTimePeriod {
    #[default]
    WeekdayMorning,
}

/// Departure/arrival range for searches returning multiple results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFull {
    pub enabled: bool,
    pub width: u32,
    pub max_results: u32,
}

/// Departure/arrival range without a result limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeNoMaxResults {
    pub enabled: bool,
    pub width: u32,
}

/// Named detail levels for isochrone shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Lowest,
    Low,
    Medium,
    High,
    Highest,
}

/// Level of detail of isochrone shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scale_type", rename_all = "snake_case")]
pub enum LevelOfDetail {
    CoarseGrid { square_size: u32 },
    Simple { level: DetailLevel },
    SimpleNumeric { level: i32 },
}

/// Limits the number of polygons returned per shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonsFilter {
    pub limit: u32,
}

/// Snapping penalty switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapPenalty {
    Enabled,
    Disabled,
}

/// Which roads a location may be snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptRoads {
    BothDrivableAndWalkable,
    AnyDrivable,
}

/// Snapping of search coordinates to the road network.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapping {
    pub penalty: Option<SnapPenalty>,
    pub accept_roads: Option<AcceptRoads>,
    /// Maximum snapping distance in meters (default 1000).
    pub threshold: Option<u32>,
}

/// A union or intersection of previously defined searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionOrIntersection {
    pub id: String,
    pub search_ids: Vec<String>,
}

/// Bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// Transport mode of a route part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    Car,
    Parking,
    Boarding,
    Walk,
    Bike,
    BikeParking,
    Train,
    RailNational,
    RailOverground,
    RailUnderground,
    RailDlr,
    Bus,
    CableCar,
    Plane,
    Ferry,
    Coach,
}

/// Kind of a route part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutePartType {
    Basic,
    StartEnd,
    Road,
    PublicTransport,
}

/// One leg of a route.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoutePart {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: RoutePartType,
    pub mode: RouteMode,
    pub directions: String,
    pub distance: i64,
    pub travel_time: i64,
    pub coords: Vec<Coords>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub turn: Option<String>,
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub departure_station: Option<String>,
    #[serde(default)]
    pub arrival_station: Option<String>,
    #[serde(default)]
    pub departs_at: Option<String>,
    #[serde(default)]
    pub arrives_at: Option<String>,
    #[serde(default)]
    pub num_stops: Option<u32>,
}

/// A full route.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Route {
    pub departure_time: String,
    pub arrival_time: String,
    pub parts: Vec<RoutePart>,
}

/// Fare ticket validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FareTicketType {
    Single,
    Week,
    Month,
    Year,
}

/// A fare ticket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FareTicket {
    #[serde(rename = "type")]
    pub kind: FareTicketType,
    pub price: f64,
    pub currency: String,
}

/// Fares for a group of route parts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FaresBreakdownItem {
    pub modes: Vec<RouteMode>,
    pub route_part_ids: Vec<i64>,
    pub tickets: Vec<FareTicket>,
}

/// Fares of a journey.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Fares {
    #[serde(default)]
    pub breakdown: Vec<FaresBreakdownItem>,
    pub tickets_total: Vec<FareTicket>,
}

/// Distance travelled with one mode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DistanceBreakdownItem {
    pub mode: RouteMode,
    pub distance: i64,
}

/// Public transport data availability.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublicTransportFeature {
    pub date_start: String,
    pub date_end: String,
}

/// A mode supported by a fast time period.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupportedFastMode {
    /// `arrival.one_to_many` or `arrival.many_to_one`.
    pub search_type: String,
    pub transportation_mode: String,
}

/// A time period supported by the fast endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FastPeriod {
    pub time_period: String,
    pub supported: Vec<SupportedFastMode>,
}

/// Fast endpoint availability.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterFastFeature {
    pub periods: Vec<FastPeriod>,
}

/// Features available in a map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapFeatures {
    #[serde(default)]
    pub public_transport: Option<PublicTransportFeature>,
    #[serde(default)]
    pub time_filter_fast: Option<TimeFilterFastFeature>,
    #[serde(default)]
    pub cross_country_modes: Option<Vec<TransportationType>>,
    #[serde(default)]
    pub fares: bool,
    #[serde(default)]
    pub postcodes: bool,
}

/// Travel time statistics of a postcode area.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TravelTimeStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

/// Search direction for requests that support both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchType {
    /// Searches start at the given time (default)
    #[default]
    Depart,
    /// Searches end at the given time
    Arrive,
}

/// Search shape for the fast endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FastSearchType {
    /// One origin, many destinations (default)
    #[default]
    OneToMany,
    /// Many origins, one destination
    ManyToOne,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transportation_serializes_without_unset_fields() {
        let transportation = Transportation::new(TransportationType::DrivingFerry)
            .traffic_model(TrafficModel::Optimistic);
        let json = serde_json::to_value(&transportation).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "driving+ferry", "traffic_model": "optimistic"})
        );
    }

    #[test]
    fn test_level_of_detail_is_tagged() {
        let lod = LevelOfDetail::Simple {
            level: DetailLevel::Lowest,
        };
        assert_eq!(
            serde_json::to_value(lod).unwrap(),
            serde_json::json!({"scale_type": "simple", "level": "lowest"})
        );
        let grid: LevelOfDetail =
            serde_json::from_str(r#"{"scale_type":"coarse_grid","square_size":600}"#).unwrap();
        assert_eq!(grid, LevelOfDetail::CoarseGrid { square_size: 600 });
    }

    #[test]
    fn test_fast_transportation_names() {
        let json = serde_json::to_string(&TransportationFast::new(
            TransportationFastType::WalkingFerry,
        ))
        .unwrap();
        assert_eq!(json, r#"{"type":"walking+ferry"}"#);
    }
}
