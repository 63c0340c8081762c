//! Types for the isochrone endpoints (`/time-map`, `/time-map/fast`, `/distance-map`).

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;

use crate::error::TravelTimeError;
use crate::rest::client::parse_json;
use crate::rest::gateway::HitCost;
use crate::types::{
    ArrivalTimePeriod, BoundingBox, Coords, LevelOfDetail, PolygonsFilter, RangeNoMaxResults,
    Snapping, Transportation, TransportationFast, UnionOrIntersection,
};

/// Extra properties for time-map results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMapProperty {
    IsOnlyWalking,
}

/// How isochrone shapes are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    ApproximateTimeFilter,
    RoadBuffering,
}

// ========== Time Map ==========

/// Isochrone search starting at `departure_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeMapDepartureSearch {
    pub id: String,
    pub coords: Coords,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_time: OffsetDateTime,
    pub transportation: Transportation,
    /// Maximum journey time in seconds.
    pub travel_time: u32,
    pub properties: Option<Vec<TimeMapProperty>>,
    pub range: Option<RangeNoMaxResults>,
    pub level_of_detail: Option<LevelOfDetail>,
    pub single_shape: Option<bool>,
    pub polygons_filter: Option<PolygonsFilter>,
    pub no_holes: Option<bool>,
    pub render_mode: Option<RenderMode>,
    pub remove_water_bodies: Option<bool>,
    pub snapping: Option<Snapping>,
}

/// Isochrone search arriving by `arrival_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeMapArrivalSearch {
    pub id: String,
    pub coords: Coords,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_time: OffsetDateTime,
    pub transportation: Transportation,
    pub travel_time: u32,
    pub properties: Option<Vec<TimeMapProperty>>,
    pub range: Option<RangeNoMaxResults>,
    pub level_of_detail: Option<LevelOfDetail>,
    pub single_shape: Option<bool>,
    pub polygons_filter: Option<PolygonsFilter>,
    pub no_holes: Option<bool>,
    pub render_mode: Option<RenderMode>,
    pub remove_water_bodies: Option<bool>,
    pub snapping: Option<Snapping>,
}

/// Request body for `/time-map`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeMapRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub departure_searches: Vec<TimeMapDepartureSearch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arrival_searches: Vec<TimeMapArrivalSearch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unions: Vec<UnionOrIntersection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub intersections: Vec<UnionOrIntersection>,
}

impl HitCost for TimeMapRequest {
    fn hits(&self) -> u32 {
        (self.departure_searches.len()
            + self.arrival_searches.len()
            + self.unions.len()
            + self.intersections.len()) as u32
    }
}

// ========== Time Map Fast ==========

/// Fast isochrone search.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeMapFastSearch {
    pub id: String,
    pub coords: Coords,
    pub transportation: TransportationFast,
    pub travel_time: u32,
    pub arrival_time_period: ArrivalTimePeriod,
    pub level_of_detail: Option<LevelOfDetail>,
    pub polygons_filter: Option<PolygonsFilter>,
    pub no_holes: Option<bool>,
    pub render_mode: Option<RenderMode>,
    pub snapping: Option<Snapping>,
}

/// Fast isochrone searches grouped by shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeMapFastArrivalSearches {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_to_many: Vec<TimeMapFastSearch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub many_to_one: Vec<TimeMapFastSearch>,
}

/// Request body for `/time-map/fast`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeMapFastRequest {
    pub arrival_searches: TimeMapFastArrivalSearches,
}

impl HitCost for TimeMapFastRequest {
    fn hits(&self) -> u32 {
        (self.arrival_searches.one_to_many.len() + self.arrival_searches.many_to_one.len()) as u32
    }
}

// ========== Distance Map ==========

/// Distance isochrone search starting at `departure_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMapDepartureSearch {
    pub id: String,
    pub coords: Coords,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_time: OffsetDateTime,
    pub transportation: Transportation,
    /// Maximum distance in meters.
    pub travel_distance: u32,
    pub level_of_detail: Option<LevelOfDetail>,
    pub single_shape: Option<bool>,
    pub polygons_filter: Option<PolygonsFilter>,
    pub no_holes: Option<bool>,
    pub snapping: Option<Snapping>,
}

/// Distance isochrone search arriving by `arrival_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMapArrivalSearch {
    pub id: String,
    pub coords: Coords,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_time: OffsetDateTime,
    pub transportation: Transportation,
    pub travel_distance: u32,
    pub level_of_detail: Option<LevelOfDetail>,
    pub single_shape: Option<bool>,
    pub polygons_filter: Option<PolygonsFilter>,
    pub no_holes: Option<bool>,
    pub snapping: Option<Snapping>,
}

/// Request body for `/distance-map`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistanceMapRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub departure_searches: Vec<DistanceMapDepartureSearch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arrival_searches: Vec<DistanceMapArrivalSearch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unions: Vec<UnionOrIntersection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub intersections: Vec<UnionOrIntersection>,
}

impl HitCost for DistanceMapRequest {
    fn hits(&self) -> u32 {
        (self.departure_searches.len()
            + self.arrival_searches.len()
            + self.unions.len()
            + self.intersections.len()) as u32
    }
}

// ========== Responses ==========

/// A polygon with optional holes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Shape {
    pub shell: Vec<Coords>,
    #[serde(default)]
    pub holes: Vec<Vec<Coords>>,
}

/// Properties of an isochrone result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IsochroneProperties {
    #[serde(default)]
    pub is_only_walking: Option<bool>,
}

/// One isochrone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IsochroneResult {
    pub search_id: String,
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub properties: IsochroneProperties,
}

/// Default (`application/json`) isochrone response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IsochroneResponse {
    pub results: Vec<IsochroneResult>,
}

pub type TimeMapResponse = IsochroneResponse;
pub type DistanceMapResponse = IsochroneResponse;

/// One isochrone as WKT.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WktResult {
    pub search_id: String,
    pub shape: String,
    #[serde(default)]
    pub properties: IsochroneProperties,
}

/// `application/vnd.wkt+json` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WktResponse {
    pub results: Vec<WktResult>,
}

/// GeoJSON multipolygon. Positions are `[lng, lat]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoJsonMultiPolygon {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<Vec<Vec<f64>>>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoJsonProperties {
    pub search_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: GeoJsonMultiPolygon,
    pub properties: GeoJsonProperties,
}

/// `application/geo+json` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoJsonResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<GeoJsonFeature>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoundingBoxGroup {
    pub envelope: BoundingBox,
    pub boxes: Vec<BoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoundingBoxesResult {
    pub search_id: String,
    pub bounding_boxes: Vec<BoundingBoxGroup>,
    #[serde(default)]
    pub properties: IsochroneProperties,
}

/// `application/vnd.bounding-boxes+json` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoundingBoxesResponse {
    pub results: Vec<BoundingBoxesResult>,
}

// ========== Response formats ==========

/// A response format selected through the `Accept` header.
pub trait IsochroneFormat {
    /// Media type sent in `Accept`.
    const ACCEPT: &'static str;
    /// Parsed response.
    type Response;

    /// Parse a response body.
    fn parse(body: &[u8]) -> Result<Self::Response, TravelTimeError>;
}

/// Formats supported by `/time-map/fast` (all but KML).
pub trait FastIsochroneFormat: IsochroneFormat {}

/// `application/json`
#[derive(Debug, Clone, Copy)]
pub struct Json;
/// `application/vnd.wkt+json`
#[derive(Debug, Clone, Copy)]
pub struct Wkt;
/// `application/vnd.wkt-no-holes+json`
#[derive(Debug, Clone, Copy)]
pub struct WktNoHoles;
/// `application/geo+json`
#[derive(Debug, Clone, Copy)]
pub struct GeoJson;
/// `application/vnd.bounding-boxes+json`
#[derive(Debug, Clone, Copy)]
pub struct BoundingBoxes;
/// `application/kml+xml`, returned as text
#[derive(Debug, Clone, Copy)]
pub struct Kml;

impl IsochroneFormat for Json {
    const ACCEPT: &'static str = "application/json";
    type Response = IsochroneResponse;

    fn parse(body: &[u8]) -> Result<Self::Response, TravelTimeError> {
        parse_json(body)
    }
}

impl IsochroneFormat for Wkt {
    const ACCEPT: &'static str = "application/vnd.wkt+json";
    type Response = WktResponse;

    fn parse(body: &[u8]) -> Result<Self::Response, TravelTimeError> {
        parse_json(body)
    }
}

impl IsochroneFormat for WktNoHoles {
    const ACCEPT: &'static str = "application/vnd.wkt-no-holes+json";
    type Response = WktResponse;

    fn parse(body: &[u8]) -> Result<Self::Response, TravelTimeError> {
        parse_json(body)
    }
}

impl IsochroneFormat for GeoJson {
    const ACCEPT: &'static str = "application/geo+json";
    type Response = GeoJsonResponse;

    fn parse(body: &[u8]) -> Result<Self::Response, TravelTimeError> {
        parse_json(body)
    }
}

impl IsochroneFormat for BoundingBoxes {
    const ACCEPT: &'static str = "application/vnd.bounding-boxes+json";
    type Response = BoundingBoxesResponse;

    fn parse(body: &[u8]) -> Result<Self::Response, TravelTimeError> {
        parse_json(body)
    }
}

impl IsochroneFormat for Kml {
    const ACCEPT: &'static str = "application/kml+xml";
    type Response = String;

    fn parse(body: &[u8]) -> Result<Self::Response, TravelTimeError> {
        String::from_utf8(body.to_vec())
            .map_err(|e| TravelTimeError::InvalidResponse(format!("KML body is not UTF-8: {e}")))
    }
}

impl FastIsochroneFormat for Json {}
impl FastIsochroneFormat for Wkt {}
impl FastIsochroneFormat for WktNoHoles {}
impl FastIsochroneFormat for GeoJson {}
impl FastIsochroneFormat for BoundingBoxes {}
