//! Types for the time-filter family of endpoints.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;

use crate::rest::gateway::HitCost;
use crate::types::{
    ArrivalTimePeriod, Coords, DistanceBreakdownItem, FareTicket, Fares, Location, RangeFull,
    Route, Snapping, Transportation, TransportationFast, TravelTimeStatistics,
};

// ========== Time Filter ==========

/// Properties returned per location by `/time-filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilterProperty {
    TravelTime,
    Distance,
    DistanceBreakdown,
    Fares,
    Route,
}

/// One origin, many destinations, starting at `departure_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeFilterDepartureSearch {
    pub id: String,
    pub departure_location_id: String,
    pub arrival_location_ids: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_time: OffsetDateTime,
    pub transportation: Transportation,
    /// Maximum journey time in seconds.
    pub travel_time: u32,
    pub properties: Vec<TimeFilterProperty>,
    pub range: Option<RangeFull>,
    pub snapping: Option<Snapping>,
}

/// Many origins, one destination, arriving by `arrival_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeFilterArrivalSearch {
    pub id: String,
    pub arrival_location_id: String,
    pub departure_location_ids: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_time: OffsetDateTime,
    pub transportation: Transportation,
    /// Maximum journey time in seconds.
    pub travel_time: u32,
    pub properties: Vec<TimeFilterProperty>,
    pub range: Option<RangeFull>,
    pub snapping: Option<Snapping>,
}

/// Request body for `/time-filter`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeFilterRequest {
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub departure_searches: Vec<TimeFilterDepartureSearch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arrival_searches: Vec<TimeFilterArrivalSearch>,
}

impl HitCost for TimeFilterRequest {
    fn hits(&self) -> u32 {
        (self.departure_searches.len() + self.arrival_searches.len()) as u32
    }
}

/// Properties of one reachable location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterProperties {
    #[serde(default)]
    pub travel_time: Option<i64>,
    #[serde(default)]
    pub distance: Option<i64>,
    #[serde(default)]
    pub distance_breakdown: Option<Vec<DistanceBreakdownItem>>,
    #[serde(default)]
    pub fares: Option<Fares>,
    #[serde(default)]
    pub route: Option<Route>,
}

/// A reachable location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterLocation {
    pub id: String,
    /// One entry per journey; more than one only when a range is requested.
    pub properties: Vec<TimeFilterProperties>,
}

/// Result of one search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterResult {
    pub search_id: String,
    pub locations: Vec<TimeFilterLocation>,
    pub unreachable: Vec<String>,
}

/// Response of `/time-filter`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterResponse {
    pub results: Vec<TimeFilterResult>,
}

// ========== Time Filter Fast ==========

/// Properties returned per location by `/time-filter/fast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilterFastProperty {
    TravelTime,
    Fares,
    Distance,
}

/// Fast search from one origin to many destinations.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeFilterFastOneToManySearch {
    pub id: String,
    pub departure_location_id: String,
    pub arrival_location_ids: Vec<String>,
    pub transportation: TransportationFast,
    pub travel_time: u32,
    pub arrival_time_period: ArrivalTimePeriod,
    pub properties: Vec<TimeFilterFastProperty>,
    pub snapping: Option<Snapping>,
}

/// Fast search from many origins to one destination.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeFilterFastManyToOneSearch {
    pub id: String,
    pub arrival_location_id: String,
    pub departure_location_ids: Vec<String>,
    pub transportation: TransportationFast,
    pub travel_time: u32,
    pub arrival_time_period: ArrivalTimePeriod,
    pub properties: Vec<TimeFilterFastProperty>,
    pub snapping: Option<Snapping>,
}

/// Fast searches grouped by shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeFilterFastArrivalSearches {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_to_many: Vec<TimeFilterFastOneToManySearch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub many_to_one: Vec<TimeFilterFastManyToOneSearch>,
}

/// Request body for `/time-filter/fast`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeFilterFastRequest {
    pub locations: Vec<Location>,
    pub arrival_searches: TimeFilterFastArrivalSearches,
}

impl HitCost for TimeFilterFastRequest {
    fn hits(&self) -> u32 {
        (self.arrival_searches.one_to_many.len() + self.arrival_searches.many_to_one.len()) as u32
    }
}

/// Fares returned by the fast endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterFastFares {
    pub tickets_total: Vec<FareTicket>,
}

/// Properties of one reachable location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterFastProperties {
    #[serde(default)]
    pub travel_time: Option<i64>,
    #[serde(default)]
    pub distance: Option<i64>,
    #[serde(default)]
    pub fares: Option<TimeFilterFastFares>,
}

/// A reachable location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterFastLocation {
    pub id: String,
    pub properties: TimeFilterFastProperties,
}

/// Result of one fast search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterFastResult {
    pub search_id: String,
    pub locations: Vec<TimeFilterFastLocation>,
    pub unreachable: Vec<String>,
}

/// Response of `/time-filter/fast`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterFastResponse {
    pub results: Vec<TimeFilterFastResult>,
}

// ========== Postcodes ==========

/// Properties returned per postcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostcodeProperty {
    TravelTime,
    Distance,
}

/// Postcode search starting at `departure_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostcodesDepartureSearch {
    pub id: String,
    pub coords: Coords,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_time: OffsetDateTime,
    pub transportation: Transportation,
    pub travel_time: u32,
    pub properties: Vec<PostcodeProperty>,
    pub range: Option<RangeFull>,
}

/// Postcode search arriving by `arrival_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostcodesArrivalSearch {
    pub id: String,
    pub coords: Coords,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_time: OffsetDateTime,
    pub transportation: Transportation,
    pub travel_time: u32,
    pub properties: Vec<PostcodeProperty>,
    pub range: Option<RangeFull>,
}

/// Request body for `/time-filter/postcodes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeFilterPostcodesRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub departure_searches: Vec<PostcodesDepartureSearch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arrival_searches: Vec<PostcodesArrivalSearch>,
}

impl HitCost for TimeFilterPostcodesRequest {
    fn hits(&self) -> u32 {
        (self.departure_searches.len() + self.arrival_searches.len()) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostcodeProperties {
    #[serde(default)]
    pub travel_time: Option<i64>,
    #[serde(default)]
    pub distance: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Postcode {
    pub code: String,
    pub properties: Vec<PostcodeProperties>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostcodesResult {
    pub search_id: String,
    pub postcodes: Vec<Postcode>,
}

/// Response of `/time-filter/postcodes`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterPostcodesResponse {
    pub results: Vec<PostcodesResult>,
}

// ========== Postcode districts and sectors ==========

/// Properties returned per postcode district or sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostcodeAreaProperty {
    TravelTimeReachable,
    TravelTimeAll,
    Coverage,
}

/// District or sector search starting at `departure_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostcodeAreaDepartureSearch {
    pub id: String,
    pub coords: Coords,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_time: OffsetDateTime,
    pub transportation: Transportation,
    pub travel_time: u32,
    /// Share of postcodes that must be reachable for the area to be returned.
    pub reachable_postcodes_threshold: f64,
    pub properties: Vec<PostcodeAreaProperty>,
    pub range: Option<RangeFull>,
}

/// District or sector search arriving by `arrival_time`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostcodeAreaArrivalSearch {
    pub id: String,
    pub coords: Coords,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_time: OffsetDateTime,
    pub transportation: Transportation,
    pub travel_time: u32,
    pub reachable_postcodes_threshold: f64,
    pub properties: Vec<PostcodeAreaProperty>,
    pub range: Option<RangeFull>,
}

/// Request body for `/time-filter/postcode-districts` and `/time-filter/postcode-sectors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeFilterPostcodeAreasRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub departure_searches: Vec<PostcodeAreaDepartureSearch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arrival_searches: Vec<PostcodeAreaArrivalSearch>,
}

impl HitCost for TimeFilterPostcodeAreasRequest {
    fn hits(&self) -> u32 {
        (self.departure_searches.len() + self.arrival_searches.len()) as u32
    }
}

pub type TimeFilterPostcodeDistrictsRequest = TimeFilterPostcodeAreasRequest;
pub type TimeFilterPostcodeSectorsRequest = TimeFilterPostcodeAreasRequest;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostcodeAreaProperties {
    #[serde(default)]
    pub travel_time_reachable: Option<TravelTimeStatistics>,
    #[serde(default)]
    pub travel_time_all: Option<TravelTimeStatistics>,
    #[serde(default)]
    pub coverage: Option<f64>,
}

/// A reachable district or sector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostcodeArea {
    pub code: String,
    pub properties: PostcodeAreaProperties,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostcodeDistrictsResult {
    pub search_id: String,
    pub districts: Vec<PostcodeArea>,
}

/// Response of `/time-filter/postcode-districts`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterPostcodeDistrictsResponse {
    pub results: Vec<PostcodeDistrictsResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostcodeSectorsResult {
    pub search_id: String,
    pub sectors: Vec<PostcodeArea>,
}

/// Response of `/time-filter/postcode-sectors`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeFilterPostcodeSectorsResponse {
    pub results: Vec<PostcodeSectorsResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TransportationFastType, TransportationType};
    use time::macros::datetime;

    #[test]
    fn test_time_filter_request_serialization() {
        let request = TimeFilterRequest {
            locations: vec![Location::new("a", Coords::new(51.5, -0.1))],
            departure_searches: vec![TimeFilterDepartureSearch {
                id: "s".into(),
                departure_location_id: "a".into(),
                arrival_location_ids: vec!["b".into()],
                departure_time: datetime!(2024-01-01 08:00 UTC),
                transportation: Transportation::new(TransportationType::Driving),
                travel_time: 1800,
                properties: vec![TimeFilterProperty::TravelTime],
                range: None,
                snapping: None,
            }],
            arrival_searches: vec![],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["departure_searches"][0]["departure_time"], "2024-01-01T08:00:00Z");
        assert!(json.get("arrival_searches").is_none());
        assert!(json["departure_searches"][0].get("range").is_none());
        assert_eq!(request.hits(), 1);
    }

    #[test]
    fn test_fast_hits_count_both_shapes() {
        let search = TimeFilterFastOneToManySearch {
            id: "s".into(),
            departure_location_id: "a".into(),
            arrival_location_ids: vec![],
            transportation: TransportationFast::new(TransportationFastType::Driving),
            travel_time: 900,
            arrival_time_period: ArrivalTimePeriod::WeekdayMorning,
            properties: vec![TimeFilterFastProperty::TravelTime],
            snapping: None,
        };
        let request = TimeFilterFastRequest {
            locations: vec![],
            arrival_searches: TimeFilterFastArrivalSearches {
                one_to_many: vec![search.clone(), search],
                many_to_one: vec![],
            },
        };
        assert_eq!(request.hits(), 2);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["arrival_searches"]["one_to_many"][0]["arrival_time_period"],
            "weekday_morning"
        );
        assert!(json["arrival_searches"].get("many_to_one").is_none());
    }

    #[test]
    fn test_time_filter_response_parses_unreachable() {
        let body = r#"{"results":[{"search_id":"s","locations":[{"id":"b","properties":[{"travel_time":600,"distance":4200}]}],"unreachable":["c"]}]}"#;
        let response: TimeFilterResponse = serde_json::from_str(body).unwrap();
        let result = &response.results[0];
        assert_eq!(result.locations[0].properties[0].travel_time, Some(600));
        assert_eq!(result.locations[0].properties[0].distance, Some(4200));
        assert_eq!(result.unreachable, vec!["c".to_string()]);
    }
}
