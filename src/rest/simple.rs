//! Compact request shapes and their translation to wire requests.
//!
//! Each `*Simple` type describes many searches that share one set of
//! parameters. Searches are numbered `id-0`, `id-1`, ... in input order.

use std::collections::HashMap;

use time::OffsetDateTime;

use crate::rest::batch::BatchResponse;
use crate::rest::isochrones::{
    DistanceMapArrivalSearch, DistanceMapDepartureSearch, DistanceMapRequest,
    TimeMapArrivalSearch, TimeMapDepartureSearch, TimeMapFastArrivalSearches, TimeMapFastRequest,
    TimeMapFastSearch, TimeMapProperty, TimeMapRequest,
};
use crate::rest::routes::{
    RouteProperty, RoutesArrivalSearch, RoutesDepartureSearch, RoutesRequest,
};
use crate::rest::time_filter::{
    TimeFilterArrivalSearch, TimeFilterDepartureSearch, TimeFilterFastArrivalSearches,
    TimeFilterFastManyToOneSearch, TimeFilterFastOneToManySearch, TimeFilterFastProperty,
    TimeFilterFastRequest, TimeFilterFastResponse, TimeFilterFastResult, TimeFilterProperty,
    TimeFilterRequest, TimeFilterResponse, TimeFilterResult,
};
use crate::types::{
    ArrivalTimePeriod, Coords, FastSearchType, LevelOfDetail, Location, PolygonsFilter, RangeFull,
    RangeNoMaxResults, SearchType, Transportation, TransportationFast,
};

fn search_id(index: usize) -> String {
    format!("id-{index}")
}

/// Isochrones for several coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMapSimple {
    pub coords: Vec<Coords>,
    /// Departure time, or arrival time for [`SearchType::Arrive`].
    pub leave_time: OffsetDateTime,
    pub transportation: Transportation,
    pub travel_time: u32,
    pub search_type: SearchType,
    pub properties: Option<Vec<TimeMapProperty>>,
    pub range: Option<RangeNoMaxResults>,
    pub level_of_detail: Option<LevelOfDetail>,
    pub single_shape: Option<bool>,
    pub polygons_filter: Option<PolygonsFilter>,
    pub no_holes: Option<bool>,
}

impl TimeMapSimple {
    /// Searches with default options for every coordinate.
    pub fn new(
        coords: Vec<Coords>,
        leave_time: OffsetDateTime,
        transportation: impl Into<Transportation>,
        travel_time: u32,
    ) -> Self {
        Self {
            coords,
            leave_time,
            transportation: transportation.into(),
            travel_time,
            search_type: SearchType::default(),
            properties: None,
            range: None,
            level_of_detail: None,
            single_shape: None,
            polygons_filter: None,
            no_holes: None,
        }
    }

    /// Build the `/time-map` request.
    pub fn to_request(&self) -> TimeMapRequest {
        let mut request = TimeMapRequest::default();
        match self.search_type {
            SearchType::Depart => {
                request.departure_searches = self
                    .coords
                    .iter()
                    .enumerate()
                    .map(|(index, coords)| TimeMapDepartureSearch {
                        id: search_id(index),
                        coords: *coords,
                        departure_time: self.leave_time,
                        transportation: self.transportation.clone(),
                        travel_time: self.travel_time,
                        properties: self.properties.clone(),
                        range: self.range,
                        level_of_detail: self.level_of_detail,
                        single_shape: self.single_shape,
                        polygons_filter: self.polygons_filter,
                        no_holes: self.no_holes,
                        render_mode: None,
                        remove_water_bodies: None,
                        snapping: None,
                    })
                    .collect();
            }
            SearchType::Arrive => {
                request.arrival_searches = self
                    .coords
                    .iter()
                    .enumerate()
                    .map(|(index, coords)| TimeMapArrivalSearch {
                        id: search_id(index),
                        coords: *coords,
                        arrival_time: self.leave_time,
                        transportation: self.transportation.clone(),
                        travel_time: self.travel_time,
                        properties: self.properties.clone(),
                        range: self.range,
                        level_of_detail: self.level_of_detail,
                        single_shape: self.single_shape,
                        polygons_filter: self.polygons_filter,
                        no_holes: self.no_holes,
                        render_mode: None,
                        remove_water_bodies: None,
                        snapping: None,
                    })
                    .collect();
            }
        }
        request
    }
}

/// Fast isochrones for several coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMapFastSimple {
    pub coords: Vec<Coords>,
    pub transportation: TransportationFast,
    pub travel_time: u32,
    pub search_type: FastSearchType,
    pub level_of_detail: Option<LevelOfDetail>,
}

impl TimeMapFastSimple {
    pub fn new(
        coords: Vec<Coords>,
        transportation: impl Into<TransportationFast>,
        travel_time: u32,
    ) -> Self {
        Self {
            coords,
            transportation: transportation.into(),
            travel_time,
            search_type: FastSearchType::default(),
            level_of_detail: None,
        }
    }

    /// Build the `/time-map/fast` request.
    pub fn to_request(&self) -> TimeMapFastRequest {
        let searches = self
            .coords
            .iter()
            .enumerate()
            .map(|(index, coords)| TimeMapFastSearch {
                id: search_id(index),
                coords: *coords,
                transportation: self.transportation.clone(),
                travel_time: self.travel_time,
                arrival_time_period: ArrivalTimePeriod::WeekdayMorning,
                level_of_detail: self.level_of_detail,
                polygons_filter: None,
                no_holes: None,
                render_mode: None,
                snapping: None,
            })
            .collect();

        let mut arrival_searches = TimeMapFastArrivalSearches::default();
        match self.search_type {
            FastSearchType::OneToMany => arrival_searches.one_to_many = searches,
            FastSearchType::ManyToOne => arrival_searches.many_to_one = searches,
        }
        TimeMapFastRequest { arrival_searches }
    }
}

/// Distance isochrones for several coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMapSimple {
    pub coords: Vec<Coords>,
    pub leave_time: OffsetDateTime,
    pub transportation: Transportation,
    /// Maximum distance in metres.
    pub travel_distance: u32,
    pub search_type: SearchType,
    pub level_of_detail: Option<LevelOfDetail>,
    pub single_shape: Option<bool>,
    pub polygons_filter: Option<PolygonsFilter>,
    pub no_holes: Option<bool>,
}

impl DistanceMapSimple {
    pub fn new(
        coords: Vec<Coords>,
        leave_time: OffsetDateTime,
        transportation: impl Into<Transportation>,
        travel_distance: u32,
    ) -> Self {
        Self {
            coords,
            leave_time,
            transportation: transportation.into(),
            travel_distance,
            search_type: SearchType::default(),
            level_of_detail: None,
            single_shape: None,
            polygons_filter: None,
            no_holes: None,
        }
    }

    /// Build the `/distance-map` request.
    pub fn to_request(&self) -> DistanceMapRequest {
        let mut request = DistanceMapRequest::default();
        match self.search_type {
            SearchType::Depart => {
                request.departure_searches = self
                    .coords
                    .iter()
                    .enumerate()
                    .map(|(index, coords)| DistanceMapDepartureSearch {
                        id: search_id(index),
                        coords: *coords,
                        departure_time: self.leave_time,
                        transportation: self.transportation.clone(),
                        travel_distance: self.travel_distance,
                        level_of_detail: self.level_of_detail,
                        single_shape: self.single_shape,
                        polygons_filter: self.polygons_filter,
                        no_holes: self.no_holes,
                        snapping: None,
                    })
                    .collect();
            }
            SearchType::Arrive => {
                request.arrival_searches = self
                    .coords
                    .iter()
                    .enumerate()
                    .map(|(index, coords)| DistanceMapArrivalSearch {
                        id: search_id(index),
                        coords: *coords,
                        arrival_time: self.leave_time,
                        transportation: self.transportation.clone(),
                        travel_distance: self.travel_distance,
                        level_of_detail: self.level_of_detail,
                        single_shape: self.single_shape,
                        polygons_filter: self.polygons_filter,
                        no_holes: self.no_holes,
                        snapping: None,
                    })
                    .collect();
            }
        }
        request
    }
}

/// Travel times between locations, with searches given as
/// `(origin id, destination ids)` pairs.
///
/// For [`SearchType::Arrive`] the first id of each pair is the arrival
/// location and the rest are departure locations.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFilterSimple {
    pub locations: Vec<Location>,
    pub search_ids: Vec<(String, Vec<String>)>,
    pub leave_time: OffsetDateTime,
    pub transportation: Transportation,
    pub travel_time: u32,
    pub properties: Vec<TimeFilterProperty>,
    pub search_type: SearchType,
    pub range: Option<RangeFull>,
}

impl TimeFilterSimple {
    /// Build the `/time-filter` request.
    pub fn to_request(&self) -> TimeFilterRequest {
        let mut request = TimeFilterRequest {
            locations: self.locations.clone(),
            ..Default::default()
        };
        let searches = self.search_ids.iter().enumerate();
        match self.search_type {
            SearchType::Depart => {
                request.departure_searches = searches
                    .map(|(index, (one, many))| TimeFilterDepartureSearch {
                        id: search_id(index),
                        departure_location_id: one.clone(),
                        arrival_location_ids: many.clone(),
                        departure_time: self.leave_time,
                        transportation: self.transportation.clone(),
                        travel_time: self.travel_time,
                        properties: self.properties.clone(),
                        range: self.range,
                        snapping: None,
                    })
                    .collect();
            }
            SearchType::Arrive => {
                request.arrival_searches = searches
                    .map(|(index, (one, many))| TimeFilterArrivalSearch {
                        id: search_id(index),
                        arrival_location_id: one.clone(),
                        departure_location_ids: many.clone(),
                        arrival_time: self.leave_time,
                        transportation: self.transportation.clone(),
                        travel_time: self.travel_time,
                        properties: self.properties.clone(),
                        range: self.range,
                        snapping: None,
                    })
                    .collect();
            }
        }
        request
    }
}

/// Fast travel times between locations, with searches given as
/// `(origin id, destination ids)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeFilterFastSimple {
    pub locations: Vec<Location>,
    pub search_ids: Vec<(String, Vec<String>)>,
    pub transportation: TransportationFast,
    pub travel_time: u32,
    /// Defaults to travel time only.
    pub properties: Option<Vec<TimeFilterFastProperty>>,
    pub search_type: FastSearchType,
}

impl TimeFilterFastSimple {
    /// Build the `/time-filter/fast` request.
    pub fn to_request(&self) -> TimeFilterFastRequest {
        let properties = self
            .properties
            .clone()
            .unwrap_or_else(|| vec![TimeFilterFastProperty::TravelTime]);
        let searches = self.search_ids.iter().enumerate();

        let mut arrival_searches = TimeFilterFastArrivalSearches::default();
        match self.search_type {
            FastSearchType::OneToMany => {
                arrival_searches.one_to_many = searches
                    .map(|(index, (one, many))| TimeFilterFastOneToManySearch {
                        id: search_id(index),
                        departure_location_id: one.clone(),
                        arrival_location_ids: many.clone(),
                        transportation: self.transportation.clone(),
                        travel_time: self.travel_time,
                        arrival_time_period: ArrivalTimePeriod::WeekdayMorning,
                        properties: properties.clone(),
                        snapping: None,
                    })
                    .collect();
            }
            FastSearchType::ManyToOne => {
                arrival_searches.many_to_one = searches
                    .map(|(index, (one, many))| TimeFilterFastManyToOneSearch {
                        id: search_id(index),
                        arrival_location_id: one.clone(),
                        departure_location_ids: many.clone(),
                        transportation: self.transportation.clone(),
                        travel_time: self.travel_time,
                        arrival_time_period: ArrivalTimePeriod::WeekdayMorning,
                        properties: properties.clone(),
                        snapping: None,
                    })
                    .collect();
            }
        }

        TimeFilterFastRequest {
            locations: self.locations.clone(),
            arrival_searches,
        }
    }
}

/// Routes between locations, with searches given as
/// `(origin id, destination ids)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutesSimple {
    pub locations: Vec<Location>,
    pub search_ids: Vec<(String, Vec<String>)>,
    pub leave_time: OffsetDateTime,
    pub transportation: Transportation,
    pub properties: Vec<RouteProperty>,
    pub search_type: SearchType,
    pub range: Option<RangeFull>,
}

impl RoutesSimple {
    /// Build the `/routes` request.
    pub fn to_request(&self) -> RoutesRequest {
        let mut request = RoutesRequest {
            locations: self.locations.clone(),
            ..Default::default()
        };
        let searches = self.search_ids.iter().enumerate();
        match self.search_type {
            SearchType::Depart => {
                request.departure_searches = searches
                    .map(|(index, (one, many))| RoutesDepartureSearch {
                        id: search_id(index),
                        departure_location_id: one.clone(),
                        arrival_location_ids: many.clone(),
                        departure_time: self.leave_time,
                        transportation: self.transportation.clone(),
                        properties: self.properties.clone(),
                        range: self.range,
                    })
                    .collect();
            }
            SearchType::Arrive => {
                request.arrival_searches = searches
                    .map(|(index, (one, many))| RoutesArrivalSearch {
                        id: search_id(index),
                        arrival_location_id: one.clone(),
                        departure_location_ids: many.clone(),
                        arrival_time: self.leave_time,
                        transportation: self.transportation.clone(),
                        properties: self.properties.clone(),
                        range: self.range,
                    })
                    .collect();
            }
        }
        request
    }
}

/// A per-search result that can absorb another result with the same search id.
pub trait SearchResult {
    fn search_id(&self) -> &str;
    /// Append the locations and unreachable ids of `other`.
    fn absorb(&mut self, other: Self);
}

/// A response made of per-search results.
pub trait SearchResults: Sized {
    type Item: SearchResult;
    fn into_results(self) -> Vec<Self::Item>;
    fn from_results(results: Vec<Self::Item>) -> Self;
}

macro_rules! impl_search_results {
    ($response:ty, $result:ty) => {
        impl SearchResult for $result {
            fn search_id(&self) -> &str {
                &self.search_id
            }

            fn absorb(&mut self, other: Self) {
                self.locations.extend(other.locations);
                self.unreachable.extend(other.unreachable);
            }
        }

        impl SearchResults for $response {
            type Item = $result;

            fn into_results(self) -> Vec<$result> {
                self.results
            }

            fn from_results(results: Vec<$result>) -> Self {
                Self { results }
            }
        }
    };
}

impl_search_results!(TimeFilterResponse, TimeFilterResult);
impl_search_results!(TimeFilterFastResponse, TimeFilterFastResult);

/// Merge batch responses whose results share a `search_id`.
///
/// Returns one success per distinct search id, in first-seen order, each
/// holding a single merged result, followed by the original errors.
pub fn merge_time_filter_responses<T: SearchResults>(
    responses: Vec<BatchResponse<T>>,
) -> Vec<BatchResponse<T>> {
    let mut merged: Vec<T::Item> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut errors = Vec::new();

    for response in responses {
        match response {
            BatchResponse::Success(body) => {
                for result in body.into_results() {
                    match positions.get(result.search_id()) {
                        Some(&index) => merged[index].absorb(result),
                        None => {
                            positions.insert(result.search_id().to_string(), merged.len());
                            merged.push(result);
                        }
                    }
                }
            }
            BatchResponse::Error(error) => errors.push(BatchResponse::Error(error)),
        }
    }

    merged
        .into_iter()
        .map(|result| BatchResponse::Success(T::from_results(vec![result])))
        .chain(errors)
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::error::TravelTimeError;
    use crate::rest::time_filter::{TimeFilterFastLocation, TimeFilterFastProperties};
    use crate::types::{TransportationFastType, TransportationType};

    fn locations() -> Vec<Location> {
        vec![
            Location::new("london", Coords::new(51.508, -0.128)),
            Location::new("hyde-park", Coords::new(51.508, -0.163)),
            Location::new("zoo", Coords::new(51.536, -0.153)),
        ]
    }

    #[test]
    fn test_time_map_simple_numbers_searches() {
        let simple = TimeMapSimple::new(
            vec![Coords::new(51.5, -0.1), Coords::new(52.2, 0.1)],
            datetime!(2024-01-01 08:00 UTC),
            TransportationType::PublicTransport,
            900,
        );
        let request = simple.to_request();
        assert_eq!(request.departure_searches.len(), 2);
        assert_eq!(request.departure_searches[1].id, "id-1");
        assert!(request.arrival_searches.is_empty());

        let arrive = TimeMapSimple {
            search_type: SearchType::Arrive,
            ..simple
        };
        let request = arrive.to_request();
        assert!(request.departure_searches.is_empty());
        assert_eq!(request.arrival_searches[0].arrival_time, datetime!(2024-01-01 08:00 UTC));
    }

    #[test]
    fn test_time_map_fast_simple_shape() {
        let mut simple = TimeMapFastSimple::new(
            vec![Coords::new(51.5, -0.1)],
            TransportationFastType::Driving,
            1200,
        );
        simple.search_type = FastSearchType::ManyToOne;
        let request = simple.to_request();
        assert!(request.arrival_searches.one_to_many.is_empty());
        assert_eq!(
            request.arrival_searches.many_to_one[0].arrival_time_period,
            ArrivalTimePeriod::WeekdayMorning
        );
    }

    #[test]
    fn test_time_filter_simple_keeps_pair_order() {
        let simple = TimeFilterSimple {
            locations: locations(),
            search_ids: vec![
                ("zoo".into(), vec!["london".into()]),
                ("london".into(), vec!["hyde-park".into(), "zoo".into()]),
            ],
            leave_time: datetime!(2024-01-01 08:00 UTC),
            transportation: Transportation::new(TransportationType::Walking),
            travel_time: 1800,
            properties: vec![TimeFilterProperty::TravelTime],
            search_type: SearchType::Arrive,
            range: None,
        };
        let request = simple.to_request();
        assert_eq!(request.locations.len(), 3);
        let searches = &request.arrival_searches;
        assert_eq!(searches[0].id, "id-0");
        assert_eq!(searches[0].arrival_location_id, "zoo");
        assert_eq!(searches[1].departure_location_ids, vec!["hyde-park", "zoo"]);
    }

    #[test]
    fn test_time_filter_fast_simple_defaults_to_travel_time() {
        let simple = TimeFilterFastSimple {
            locations: locations(),
            search_ids: vec![("london".into(), vec!["zoo".into()])],
            transportation: TransportationFast::new(TransportationFastType::PublicTransport),
            travel_time: 3600,
            properties: None,
            search_type: FastSearchType::default(),
        };
        let request = simple.to_request();
        let search = &request.arrival_searches.one_to_many[0];
        assert_eq!(search.properties, vec![TimeFilterFastProperty::TravelTime]);
        assert_eq!(search.departure_location_id, "london");
    }

    #[test]
    fn test_routes_simple_depart() {
        let simple = RoutesSimple {
            locations: locations(),
            search_ids: vec![("london".into(), vec!["zoo".into()])],
            leave_time: datetime!(2024-01-01 08:00 UTC),
            transportation: Transportation::new(TransportationType::Driving),
            properties: vec![RouteProperty::Route],
            search_type: SearchType::Depart,
            range: None,
        };
        let request = simple.to_request();
        assert_eq!(request.departure_searches[0].arrival_location_ids, vec!["zoo"]);
    }

    fn fast_response(
        search_id: &str,
        location: &str,
        unreachable: &[&str],
    ) -> TimeFilterFastResponse {
        TimeFilterFastResponse {
            results: vec![TimeFilterFastResult {
                search_id: search_id.into(),
                locations: vec![TimeFilterFastLocation {
                    id: location.into(),
                    properties: TimeFilterFastProperties {
                        travel_time: Some(60),
                        distance: None,
                        fares: None,
                    },
                }],
                unreachable: unreachable.iter().map(|id| id.to_string()).collect(),
            }],
        }
    }

    #[test]
    fn test_merge_groups_by_search_id() {
        let responses = vec![
            BatchResponse::Success(fast_response("a", "to-0", &[])),
            BatchResponse::Error(TravelTimeError::Config("boom".into())),
            BatchResponse::Success(fast_response("b", "to-0", &["to-1"])),
            BatchResponse::Success(fast_response("a", "to-1", &["to-2"])),
        ];
        let merged = merge_time_filter_responses(responses);
        assert_eq!(merged.len(), 3);

        let first = merged[0].success().unwrap();
        assert_eq!(first.results.len(), 1);
        assert_eq!(first.results[0].search_id, "a");
        assert_eq!(first.results[0].locations.len(), 2);
        assert_eq!(first.results[0].unreachable, vec!["to-2"]);

        assert_eq!(merged[1].success().unwrap().results[0].search_id, "b");
        assert!(merged[2].is_error());
    }

    #[test]
    fn test_merge_keeps_first_seen_order_across_many_batches() {
        let responses: Vec<_> = (0..200)
            .map(|i| {
                let id = format!("id-{}", 199 - i % 100);
                BatchResponse::Success(fast_response(&id, &format!("to-{i}"), &[]))
            })
            .collect();
        let merged = merge_time_filter_responses(responses);

        assert_eq!(merged.len(), 100);
        for (position, response) in merged.iter().enumerate() {
            let result = &response.success().unwrap().results[0];
            assert_eq!(result.search_id, format!("id-{}", 199 - position));
            assert_eq!(result.locations.len(), 2);
            assert_eq!(result.locations[0].id, format!("to-{position}"));
            assert_eq!(result.locations[1].id, format!("to-{}", position + 100));
        }
    }
}
