//! Many-to-many travel time matrices.
//!
//! A matrix query from every origin to every destination is split into
//! one-to-many searches of at most `max_searches_per_request` destinations
//! each. Every wire request carries positional ids:
//!
//! - the origin is `from-{i}`
//! - destinations are `to-{j}`, numbered across chunks
//! - the search is `from-{i}-chunk-{offset}`
//!
//! The results are sent as one batch and written back into dense
//! `origins x destinations` matrices using those ids. `None` marks a cell
//! nothing was returned for, `-1` a destination the API reported unreachable.

use std::sync::LazyLock;

use regex::Regex;
use time::OffsetDateTime;

use crate::error::TravelTimeError;
use crate::rest::TravelTimeClient;
use crate::rest::batch::{BatchResponse, execute_batch};
use crate::rest::time_filter::{
    TimeFilterArrivalSearch, TimeFilterDepartureSearch, TimeFilterFastArrivalSearches,
    TimeFilterFastOneToManySearch, TimeFilterFastProperty, TimeFilterFastRequest,
    TimeFilterFastResponse, TimeFilterProperty, TimeFilterRequest, TimeFilterResponse,
};
use crate::rest::traits::TravelTimeApi;
use crate::types::{
    ArrivalTimePeriod, Coords, Location, SearchType, Snapping, Transportation, TransportationFast,
};

/// Destination ceiling per `/time-filter` request.
pub const MAX_SEARCHES_PER_REQUEST: usize = 2_000;

/// Destination ceiling per `/time-filter/fast` request.
pub const MAX_FAST_SEARCHES_PER_REQUEST: usize = 100_000;

/// Value written for destinations the API reports as unreachable.
pub const UNREACHABLE: i64 = -1;

/// Dense matrix, indexed `[origin][destination]`.
pub type Matrix = Vec<Vec<Option<i64>>>;

/// Result of a matrix query.
#[derive(Debug, Default)]
pub struct MatrixResponse {
    /// Travel times in seconds, if requested.
    pub travel_times: Option<Matrix>,
    /// Distances in metres, if requested.
    pub distances: Option<Matrix>,
    /// Errors of the wire requests that failed.
    pub errors: Vec<TravelTimeError>,
    /// Results and location ids whose positional id could not be mapped to a
    /// cell. These are skipped and not reported in `errors`.
    pub dropped: usize,
}

/// Fast many-to-many matrix (`/time-filter/fast`, weekday morning).
#[derive(Debug, Clone, PartialEq)]
pub struct ManyToManyMatrixFastRequest {
    pub coords_from: Vec<Coords>,
    pub coords_to: Vec<Coords>,
    pub transportation: TransportationFast,
    pub travel_time: u32,
    /// Defaults to travel time only.
    pub properties: Option<Vec<TimeFilterFastProperty>>,
    /// Defaults to, and may not exceed, [`MAX_FAST_SEARCHES_PER_REQUEST`].
    pub max_searches_per_request: Option<usize>,
}

impl ManyToManyMatrixFastRequest {
    pub fn new(
        coords_from: Vec<Coords>,
        coords_to: Vec<Coords>,
        transportation: impl Into<TransportationFast>,
        travel_time: u32,
    ) -> Self {
        Self {
            coords_from,
            coords_to,
            transportation: transportation.into(),
            travel_time,
            properties: None,
            max_searches_per_request: None,
        }
    }

    fn properties(&self) -> Vec<TimeFilterFastProperty> {
        self.properties
            .clone()
            .unwrap_or_else(|| vec![TimeFilterFastProperty::TravelTime])
    }

    /// Split into wire requests.
    ///
    /// Fails if `max_searches_per_request` exceeds the ceiling.
    pub fn to_requests(&self) -> Result<Vec<TimeFilterFastRequest>, TravelTimeError> {
        let max = chunk_limit(self.max_searches_per_request, MAX_FAST_SEARCHES_PER_REQUEST)?;
        let properties = self.properties();
        Ok(decompose(&self.coords_from, &self.coords_to, max, |chunk| {
            TimeFilterFastRequest {
                arrival_searches: TimeFilterFastArrivalSearches {
                    one_to_many: vec![TimeFilterFastOneToManySearch {
                        id: chunk.search_id(),
                        departure_location_id: chunk.origin_id(),
                        arrival_location_ids: chunk.destination_ids(),
                        transportation: self.transportation.clone(),
                        travel_time: self.travel_time,
                        arrival_time_period: ArrivalTimePeriod::WeekdayMorning,
                        properties: properties.clone(),
                        snapping: None,
                    }],
                    many_to_one: Vec::new(),
                },
                locations: chunk.locations(),
            }
        }))
    }
}

/// Many-to-many matrix on the standard `/time-filter` endpoint.
///
/// With [`SearchType::Arrive`] each origin row holds travel times from every
/// destination to that origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ManyToManyMatrixRequest {
    pub coords_from: Vec<Coords>,
    pub coords_to: Vec<Coords>,
    pub leave_time: OffsetDateTime,
    pub transportation: Transportation,
    pub travel_time: u32,
    pub search_type: SearchType,
    /// Defaults to travel time only.
    pub properties: Option<Vec<TimeFilterProperty>>,
    pub snapping: Option<Snapping>,
    /// Defaults to, and may not exceed, [`MAX_SEARCHES_PER_REQUEST`].
    pub max_searches_per_request: Option<usize>,
}

impl ManyToManyMatrixRequest {
    pub fn new(
        coords_from: Vec<Coords>,
        coords_to: Vec<Coords>,
        leave_time: OffsetDateTime,
        transportation: impl Into<Transportation>,
        travel_time: u32,
    ) -> Self {
        Self {
            coords_from,
            coords_to,
            leave_time,
            transportation: transportation.into(),
            travel_time,
            search_type: SearchType::default(),
            properties: None,
            snapping: None,
            max_searches_per_request: None,
        }
    }

    fn properties(&self) -> Vec<TimeFilterProperty> {
        self.properties
            .clone()
            .unwrap_or_else(|| vec![TimeFilterProperty::TravelTime])
    }

    /// Split into wire requests.
    ///
    /// Fails if `max_searches_per_request` exceeds the ceiling.
    pub fn to_requests(&self) -> Result<Vec<TimeFilterRequest>, TravelTimeError> {
        let max = chunk_limit(self.max_searches_per_request, MAX_SEARCHES_PER_REQUEST)?;
        let properties = self.properties();
        Ok(decompose(&self.coords_from, &self.coords_to, max, |chunk| {
            let mut request = TimeFilterRequest {
                locations: chunk.locations(),
                ..Default::default()
            };
            match self.search_type {
                SearchType::Depart => request.departure_searches.push(TimeFilterDepartureSearch {
                    id: chunk.search_id(),
                    departure_location_id: chunk.origin_id(),
                    arrival_location_ids: chunk.destination_ids(),
                    departure_time: self.leave_time,
                    transportation: self.transportation.clone(),
                    travel_time: self.travel_time,
                    properties: properties.clone(),
                    range: None,
                    snapping: self.snapping,
                }),
                SearchType::Arrive => request.arrival_searches.push(TimeFilterArrivalSearch {
                    id: chunk.search_id(),
                    arrival_location_id: chunk.origin_id(),
                    departure_location_ids: chunk.destination_ids(),
                    arrival_time: self.leave_time,
                    transportation: self.transportation.clone(),
                    travel_time: self.travel_time,
                    properties: properties.clone(),
                    range: None,
                    snapping: self.snapping,
                }),
            }
            request
        }))
    }
}

fn chunk_limit(requested: Option<usize>, ceiling: usize) -> Result<usize, TravelTimeError> {
    match requested {
        Some(max) if max > ceiling => Err(TravelTimeError::Config(format!(
            "Max number of searches is {ceiling}, got {max}"
        ))),
        Some(0) => Err(TravelTimeError::Config(
            "max_searches_per_request must be greater than 0".to_string(),
        )),
        Some(max) => Ok(max),
        None => Ok(ceiling),
    }
}

/// One origin paired with one slice of the destinations.
struct Chunk<'a> {
    index_from: usize,
    coords_from: Coords,
    destinations: &'a [Coords],
    offset: usize,
}

impl Chunk<'_> {
    fn origin_id(&self) -> String {
        format!("from-{}", self.index_from)
    }

    fn search_id(&self) -> String {
        format!("from-{}-chunk-{}", self.index_from, self.offset)
    }

    fn destination_ids(&self) -> Vec<String> {
        (0..self.destinations.len())
            .map(|k| format!("to-{}", k + self.offset))
            .collect()
    }

    fn locations(&self) -> Vec<Location> {
        std::iter::once(Location::new(self.origin_id(), self.coords_from))
            .chain(
                self.destination_ids()
                    .into_iter()
                    .zip(self.destinations)
                    .map(|(id, coords)| Location::new(id, *coords)),
            )
            .collect()
    }
}

/// Build `|from| x ceil(|to| / max)` requests, origin-major.
fn decompose<R>(
    coords_from: &[Coords],
    coords_to: &[Coords],
    max: usize,
    mut make_request: impl FnMut(Chunk<'_>) -> R,
) -> Vec<R> {
    let mut requests = Vec::with_capacity(coords_from.len() * coords_to.len().div_ceil(max));
    for (index_from, coords) in coords_from.iter().enumerate() {
        for (chunk_index, destinations) in coords_to.chunks(max).enumerate() {
            requests.push(make_request(Chunk {
                index_from,
                coords_from: *coords,
                destinations,
                offset: chunk_index * max,
            }));
        }
    }
    requests
}

static SEARCH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*-(\d+)-.*(\d+)").expect("search id pattern should compile"));

/// Recovers matrix positions from positional ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchIdParser;

impl SearchIdParser {
    pub fn new() -> Self {
        Self
    }

    /// Origin index of a `from-{i}-chunk-{offset}` search id.
    pub fn origin_index(&self, search_id: &str) -> Option<usize> {
        SEARCH_ID
            .captures(search_id)?
            .get(1)?
            .as_str()
            .parse()
            .ok()
    }

    /// Destination index of a `to-{j}` location id.
    pub fn destination_index(&self, location_id: &str) -> Option<usize> {
        location_id.get(3..)?.parse().ok()
    }
}

/// A location of a matrix result.
trait MatrixCell {
    fn id(&self) -> &str;
    fn travel_time(&self) -> Option<i64>;
    fn distance(&self) -> Option<i64>;
}

/// A per-search result of a matrix request.
trait MatrixResult {
    type Cell: MatrixCell;
    fn search_id(&self) -> &str;
    fn cells(&self) -> &[Self::Cell];
    fn unreachable(&self) -> &[String];
}

/// A response of a matrix request.
trait MatrixBody {
    type Result: MatrixResult;
    fn results(&self) -> &[Self::Result];
}

mod cells {
    use super::{MatrixBody, MatrixCell, MatrixResult};
    use crate::rest::time_filter::{
        TimeFilterFastLocation, TimeFilterFastResponse, TimeFilterFastResult, TimeFilterLocation,
        TimeFilterResponse, TimeFilterResult,
    };

    impl MatrixCell for TimeFilterFastLocation {
        fn id(&self) -> &str {
            &self.id
        }

        fn travel_time(&self) -> Option<i64> {
            self.properties.travel_time
        }

        fn distance(&self) -> Option<i64> {
            self.properties.distance
        }
    }

    impl MatrixCell for TimeFilterLocation {
        fn id(&self) -> &str {
            &self.id
        }

        fn travel_time(&self) -> Option<i64> {
            self.properties.first().and_then(|p| p.travel_time)
        }

        fn distance(&self) -> Option<i64> {
            self.properties.first().and_then(|p| p.distance)
        }
    }

    macro_rules! matrix_result {
        ($response:ty, $result:ty, $cell:ty) => {
            impl MatrixResult for $result {
                type Cell = $cell;

                fn search_id(&self) -> &str {
                    &self.search_id
                }

                fn cells(&self) -> &[$cell] {
                    &self.locations
                }

                fn unreachable(&self) -> &[String] {
                    &self.unreachable
                }
            }

            impl MatrixBody for $response {
                type Result = $result;

                fn results(&self) -> &[$result] {
                    &self.results
                }
            }
        };
    }

    matrix_result!(TimeFilterResponse, TimeFilterResult, TimeFilterLocation);
    matrix_result!(TimeFilterFastResponse, TimeFilterFastResult, TimeFilterFastLocation);
}

/// Which matrices to fill.
#[derive(Debug, Clone, Copy)]
struct Outputs {
    travel_times: bool,
    distances: bool,
}

fn empty_matrix(size_from: usize, size_to: usize) -> Matrix {
    vec![vec![None; size_to]; size_from]
}

/// Write batch results into `size_from x size_to` matrices.
fn recompose<B: MatrixBody>(
    responses: Vec<BatchResponse<B>>,
    size_from: usize,
    size_to: usize,
    outputs: Outputs,
    parser: &SearchIdParser,
) -> MatrixResponse {
    let mut matrix = MatrixResponse {
        travel_times: outputs
            .travel_times
            .then(|| empty_matrix(size_from, size_to)),
        distances: outputs.distances.then(|| empty_matrix(size_from, size_to)),
        ..Default::default()
    };

    for response in responses {
        let body = match response {
            BatchResponse::Success(body) => body,
            BatchResponse::Error(error) => {
                matrix.errors.push(error);
                continue;
            }
        };

        for result in body.results() {
            let Some(from) = parser
                .origin_index(result.search_id())
                .filter(|&from| from < size_from)
            else {
                tracing::debug!(
                    search_id = result.search_id(),
                    "dropping unmappable matrix result"
                );
                matrix.dropped += 1;
                continue;
            };

            for id in result.unreachable() {
                match destination(parser, id, size_to) {
                    Some(to) => matrix.set(from, to, Some(UNREACHABLE), Some(UNREACHABLE)),
                    None => matrix.dropped += 1,
                }
            }

            for cell in result.cells() {
                match destination(parser, cell.id(), size_to) {
                    Some(to) => matrix.set(from, to, cell.travel_time(), cell.distance()),
                    None => matrix.dropped += 1,
                }
            }
        }
    }

    matrix
}

fn destination(parser: &SearchIdParser, id: &str, size_to: usize) -> Option<usize> {
    let index = parser.destination_index(id).filter(|&to| to < size_to);
    if index.is_none() {
        tracing::debug!(location_id = id, "dropping unmappable matrix location");
    }
    index
}

impl MatrixResponse {
    fn set(&mut self, from: usize, to: usize, travel_time: Option<i64>, distance: Option<i64>) {
        if let Some(matrix) = self.travel_times.as_mut() {
            matrix[from][to] = travel_time;
        }
        if let Some(matrix) = self.distances.as_mut() {
            matrix[from][to] = distance;
        }
    }
}

/// Run a fast many-to-many matrix query against `api`.
///
/// Wire requests are sent in waves of `chunk_size` (all at once for `None`).
/// Only a ceiling violation fails the call; failed wire requests end up in
/// [`MatrixResponse::errors`].
pub async fn many_to_many_matrix_fast<C: TravelTimeApi + ?Sized>(
    api: &C,
    request: &ManyToManyMatrixFastRequest,
    chunk_size: Option<usize>,
) -> Result<MatrixResponse, TravelTimeError> {
    let requests = request.to_requests()?;
    let parser = SearchIdParser::new();
    let properties = request.properties();
    let outputs = Outputs {
        travel_times: properties.contains(&TimeFilterFastProperty::TravelTime),
        distances: properties.contains(&TimeFilterFastProperty::Distance),
    };

    tracing::debug!(
        origins = request.coords_from.len(),
        destinations = request.coords_to.len(),
        requests = requests.len(),
        "sending fast matrix"
    );
    let responses: Vec<BatchResponse<TimeFilterFastResponse>> =
        execute_batch(&requests, |wire| api.time_filter_fast(wire), chunk_size).await;

    Ok(recompose(
        responses,
        request.coords_from.len(),
        request.coords_to.len(),
        outputs,
        &parser,
    ))
}

/// Run a many-to-many matrix query on the standard endpoint against `api`.
///
/// See [`many_to_many_matrix_fast`] for the failure model.
pub async fn many_to_many_matrix<C: TravelTimeApi + ?Sized>(
    api: &C,
    request: &ManyToManyMatrixRequest,
    chunk_size: Option<usize>,
) -> Result<MatrixResponse, TravelTimeError> {
    let requests = request.to_requests()?;
    let parser = SearchIdParser::new();
    let properties = request.properties();
    let outputs = Outputs {
        travel_times: properties.contains(&TimeFilterProperty::TravelTime),
        distances: properties.contains(&TimeFilterProperty::Distance),
    };

    tracing::debug!(
        origins = request.coords_from.len(),
        destinations = request.coords_to.len(),
        requests = requests.len(),
        "sending matrix"
    );
    let responses: Vec<BatchResponse<TimeFilterResponse>> =
        execute_batch(&requests, |wire| api.time_filter(wire), chunk_size).await;

    Ok(recompose(
        responses,
        request.coords_from.len(),
        request.coords_to.len(),
        outputs,
        &parser,
    ))
}

impl TravelTimeClient {
    /// Travel times from every origin to every destination, using the fast endpoint.
    pub async fn many_to_many_matrix_fast(
        &self,
        request: &ManyToManyMatrixFastRequest,
    ) -> Result<MatrixResponse, TravelTimeError> {
        many_to_many_matrix_fast(self, request, self.batch_chunk_size()).await
    }

    /// Travel times from every origin to every destination at a given time.
    pub async fn many_to_many_matrix(
        &self,
        request: &ManyToManyMatrixRequest,
    ) -> Result<MatrixResponse, TravelTimeError> {
        many_to_many_matrix(self, request, self.batch_chunk_size()).await
    }
}
