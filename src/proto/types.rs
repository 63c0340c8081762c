//! Request and response types of the protobuf client.

use std::fmt;

use crate::error::TravelTimeError;
use crate::proto::wire;
use crate::types::Coords;

/// Countries served by the protobuf endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtoCountry {
    Uk,
    Ie,
    Us,
    Nl,
    At,
    Be,
    De,
    Fr,
    Lt,
}

impl ProtoCountry {
    /// Path segment of this country.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtoCountry::Uk => "uk",
            ProtoCountry::Ie => "ie",
            ProtoCountry::Us => "us",
            ProtoCountry::Nl => "nl",
            ProtoCountry::At => "at",
            ProtoCountry::Be => "be",
            ProtoCountry::De => "de",
            ProtoCountry::Fr => "fr",
            ProtoCountry::Lt => "lt",
        }
    }

    /// Whether the distance host serves this country.
    pub fn supports_distance(&self) -> bool {
        matches!(self, ProtoCountry::Uk | ProtoCountry::Ie)
    }
}

impl fmt::Display for ProtoCountry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transportation modes of the protobuf endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtoTransportation {
    PublicTransport,
    Driving,
    DrivingFerry,
    CyclingFerry,
    WalkingFerry,
}

impl ProtoTransportation {
    /// Path segment of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtoTransportation::PublicTransport => "pt",
            ProtoTransportation::Driving => "driving",
            ProtoTransportation::DrivingFerry => "driving+ferry",
            ProtoTransportation::CyclingFerry => "cycling+ferry",
            ProtoTransportation::WalkingFerry => "walking+ferry",
        }
    }

    /// Wire code of this mode.
    pub fn wire_type(&self) -> wire::TransportationType {
        match self {
            ProtoTransportation::PublicTransport => wire::TransportationType::PublicTransport,
            ProtoTransportation::Driving => wire::TransportationType::Driving,
            ProtoTransportation::DrivingFerry => wire::TransportationType::DrivingAndFerry,
            ProtoTransportation::CyclingFerry => wire::TransportationType::CyclingAndFerry,
            ProtoTransportation::WalkingFerry => wire::TransportationType::WalkingAndFerry,
        }
    }

    /// Whether the distance host serves this mode.
    pub fn supports_distance(&self) -> bool {
        matches!(
            self,
            ProtoTransportation::Driving
                | ProtoTransportation::DrivingFerry
                | ProtoTransportation::WalkingFerry
        )
    }
}

impl fmt::Display for ProtoTransportation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Travel times from one origin to many destinations.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoTimeFilterFastRequest {
    pub country: ProtoCountry,
    pub departure_location: Coords,
    pub destination_coordinates: Vec<Coords>,
    pub transportation: ProtoTransportation,
    /// Maximum travel time in seconds.
    pub travel_time: u32,
}

/// Fixed-point offset of `target` from `source`, in units of 1e-5 degrees.
pub(crate) fn encode_fixed_point(source: f64, target: f64) -> i32 {
    ((target - source) * 100_000.0).round() as i32
}

impl ProtoTimeFilterFastRequest {
    /// Build the wire message.
    pub(crate) fn to_message(
        &self,
        with_distances: bool,
    ) -> Result<wire::TimeFilterFastRequest, TravelTimeError> {
        let travel_time = i32::try_from(self.travel_time).map_err(|_| {
            TravelTimeError::Config(format!("travel_time {} is too large", self.travel_time))
        })?;
        let origin = self.departure_location;
        let location_deltas = self
            .destination_coordinates
            .iter()
            .flat_map(|destination| {
                [
                    encode_fixed_point(origin.lat, destination.lat),
                    encode_fixed_point(origin.lng, destination.lng),
                ]
            })
            .collect();
        let properties = if with_distances {
            vec![wire::Property::Distances as i32]
        } else {
            Vec::new()
        };

        Ok(wire::TimeFilterFastRequest {
            one_to_many_request: Some(wire::OneToMany {
                departure_location: Some(wire::Coords {
                    lat: origin.lat as f32,
                    lng: origin.lng as f32,
                }),
                location_deltas,
                transportation: Some(wire::Transportation {
                    r#type: self.transportation.wire_type() as i32,
                }),
                arrival_time_period: wire::TimePeriod::WeekdayMorning as i32,
                travel_time,
                properties,
            }),
        })
    }
}

/// Per-destination results, in the order of `destination_coordinates`.
///
/// Unreachable destinations have a travel time of `-1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoTimeFilterFastResponse {
    /// Travel times in seconds.
    pub travel_times: Vec<i32>,
    /// Distances in metres; only filled by the distance endpoint.
    pub distances: Vec<i32>,
}

impl TryFrom<wire::TimeFilterFastResponse> for ProtoTimeFilterFastResponse {
    type Error = TravelTimeError;

    fn try_from(response: wire::TimeFilterFastResponse) -> Result<Self, Self::Error> {
        if let Some(error) = response.error {
            let kind = wire::ErrorType::try_from(error.r#type).unwrap_or(wire::ErrorType::Unknown);
            return Err(TravelTimeError::ProtoApi(format!("{kind:?}")));
        }
        let properties = response.properties.unwrap_or_default();
        Ok(Self {
            travel_times: properties.travel_times,
            distances: properties.distances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_rounding() {
        assert_eq!(encode_fixed_point(51.5, 51.50001), 1);
        assert_eq!(encode_fixed_point(51.5, 51.499994), -1);
        assert_eq!(encode_fixed_point(-0.1, -0.1), 0);
    }

    #[test]
    fn test_message_interleaves_deltas() {
        let request = ProtoTimeFilterFastRequest {
            country: ProtoCountry::Uk,
            departure_location: Coords::new(51.5, -0.1),
            destination_coordinates: vec![Coords::new(51.51, -0.11), Coords::new(51.49, -0.08)],
            transportation: ProtoTransportation::DrivingFerry,
            travel_time: 7200,
        };
        let message = request.to_message(true).unwrap();
        let one_to_many = message.one_to_many_request.unwrap();
        assert_eq!(one_to_many.location_deltas, vec![1000, -1000, -1000, 2000]);
        assert_eq!(one_to_many.transportation.unwrap().r#type, 3);
        assert_eq!(one_to_many.properties, vec![1]);
        assert_eq!(one_to_many.travel_time, 7200);

        let message = request.to_message(false).unwrap();
        assert!(message.one_to_many_request.unwrap().properties.is_empty());
    }

    #[test]
    fn test_transportation_codes() {
        let codes: Vec<i32> = [
            ProtoTransportation::PublicTransport,
            ProtoTransportation::Driving,
            ProtoTransportation::DrivingFerry,
            ProtoTransportation::CyclingFerry,
            ProtoTransportation::WalkingFerry,
        ]
        .iter()
        .map(|t| t.wire_type() as i32)
        .collect();
        assert_eq!(codes, vec![0, 1, 3, 6, 7]);
    }

    #[test]
    fn test_error_response_becomes_error() {
        let response = wire::TimeFilterFastResponse {
            error: Some(wire::Error {
                r#type: wire::ErrorType::SourceOutOfReach as i32,
            }),
            properties: None,
        };
        let result = ProtoTimeFilterFastResponse::try_from(response);
        assert!(
            matches!(result, Err(TravelTimeError::ProtoApi(kind)) if kind == "SourceOutOfReach")
        );
    }
}
