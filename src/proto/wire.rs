//! Protobuf messages of the fast time-filter endpoint.
//!
//! Mirrors the `TimeFilterFastRequest` and `TimeFilterFastResponse` schemas
//! published by TravelTime.

/// A coordinate with single precision.
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Coords {
    #[prost(float, tag = "1")]
    pub lat: f32,
    #[prost(float, tag = "2")]
    pub lng: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TransportationType {
    PublicTransport = 0,
    Driving = 1,
    DrivingAndPublicTransport = 2,
    DrivingAndFerry = 3,
    Walking = 4,
    Cycling = 5,
    CyclingAndFerry = 6,
    WalkingAndFerry = 7,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Transportation {
    #[prost(enumeration = "TransportationType", tag = "1")]
    pub r#type: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TimePeriod {
    WeekdayMorning = 0,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Property {
    Fares = 0,
    Distances = 1,
}

/// One origin against many destinations given as deltas.
#[derive(Clone, PartialEq, prost::Message)]
pub struct OneToMany {
    #[prost(message, optional, tag = "1")]
    pub departure_location: Option<Coords>,
    /// Destination offsets from the origin in units of 1e-5 degrees, `[lat, lng, lat, lng, ...]`.
    #[prost(sint32, repeated, tag = "2")]
    pub location_deltas: Vec<i32>,
    #[prost(message, optional, tag = "3")]
    pub transportation: Option<Transportation>,
    #[prost(enumeration = "TimePeriod", tag = "4")]
    pub arrival_time_period: i32,
    #[prost(sint32, tag = "5")]
    pub travel_time: i32,
    #[prost(enumeration = "Property", repeated, tag = "6")]
    pub properties: Vec<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TimeFilterFastRequest {
    #[prost(message, optional, tag = "1")]
    pub one_to_many_request: Option<OneToMany>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ErrorType {
    Unknown = 0,
    OneToManyMustNotBeNull = 1,
    SourceNotInGeometry = 2,
    UnrecognizedTransportationMode = 3,
    SourceOutOfReach = 4,
    InvalidProperties = 5,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct Error {
    #[prost(enumeration = "ErrorType", tag = "1")]
    pub r#type: i32,
}

/// Per-destination values, in request order. Unreachable destinations are `-1`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Properties {
    #[prost(sint32, repeated, tag = "1")]
    pub travel_times: Vec<i32>,
    #[prost(int32, repeated, tag = "2")]
    pub monthly_fares: Vec<i32>,
    #[prost(int32, repeated, tag = "3")]
    pub distances: Vec<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TimeFilterFastResponse {
    #[prost(message, optional, tag = "1")]
    pub error: Option<Error>,
    #[prost(message, optional, tag = "2")]
    pub properties: Option<Properties>,
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn test_location_deltas_are_zigzag_packed() {
        let request = TimeFilterFastRequest {
            one_to_many_request: Some(OneToMany {
                location_deltas: vec![1, -1],
                ..Default::default()
            }),
        };
        assert_eq!(request.encode_to_vec(), vec![0x0a, 0x04, 0x12, 0x02, 0x02, 0x01]);
    }

    #[test]
    fn test_error_type_from_wire() {
        let response = TimeFilterFastResponse {
            error: Some(Error {
                r#type: ErrorType::SourceNotInGeometry as i32,
            }),
            properties: None,
        };
        let decoded = TimeFilterFastResponse::decode(response.encode_to_vec().as_slice()).unwrap();
        let kind = ErrorType::try_from(decoded.error.unwrap().r#type).unwrap();
        assert_eq!(kind, ErrorType::SourceNotInGeometry);
    }
}
