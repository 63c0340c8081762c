//! TravelTime protobuf API client.
//!
//! The binary fast time-filter endpoint takes one origin and a list of
//! destinations encoded as fixed-point offsets, and answers with travel times
//! (and optionally distances) in destination order. It authenticates with HTTP
//! basic auth.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use traveltime_api_client::Coords;
//! use traveltime_api_client::auth::StaticCredentials;
//! use traveltime_api_client::proto::{
//!     ProtoCountry, ProtoTimeFilterFastRequest, ProtoTransportation, TravelTimeProtoClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TravelTimeProtoClient::builder()
//!         .credentials(Arc::new(StaticCredentials::new("app_id", "api_key")))
//!         .build()?;
//!
//!     let response = client
//!         .time_filter_fast(&ProtoTimeFilterFastRequest {
//!             country: ProtoCountry::Uk,
//!             departure_location: Coords::new(51.508, -0.128),
//!             destination_coordinates: vec![Coords::new(51.536, -0.153)],
//!             transportation: ProtoTransportation::PublicTransport,
//!             travel_time: 3600,
//!         })
//!         .await?;
//!     println!("{:?}", response.travel_times);
//!     Ok(())
//! }
//! ```

mod client;
mod types;
pub mod wire;

pub use client::{
    DEFAULT_PROTO_BASE_URL, DEFAULT_PROTO_DISTANCE_BASE_URL, TravelTimeProtoClient,
    TravelTimeProtoClientBuilder,
};
pub use types::{
    ProtoCountry, ProtoTimeFilterFastRequest, ProtoTimeFilterFastResponse, ProtoTransportation,
};
