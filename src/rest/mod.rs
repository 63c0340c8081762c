//! TravelTime JSON REST API client.
//!
//! Provides access to the isochrone, matrix, routing, geocoding and map
//! endpoints of the TravelTime API.
//!
//! # Trait-based API
//!
//! The [`TravelTimeApi`] trait abstracts the single-request endpoints, so the
//! matrix flows in [`matrix`] can run against a mock implementation.
//!
//! ```rust,ignore
//! use traveltime_api_client::rest::TravelTimeApi;
//!
//! use traveltime_api_client::TravelTimeError;
//!
//! async fn use_client<C: TravelTimeApi>(client: &C) -> Result<(), TravelTimeError> {
//!     let maps = client.map_info().await?;
//!     println!("{} maps", maps.maps.len());
//!     Ok(())
//! }
//! ```

pub mod batch;
mod client;
pub mod endpoints;
pub(crate) mod gateway;
pub mod geocoding;
pub mod isochrones;
pub mod map_info;
pub mod matrix;
pub mod routes;
pub mod simple;
pub mod time_filter;
mod traits;

pub use batch::BatchResponse;
pub use client::{TravelTimeClient, TravelTimeClientBuilder};
pub use gateway::HitCost;
pub use traits::TravelTimeApi;
