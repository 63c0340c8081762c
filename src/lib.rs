//! # TravelTime Client
//!
//! An async Rust client library for the TravelTime isochrone, matrix, routing and
//! geocoding APIs.
//!
//! ## Features
//!
//! - JSON REST client covering time-map, distance-map, time-filter, routes and geocoding
//! - Binary (protobuf) client for the fast time-filter endpoint
//! - Built-in hits-per-minute rate limiting with 429 retry, shared by both clients
//! - Many-to-many matrix helpers that split large queries and reassemble the results
//! - Partial-failure tolerant batch calls
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use traveltime_api_client::auth::StaticCredentials;
//! use traveltime_api_client::rest::TravelTimeClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TravelTimeClient::builder()
//!         .credentials(Arc::new(StaticCredentials::new("app_id", "api_key")))
//!         .build()?;
//!     let info = client.map_info().await?;
//!     println!("Maps: {}", info.maps.len());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod proto;
pub mod rate_limit;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use error::TravelTimeError;
pub use rate_limit::{RateLimitSettings, RateLimitSettingsUpdate, RateLimiter};
pub use types::common::{Coords, Location};

/// Result type alias using TravelTimeError
pub type Result<T> = std::result::Result<T, TravelTimeError>;
