//! Common types used across the TravelTime client library.

pub mod common;
pub mod serde_helpers;

pub use common::*;
