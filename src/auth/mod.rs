//! Authentication module for the TravelTime API.
//!
//! The JSON API authenticates with the `X-Application-Id` and `X-Api-Key`
//! headers; the protobuf API uses HTTP basic auth with the same pair.

mod credentials;

pub use credentials::{Credentials, CredentialsProvider, EnvCredentials, StaticCredentials};
