//! Types for `/map-info` and `/supported-locations`.

use serde::{Deserialize, Serialize};

use crate::rest::gateway::HitCost;
use crate::types::{Location, MapFeatures};

/// One map the account has access to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapInfo {
    pub name: String,
    pub features: MapFeatures,
}

/// Response of `/map-info`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapInfoResponse {
    pub maps: Vec<MapInfo>,
}

impl MapInfoResponse {
    /// Look up a map by name.
    pub fn map(&self, name: &str) -> Option<&MapInfo> {
        self.maps.iter().find(|map| map.name == name)
    }
}

/// Request body for `/supported-locations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupportedLocationsRequest {
    pub locations: Vec<Location>,
}

impl HitCost for SupportedLocationsRequest {
    fn hits(&self) -> u32 {
        0
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupportedLocation {
    pub id: String,
    pub map_name: String,
    #[serde(default)]
    pub additional_map_names: Vec<String>,
}

/// Response of `/supported-locations`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupportedLocationsResponse {
    pub locations: Vec<SupportedLocation>,
    /// Ids of locations outside every supported map.
    pub unsupported_locations: Vec<String>,
}
