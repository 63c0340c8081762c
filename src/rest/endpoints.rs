//! TravelTime REST API endpoint constants.

/// Base URL for the TravelTime JSON API.
pub const DEFAULT_BASE_URL: &str = "https://api.traveltimeapp.com/v4";

/// Isochrone endpoints.
pub mod isochrones {
    /// Time-based isochrones.
    pub const TIME_MAP: &str = "/time-map";
    /// Fast time-based isochrones.
    pub const TIME_MAP_FAST: &str = "/time-map/fast";
    /// Distance-based isochrones.
    pub const DISTANCE_MAP: &str = "/distance-map";
}

/// Travel time matrix endpoints.
pub mod time_filter {
    /// Travel times between locations.
    pub const TIME_FILTER: &str = "/time-filter";
    /// Fast travel times between locations.
    pub const TIME_FILTER_FAST: &str = "/time-filter/fast";
    /// Reachable postcodes.
    pub const POSTCODES: &str = "/time-filter/postcodes";
    /// Reachable postcode districts.
    pub const POSTCODE_DISTRICTS: &str = "/time-filter/postcode-districts";
    /// Reachable postcode sectors.
    pub const POSTCODE_SECTORS: &str = "/time-filter/postcode-sectors";
}

/// Routing.
pub const ROUTES: &str = "/routes";

/// Geocoding endpoints.
pub mod geocoding {
    /// Forward geocoding.
    pub const SEARCH: &str = "/geocoding/search";
    /// Reverse geocoding.
    pub const REVERSE: &str = "/geocoding/reverse";
}

/// Supported maps and their features.
pub const MAP_INFO: &str = "/map-info";
/// Map lookup for a set of locations.
pub const SUPPORTED_LOCATIONS: &str = "/supported-locations";

/// Endpoints metered against the hits-per-minute budget.
const RATE_LIMITED: &[&str] = &[
    time_filter::TIME_FILTER,
    ROUTES,
    time_filter::POSTCODE_DISTRICTS,
    time_filter::POSTCODE_SECTORS,
    time_filter::POSTCODES,
    isochrones::TIME_MAP_FAST,
    time_filter::TIME_FILTER_FAST,
    isochrones::TIME_MAP,
    isochrones::DISTANCE_MAP,
];

/// Whether requests to `path` go through the rate limiter.
pub fn is_rate_limited(path: &str) -> bool {
    RATE_LIMITED.contains(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_endpoints() {
        assert!(is_rate_limited("/time-filter"));
        assert!(is_rate_limited("/time-filter/fast"));
        assert!(is_rate_limited("/distance-map"));
        assert!(!is_rate_limited("/map-info"));
        assert!(!is_rate_limited("/geocoding/search"));
        assert!(!is_rate_limited("/supported-locations"));
    }
}
