//! Types for the geocoding endpoints.

use serde::{Deserialize, Serialize};

use crate::types::serde_helpers::{default_on_error, empty_string_as_none, optional_comma_separated};
use crate::types::{Coords, MapFeatures};

/// Location types that can be excluded from geocoding results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcludeLocationType {
    Country,
}

/// Rectangle restricting geocoding results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodingBounds {
    pub south_east: Coords,
    pub north_west: Coords,
}

impl GeocodingBounds {
    /// Query form: `seLat,seLng,nwLat,nwLng`.
    pub fn to_query_value(&self) -> String {
        format!(
            "{},{},{},{}",
            self.south_east.lat, self.south_east.lng, self.north_west.lat, self.north_west.lng
        )
    }
}

/// Optional parameters of a forward geocoding search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodingOptions {
    /// `Accept-Language` header value.
    pub accept_language: Option<String>,
    /// Restrict results to these countries (ISO 3166 alpha-2 or alpha-3).
    pub within_country: Option<Vec<String>>,
    pub exclude_location_types: Option<ExcludeLocationType>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Add a postcode to results that lack one.
    pub force_add_postcode: Option<bool>,
    pub bounds: Option<GeocodingBounds>,
}

impl GeocodingOptions {
    /// Set the response language.
    pub fn accept_language(mut self, language: impl Into<String>) -> Self {
        self.accept_language = Some(language.into());
        self
    }

    /// Restrict results to the given countries.
    pub fn within_country<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.within_country = Some(countries.into_iter().map(Into::into).collect());
        self
    }

    /// Limit the number of results.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict results to a rectangle.
    pub fn bounds(mut self, bounds: GeocodingBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Query string of `/geocoding/search`.
#[derive(Debug, Serialize)]
pub(crate) struct SearchQuery<'a> {
    pub query: &'a str,
    #[serde(
        rename = "within.country",
        serialize_with = "optional_comma_separated::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub within_country: Option<Vec<String>>,
    #[serde(rename = "exclude.location.types", skip_serializing_if = "Option::is_none")]
    pub exclude_location_types: Option<ExcludeLocationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "force.add.postcode", skip_serializing_if = "Option::is_none")]
    pub force_add_postcode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<String>,
}

impl<'a> SearchQuery<'a> {
    pub fn new(query: &'a str, options: &GeocodingOptions) -> Self {
        Self {
            query,
            within_country: options.within_country.clone(),
            exclude_location_types: options.exclude_location_types,
            limit: options.limit,
            force_add_postcode: options.force_add_postcode,
            bounds: options.bounds.as_ref().map(GeocodingBounds::to_query_value),
        }
    }
}

/// GeoJSON point. Coordinates are `[lng, lat]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    /// The point as [`Coords`].
    pub fn coords(&self) -> Coords {
        Coords::new(self.coordinates[1], self.coordinates[0])
    }
}

/// Properties of a geocoding result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodingProperties {
    pub name: String,
    pub label: String,
    #[serde(default, deserialize_with = "default_on_error::deserialize")]
    pub score: Option<f64>,
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub macroregion: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub postcode: Option<String>,
    #[serde(default)]
    pub features: Option<MapFeatures>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodingFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: GeocodingProperties,
}

/// Response of both geocoding endpoints (a GeoJSON feature collection).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodingResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<GeocodingFeature>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_encoding() {
        let options = GeocodingOptions::default()
            .within_country(["gbr", "nld"])
            .limit(3)
            .bounds(GeocodingBounds {
                south_east: Coords::new(51.0, 1.0),
                north_west: Coords::new(52.0, -1.0),
            });
        let query =
            serde_urlencoded::to_string(SearchQuery::new("Parliament Square", &options)).unwrap();
        assert_eq!(
            query,
            "query=Parliament+Square&within.country=gbr%2Cnld&limit=3&bounds=51%2C1%2C52%2C-1"
        );
    }

    #[test]
    fn test_geocoding_response() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-0.1276, 51.5007]},
                "properties": {"name": "Parliament Square", "label": "Parliament Square, London", "score": "n/a", "postcode": ""}
            }]
        }"#;
        let response: GeocodingResponse = serde_json::from_str(body).unwrap();
        let feature = &response.features[0];
        assert_eq!(feature.geometry.coords(), Coords::new(51.5007, -0.1276));
        assert!(feature.properties.score.is_none());
        assert!(feature.properties.postcode.is_none());
    }
}
