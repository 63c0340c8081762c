//! Custom serde helpers for TravelTime's query-string and response formats.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a list as a single comma-separated string.
///
/// Geocoding takes its country filter as `within.country=gbr,nld`.
///
/// # Example
///
/// ```rust
/// use serde::Serialize;
/// use traveltime_api_client::types::serde_helpers::comma_separated;
///
/// #[derive(Serialize)]
/// struct Query {
///     #[serde(serialize_with = "comma_separated::serialize")]
///     countries: Vec<String>,
/// }
///
/// let query = Query { countries: vec!["gbr".into(), "nld".into()] };
/// assert_eq!(serde_urlencoded::to_string(&query).unwrap(), "countries=gbr%2Cnld");
/// ```
pub mod comma_separated {
    use super::*;

    /// Serialize a slice as a comma-separated string.
    pub fn serialize<T, S>(values: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        let joined = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        serializer.serialize_str(&joined)
    }
}

/// Optional variant of [`comma_separated`]. `None` and empty lists are skipped
/// when combined with `skip_serializing_if = "Option::is_none"`.
pub mod optional_comma_separated {
    use super::*;

    /// Serialize an `Option<Vec<T>>` as a comma-separated string.
    pub fn serialize<T, S>(values: &Option<Vec<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match values {
            Some(values) => comma_separated::serialize(values, serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// Deserialize to `None` instead of failing on unexpected data.
///
/// Geocoding feature properties are loosely typed; a field the client cannot
/// read should not fail the whole response.
pub mod default_on_error {
    use super::*;

    /// Deserialize a value, returning `None` if deserialization fails.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(T::deserialize(value).ok())
    }
}

/// Deserialize empty strings as `None`.
pub mod empty_string_as_none {
    use super::*;

    /// Deserialize a string, returning `None` if empty.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_comma_separated_query() {
        #[derive(Serialize)]
        struct Query {
            #[serde(
                rename = "within.country",
                serialize_with = "optional_comma_separated::serialize",
                skip_serializing_if = "Option::is_none"
            )]
            within_country: Option<Vec<String>>,
        }

        let query = Query {
            within_country: Some(vec!["gbr".into(), "nld".into()]),
        };
        assert_eq!(
            serde_urlencoded::to_string(&query).unwrap(),
            "within.country=gbr%2Cnld"
        );
        let query = Query {
            within_country: None,
        };
        assert_eq!(serde_urlencoded::to_string(&query).unwrap(), "");
    }

    #[test]
    fn test_default_on_error() {
        #[derive(Deserialize, Debug)]
        struct Properties {
            #[serde(deserialize_with = "default_on_error::deserialize", default)]
            score: Option<f64>,
        }

        let props: Properties = serde_json::from_str(r#"{"score":"n/a"}"#).unwrap();
        assert!(props.score.is_none());
        let props: Properties = serde_json::from_str(r#"{"score":0.5}"#).unwrap();
        assert_eq!(props.score, Some(0.5));
    }

    #[test]
    fn test_empty_string_as_none() {
        #[derive(Deserialize, Debug)]
        struct Properties {
            #[serde(deserialize_with = "empty_string_as_none::deserialize", default)]
            postcode: Option<String>,
        }

        let props: Properties = serde_json::from_str(r#"{"postcode":""}"#).unwrap();
        assert!(props.postcode.is_none());
        let props: Properties = serde_json::from_str(r#"{"postcode":"SW1A"}"#).unwrap();
        assert_eq!(props.postcode.as_deref(), Some("SW1A"));
    }
}
