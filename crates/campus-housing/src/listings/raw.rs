//! Untrusted listing records as the search backend returns them.
//!
//! Every field is optional and parsed leniently: a field with an unexpected type is
//! treated as absent rather than failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::canonical::PropertyId;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExternalListing {
    #[serde(deserialize_with = "identifier")]
    pub property_id: Option<PropertyId>,
    #[serde(deserialize_with = "lenient")]
    pub primary_photo: Option<RawPhoto>,
    #[serde(deserialize_with = "string_list")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "number")]
    pub list_price: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub href: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<RawDescription>,
    #[serde(deserialize_with = "lenient")]
    pub location: Option<RawLocation>,
    #[serde(deserialize_with = "number")]
    pub ai_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawPhoto {
    #[serde(deserialize_with = "lenient")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawDescription {
    #[serde(deserialize_with = "number")]
    pub beds: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub baths: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub baths_full: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub baths_half: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub sqft: Option<f64>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawLocation {
    #[serde(deserialize_with = "lenient")]
    pub address: Option<RawAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawAddress {
    #[serde(deserialize_with = "lenient")]
    pub line: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub state_code: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub coordinate: Option<RawCoordinate>,
}

/// Upstream sources disagree on the longitude key, so both spellings are kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawCoordinate {
    #[serde(deserialize_with = "number")]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub lng: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub lon: Option<f64>,
}

impl ExternalListing {
    pub fn coordinate(&self) -> Option<&RawCoordinate> {
        self.address()?.coordinate.as_ref()
    }

    pub fn address(&self) -> Option<&RawAddress> {
        self.location.as_ref()?.address.as_ref()
    }
}

/// The search backend answered with something other than a listing array.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UpstreamPayloadError {
    pub message: String,
}

const UNEXPECTED_FORMAT: &str = "Unexpected response format";

/// Splits a search response into listing records.
///
/// Non-object array entries are skipped. A non-array payload is an error whose message
/// is the payload's `error` string when it carries one.
pub fn parse_listing_payload(payload: Value) -> Result<Vec<ExternalListing>, UpstreamPayloadError> {
    let entries = match payload {
        Value::Array(entries) => entries,
        other => {
            let message = other
                .get("error")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .unwrap_or(UNEXPECTED_FORMAT)
                .to_string();
            return Err(UpstreamPayloadError { message });
        }
    };

    let mut listings = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            warn!(index, "skipping listing entry that is not an object");
            continue;
        }
        match ExternalListing::deserialize(entry) {
            Ok(listing) => listings.push(listing),
            Err(err) => warn!(index, error = %err, "skipping unreadable listing entry"),
        }
    }

    Ok(listings)
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

fn identifier<'de, D>(deserializer: D) -> Result<Option<PropertyId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(PropertyId::Text(text)),
        Value::Number(number) => Some(match number.as_i64() {
            Some(whole) => PropertyId::Number(whole),
            None => PropertyId::Text(number.to_string()),
        }),
        _ => None,
    })
}

fn string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}
