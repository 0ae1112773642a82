use serde::{Deserialize, Serialize};
use std::fmt;

use super::labels::{amenity_label, listing_title, monthly_price};
use super::raw::{ExternalListing, RawAddress};

/// Fallback coordinate (Washington, DC) for listings without a position.
pub const DEFAULT_LAT: f64 = 38.8936;
pub const DEFAULT_LNG: f64 = -77.0725;

pub const DEFAULT_PROPERTY_TYPE: &str = "Rental";
pub const MAX_TAGS: usize = 3;

/// Listing identity as the upstream source provided it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyId {
    Number(i64),
    Text(String),
}

impl PropertyId {
    pub fn is_blank(&self) -> bool {
        matches!(self, PropertyId::Text(text) if text.is_empty())
    }
}

impl Default for PropertyId {
    fn default() -> Self {
        PropertyId::Text(String::new())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyId::Number(value) => write!(f, "{value}"),
            PropertyId::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for PropertyId {
    fn from(value: &str) -> Self {
        PropertyId::Text(value.to_string())
    }
}

impl From<i64> for PropertyId {
    fn from(value: i64) -> Self {
        PropertyId::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    pub image: String,
    pub price: String,
    pub location: PropertyLocation,
    pub description: PropertyDescription,
    pub tags: Vec<String>,
    pub href: String,
    #[serde(
        rename = "ai_score",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub upstream_score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: PropertyAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAddress {
    pub line: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescription {
    pub beds: f64,
    pub baths: f64,
    pub sqft: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Where a listing link should open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "href", rename_all = "snake_case")]
pub enum LinkTarget {
    External(String),
    Internal(String),
}

impl Property {
    pub fn link_target(&self) -> LinkTarget {
        if self.href.starts_with("http") {
            LinkTarget::External(self.href.clone())
        } else {
            LinkTarget::Internal(self.href.clone())
        }
    }
}

impl PropertyAddress {
    /// Short form used on cards and in interaction tracking: `line, city`.
    pub fn display_line(&self) -> String {
        match (self.line.is_empty(), self.city.is_empty()) {
            (false, false) => format!("{}, {}", self.line, self.city),
            (false, true) => self.line.clone(),
            (true, false) => self.city.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Maps an upstream record onto the canonical property shape, defaulting anything missing.
pub fn canonicalize(raw: &ExternalListing) -> Property {
    let description = raw.description.clone().unwrap_or_default();
    let kind = description
        .kind
        .unwrap_or_else(|| DEFAULT_PROPERTY_TYPE.to_string());
    let beds = description.beds.unwrap_or(0.0);

    let full_baths = whole_count(description.baths_full);
    let half_baths = whole_count(description.baths_half);
    let baths = full_baths + half_baths * 0.5;

    let coordinate = raw.coordinate();
    let lat = coordinate.and_then(|c| c.lat).unwrap_or(DEFAULT_LAT);
    let lng = coordinate
        .and_then(|c| c.lon.or(c.lng))
        .unwrap_or(DEFAULT_LNG);

    let tags = raw
        .tags
        .as_deref()
        .unwrap_or_default()
        .iter()
        .take(MAX_TAGS)
        .map(|code| amenity_label(code))
        .collect();

    Property {
        id: raw.property_id.clone().unwrap_or_default(),
        title: listing_title(beds, &kind),
        image: raw
            .primary_photo
            .as_ref()
            .and_then(|photo| photo.href.clone())
            .unwrap_or_default(),
        price: monthly_price(raw.list_price.unwrap_or(0.0)),
        location: PropertyLocation {
            lat,
            lng,
            address: address_from(raw.address()),
        },
        description: PropertyDescription {
            beds,
            baths,
            sqft: description.sqft.unwrap_or(0.0),
            kind,
        },
        tags,
        href: raw.href.clone().unwrap_or_default(),
        upstream_score: upstream_score(raw.ai_score),
    }
}

pub fn canonicalize_all(raw: &[ExternalListing]) -> Vec<Property> {
    raw.iter().map(canonicalize).collect()
}

fn address_from(raw: Option<&RawAddress>) -> PropertyAddress {
    let Some(raw) = raw else {
        return PropertyAddress::default();
    };
    PropertyAddress {
        line: raw.line.clone().unwrap_or_default(),
        city: raw.city.clone().unwrap_or_default(),
        state: raw.state_code.clone().unwrap_or_default(),
        postal_code: raw.postal_code.clone().unwrap_or_default(),
    }
}

fn whole_count(value: Option<f64>) -> f64 {
    value.map(|count| count.max(0.0).floor()).unwrap_or(0.0)
}

fn upstream_score(value: Option<f64>) -> Option<u8> {
    value
        .filter(|score| score.fract() == 0.0 && (1.0..=100.0).contains(score))
        .map(|score| score as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing(value: serde_json::Value) -> ExternalListing {
        serde_json::from_value(value).expect("listing parses")
    }

    #[test]
    fn missing_coordinate_uses_fallback_position() {
        let property = canonicalize(&listing(json!({
            "property_id": "77",
            "location": { "address": { "line": "1 Main St", "city": "Washington" } }
        })));

        assert_eq!(property.location.lat, DEFAULT_LAT);
        assert_eq!(property.location.lng, DEFAULT_LNG);
        assert_eq!(property.location.address.line, "1 Main St");
    }

    #[test]
    fn longitude_prefers_lon_then_lng() {
        let only_lon = canonicalize(&listing(json!({
            "location": { "address": { "coordinate": { "lat": 42.35, "lon": -71.05 } } }
        })));
        assert_eq!(only_lon.location.lng, -71.05);

        let only_lng = canonicalize(&listing(json!({
            "location": { "address": { "coordinate": { "lat": 42.35, "lng": -71.12 } } }
        })));
        assert_eq!(only_lng.location.lng, -71.12);

        let both = canonicalize(&listing(json!({
            "location": { "address": { "coordinate": { "lon": -71.05, "lng": -71.12 } } }
        })));
        assert_eq!(both.location.lng, -71.05);
        assert_eq!(both.location.lat, DEFAULT_LAT);
    }

    #[test]
    fn tags_are_truncated_and_humanized() {
        let property = canonicalize(&listing(json!({
            "tags": ["central_air", "pets_allowed", "garage_1_or_more", "extra_tag"]
        })));

        assert_eq!(
            property.tags,
            vec!["Central Air", "Pets Allowed", "Garage 1 Or More"]
        );
    }

    #[test]
    fn empty_record_gets_documented_defaults() {
        let property = canonicalize(&ExternalListing::default());

        assert!(property.id.is_blank());
        assert_eq!(property.title, "0BR Rental");
        assert_eq!(property.image, "");
        assert_eq!(property.price, "$0/mo");
        assert_eq!(property.description.baths, 0.0);
        assert_eq!(property.description.kind, "Rental");
        assert!(property.tags.is_empty());
        assert_eq!(property.href, "");
        assert_eq!(property.location.address, PropertyAddress::default());
        assert!(property.upstream_score.is_none());
    }

    #[test]
    fn bath_total_counts_half_baths() {
        let property = canonicalize(&listing(json!({
            "description": { "beds": 2, "baths": 3, "baths_full": 2, "baths_half": 1, "type": "condos" },
            "list_price": 4000
        })));

        assert_eq!(property.title, "2BR Condos");
        assert_eq!(property.description.baths, 2.5);
        assert_eq!(property.price, "$4000/mo");

        let odd = canonicalize(&listing(json!({
            "description": { "baths_full": -1, "baths_half": 1.7 }
        })));
        assert_eq!(odd.description.baths, 0.5);
    }

    #[test]
    fn upstream_score_kept_only_when_usable() {
        let scored = canonicalize(&listing(json!({ "ai_score": 93 })));
        assert_eq!(scored.upstream_score, Some(93));

        for value in [json!(0), json!("N/A"), json!(140), json!(88.5)] {
            let property = canonicalize(&listing(json!({ "ai_score": value })));
            assert!(property.upstream_score.is_none());
        }
    }

    #[test]
    fn link_target_follows_http_prefix() {
        let external = canonicalize(&listing(json!({
            "href": "https://www.realtor.com/rentals/details/1451-Belmont-St-NW"
        })));
        assert!(matches!(external.link_target(), LinkTarget::External(_)));

        let internal = canonicalize(&listing(json!({ "href": "/listings/12345" })));
        assert_eq!(
            internal.link_target(),
            LinkTarget::Internal("/listings/12345".to_string())
        );
    }

    #[test]
    fn numeric_ids_display_as_digits() {
        let property = canonicalize(&listing(json!({ "property_id": 12345 })));
        assert_eq!(property.id, PropertyId::Number(12345));
        assert_eq!(property.id.to_string(), "12345");
    }
}
