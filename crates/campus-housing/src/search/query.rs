use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Upper bound sent when the user has not picked a price range.
pub const DEFAULT_MAX_PRICE: u32 = 3000;

/// Housing preferences as the search wizard collects them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceForm {
    pub location: String,
    pub price: String,
    pub bedrooms: String,
    pub amenities: Vec<String>,
}

impl PreferenceForm {
    pub fn price_range(&self) -> PriceRange {
        PriceRange::parse(&self.price)
    }

    pub fn has_content(&self) -> bool {
        !self.location.trim().is_empty() || !self.amenities.is_empty()
    }

    /// Reads a stored preference blob without trusting its shape.
    ///
    /// Amenities may be an array or a comma-separated string; bedrooms may be numeric.
    pub fn from_value(value: &Value) -> Self {
        Self {
            location: text_field(value.get("location")),
            price: text_field(value.get("price")),
            bedrooms: text_field(value.get("bedrooms")),
            amenities: match value.get("amenities") {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
                Some(Value::String(joined)) => split_amenities(joined),
                _ => Vec::new(),
            },
        }
    }

    /// Query string handed to the results page: amenities travel comma-joined.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("location", &self.location)
            .append_pair("price", &self.price)
            .append_pair("bedrooms", &self.bedrooms)
            .append_pair("amenities", &self.amenities.join(","))
            .finish()
    }
}

/// Results-page query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub location: Option<String>,
    pub price: Option<String>,
    pub bedrooms: Option<String>,
    pub amenities: Option<String>,
}

impl From<SearchParams> for PreferenceForm {
    fn from(params: SearchParams) -> Self {
        Self {
            location: params.location.unwrap_or_default(),
            price: params.price.unwrap_or_default(),
            bedrooms: params.bedrooms.unwrap_or_default(),
            amenities: params
                .amenities
                .as_deref()
                .map(split_amenities)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceRange {
    Any,
    Between { min: u32, max: u32 },
    AtLeast(u32),
    Unrecognized(String),
}

impl PriceRange {
    /// Accepts `"500-1000"`, `"2000+"`, or an empty string.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Any;
        }
        if let Some(min) = raw.strip_suffix('+') {
            if let Ok(min) = min.trim().parse() {
                return Self::AtLeast(min);
            }
        }
        if let Some((min, max)) = raw.split_once('-') {
            if let (Ok(min), Ok(max)) = (min.trim().parse(), max.trim().parse()) {
                return Self::Between { min, max };
            }
        }
        Self::Unrecognized(raw.to_string())
    }

    pub fn max_price(&self) -> Option<u32> {
        match self {
            Self::Any => Some(DEFAULT_MAX_PRICE),
            Self::Between { max, .. } => Some(*max),
            Self::AtLeast(_) | Self::Unrecognized(_) => None,
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any price"),
            Self::Between { min, max } => write!(f, "${min} - ${max}"),
            Self::AtLeast(min) => write!(f, "${min}+"),
            Self::Unrecognized(raw) => write!(f, "${raw}"),
        }
    }
}

/// Request body for the external listing-search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
    pub bedrooms: String,
    pub amenities: Vec<String>,
    pub proximity_landmark: String,
}

impl SearchQuery {
    pub fn from_preferences(form: &PreferenceForm) -> Self {
        Self {
            location: form.location.clone(),
            max_price: form.price_range().max_price(),
            bedrooms: form.bedrooms.clone(),
            amenities: form.amenities.clone(),
            proximity_landmark: form.location.clone(),
        }
    }
}

fn split_amenities(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}
