use serde::Serialize;

use super::domain::PreferenceFilter;
use super::store::{PreferenceStore, StoreError};
use crate::search::{PreferenceForm, PriceRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Recent,
    Popular,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceSuggestion {
    pub kind: SuggestionKind,
    pub label: String,
    pub summary: String,
    pub preferences: PreferenceForm,
}

impl PreferenceSuggestion {
    fn from_form(kind: SuggestionKind, preferences: PreferenceForm) -> Self {
        let label = if preferences.location.trim().is_empty() {
            "Previous Search".to_string()
        } else {
            preferences.location.clone()
        };
        Self {
            kind,
            label,
            summary: summary_line(&preferences),
            preferences,
        }
    }
}

/// The newest stored search with a location or amenities, then the popular presets.
pub fn suggested_preferences(
    store: &dyn PreferenceStore,
) -> Result<Vec<PreferenceSuggestion>, StoreError> {
    let recent = store
        .list(&PreferenceFilter::all())?
        .iter()
        .map(|record| PreferenceForm::from_value(&record.data))
        .find(PreferenceForm::has_content)
        .map(|form| PreferenceSuggestion::from_form(SuggestionKind::Recent, form));

    let mut suggestions: Vec<_> = recent.into_iter().collect();
    suggestions.extend(
        popular_presets()
            .into_iter()
            .map(|form| PreferenceSuggestion::from_form(SuggestionKind::Popular, form)),
    );
    Ok(suggestions)
}

pub fn popular_presets() -> Vec<PreferenceForm> {
    let preset = |location: &str, price: &str, bedrooms: &str, amenities: &[&str]| {
        PreferenceForm {
            location: location.to_string(),
            price: price.to_string(),
            bedrooms: bedrooms.to_string(),
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
        }
    };
    vec![
        preset(
            "Boston University",
            "1200-2500",
            "1",
            &["laundry", "ac", "furnished", "wifi"],
        ),
        preset(
            "Northeastern University",
            "1500-3000",
            "2",
            &["parking", "gym", "ac", "pets"],
        ),
    ]
}

pub fn bedrooms_label(bedrooms: &str) -> String {
    match bedrooms.trim() {
        "" => String::new(),
        "0" => "Studio".to_string(),
        "1" => "1 Bedroom".to_string(),
        other => format!("{other} Bedrooms"),
    }
}

/// `1 Bedroom • $1200 - $2500 • 4 amenities`; empty parts are left out.
fn summary_line(form: &PreferenceForm) -> String {
    let mut parts = Vec::new();
    let bedrooms = bedrooms_label(&form.bedrooms);
    if !bedrooms.is_empty() {
        parts.push(bedrooms);
    }
    let price = form.price_range();
    if price != PriceRange::Any {
        parts.push(price.label());
    }
    match form.amenities.len() {
        0 => {}
        1 => parts.push("1 amenity".to_string()),
        count => parts.push(format!("{count} amenities")),
    }
    parts.join(" \u{2022} ")
}
