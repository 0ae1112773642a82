use serde::Serialize;

use super::canonical::Property;
use super::scoring::resolve_match_score;

/// Listings scoring at or above this are presented as top matches.
pub const TOP_MATCH_THRESHOLD: u8 = 90;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProperty {
    #[serde(flatten)]
    pub property: Property,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

impl ScoredProperty {
    pub fn is_top_match(&self) -> bool {
        self.match_score >= TOP_MATCH_THRESHOLD
    }
}

/// Scored listings split at [`TOP_MATCH_THRESHOLD`], each half ordered by descending score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedListings {
    pub top_matches: Vec<ScoredProperty>,
    pub others: Vec<ScoredProperty>,
}

impl RankedListings {
    pub fn len(&self) -> usize {
        self.top_matches.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_matches.is_empty() && self.others.is_empty()
    }

    /// All listings in ranked order.
    pub fn iter(&self) -> impl Iterator<Item = &ScoredProperty> {
        self.top_matches.iter().chain(self.others.iter())
    }
}

pub fn assemble(properties: Vec<Property>) -> RankedListings {
    let mut scored: Vec<ScoredProperty> = properties
        .into_iter()
        .map(|property| {
            let match_score = resolve_match_score(&property);
            ScoredProperty {
                property,
                match_score,
            }
        })
        .collect();

    // stable: equal scores keep source order
    scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    let (top_matches, others): (Vec<_>, Vec<_>) =
        scored.into_iter().partition(ScoredProperty::is_top_match);
    RankedListings {
        top_matches,
        others,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::canonical::{canonicalize, PropertyId};
    use crate::listings::raw::ExternalListing;

    fn property(id: &str) -> Property {
        let mut property = canonicalize(&ExternalListing::default());
        property.id = PropertyId::from(id);
        property
    }

    fn ids(listings: &[ScoredProperty]) -> Vec<String> {
        listings
            .iter()
            .map(|listing| listing.property.id.to_string())
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_sections() {
        let ranked = assemble(Vec::new());
        assert!(ranked.top_matches.is_empty());
        assert!(ranked.others.is_empty());
        assert!(ranked.is_empty());
    }

    #[test]
    fn higher_digit_sum_ranks_first() {
        let ranked = assemble(vec![property("1"), property("9")]);

        assert_eq!(ids(&ranked.top_matches), vec!["9"]);
        assert_eq!(ids(&ranked.others), vec!["1"]);
        assert_eq!(ranked.top_matches[0].match_score, 94);
        assert_eq!(ranked.others[0].match_score, 86);
        let ordered: Vec<_> = ranked.iter().map(|l| l.property.id.to_string()).collect();
        assert_eq!(ordered, vec!["9", "1"]);
    }

    #[test]
    fn threshold_is_inclusive() {
        // "5" -> 90, "4" -> 89
        let ranked = assemble(vec![property("4"), property("5")]);
        assert_eq!(ids(&ranked.top_matches), vec!["5"]);
        assert_eq!(ids(&ranked.others), vec!["4"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = assemble(vec![property("12345"), property("54321"), property("0")]);
        assert_eq!(ids(&ranked.others), vec!["12345", "54321", "0"]);
        assert!(ranked.top_matches.is_empty());
    }

    #[test]
    fn serializes_with_match_score_alongside_property_fields() {
        let ranked = assemble(vec![property("9")]);
        let value = serde_json::to_value(&ranked).expect("serializes");

        let top = &value["topMatches"][0];
        assert_eq!(top["id"], "9");
        assert_eq!(top["matchScore"], 94);
        assert_eq!(top["title"], "0BR Rental");
        assert!(value["others"].as_array().expect("array").is_empty());
    }
}
