use super::canonical::{Property, PropertyId};

pub const MIN_MATCH_SCORE: u8 = 85;
pub const MAX_MATCH_SCORE: u8 = 98;
const SCORE_SPAN: u32 = (MAX_MATCH_SCORE - MIN_MATCH_SCORE) as u32 + 1;

/// Stable display score in `[85, 98]` derived from the digits of an identifier.
///
/// Non-digit characters are ignored, so the result depends only on the digit sum.
pub fn match_score(id: &PropertyId) -> u8 {
    let digit_sum: u32 = id
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .sum();
    MIN_MATCH_SCORE + (digit_sum % SCORE_SPAN) as u8
}

/// An upstream score wins over the derived one.
pub fn resolve_match_score(property: &Property) -> u8 {
    match property.upstream_score {
        Some(score) if score > 0 => score,
        _ => match_score(&property.id),
    }
}
