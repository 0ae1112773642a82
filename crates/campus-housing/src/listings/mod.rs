//! Listing normalization and ranking: upstream records in, ranked canonical properties out.

mod assembler;
mod canonical;
mod labels;
mod raw;
mod scoring;

pub use assembler::{assemble, RankedListings, ScoredProperty, TOP_MATCH_THRESHOLD};
pub use canonical::{
    canonicalize, canonicalize_all, LinkTarget, Property, PropertyAddress, PropertyDescription,
    PropertyId, PropertyLocation, DEFAULT_LAT, DEFAULT_LNG, DEFAULT_PROPERTY_TYPE, MAX_TAGS,
};
pub use raw::{
    parse_listing_payload, ExternalListing, RawAddress, RawCoordinate, RawDescription,
    RawLocation, RawPhoto, UpstreamPayloadError,
};
pub use scoring::{match_score, resolve_match_score, MAX_MATCH_SCORE, MIN_MATCH_SCORE};
