//! Turning wizard preferences into a ranked listing search.

pub mod query;
pub mod service;
pub mod source;

pub use query::{PreferenceForm, PriceRange, SearchParams, SearchQuery, DEFAULT_MAX_PRICE};
pub use service::{SearchOutcome, SearchService};
pub use source::{HttpListingSource, ListingSource, MockListingSource, SearchError};
