use std::sync::Arc;

use tracing::{info, warn};

use super::query::{PreferenceForm, SearchQuery};
use super::source::{HttpListingSource, ListingSource, MockListingSource, SearchError};
use crate::config::SearchConfig;
use crate::listings::{assemble, canonicalize_all, RankedListings};
use crate::preferences::{AutoSaver, SearchSummary};

/// What a results page needs: the query sent, its price label, and ranked listings.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: SearchQuery,
    pub price_label: String,
    pub listings: RankedListings,
    /// Set when the listing source failed and the empty result stands in for it.
    pub degraded: bool,
}

/// Runs a search end to end: query building, fetch, canonicalization, ranking.
#[derive(Clone)]
pub struct SearchService {
    source: Arc<dyn ListingSource>,
    autosave: Option<AutoSaver>,
}

impl SearchService {
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self {
            source,
            autosave: None,
        }
    }

    /// Uses the configured endpoint, or the bundled sample listings when none is set.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let source: Arc<dyn ListingSource> = match &config.endpoint {
            Some(endpoint) => {
                info!(%endpoint, "using external listing search");
                Arc::new(HttpListingSource::new(endpoint.clone(), config.timeout)?)
            }
            None => {
                info!("no listing search endpoint configured; serving bundled listings");
                Arc::new(MockListingSource::bundled()?)
            }
        };
        Ok(Self::new(source))
    }

    pub fn with_autosave(mut self, autosave: AutoSaver) -> Self {
        self.autosave = Some(autosave);
        self
    }

    pub async fn search(&self, form: &PreferenceForm) -> SearchOutcome {
        let query = SearchQuery::from_preferences(form);
        let price_label = form.price_range().label();

        let (listings, degraded) = match self.source.search(&query).await {
            Ok(raw) => (assemble(canonicalize_all(&raw)), false),
            Err(err) => {
                warn!(error = %err, location = %query.location, "listing search failed");
                (RankedListings::default(), true)
            }
        };

        if !degraded {
            if let Some(autosave) = &self.autosave {
                let summary = SearchSummary {
                    result_count: listings.len(),
                    formatted_price: price_label.clone(),
                    top_matches_count: listings.top_matches.len(),
                };
                // Detached; the outcome does not wait on the write.
                drop(autosave.track_search(&query, &summary));
            }
        }

        SearchOutcome {
            query,
            price_label,
            listings,
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{InMemoryPreferenceStore, PreferenceFilter, PreferenceStore};
    use serde_json::json;
    use std::time::Duration;

    fn form() -> PreferenceForm {
        PreferenceForm {
            location: "Boston University".to_string(),
            price: "1000-2500".to_string(),
            bedrooms: "1".to_string(),
            amenities: vec!["laundry".to_string()],
        }
    }

    #[tokio::test]
    async fn bundled_search_ranks_listings() {
        let service = SearchService::new(Arc::new(MockListingSource::bundled().expect("fixture")));

        let outcome = service.search(&form()).await;

        assert!(!outcome.degraded);
        assert_eq!(outcome.price_label, "$1000 - $2500");
        assert_eq!(outcome.query.max_price, Some(2500));
        assert_eq!(outcome.listings.len(), 7);
        assert_eq!(outcome.listings.top_matches.len(), 3);
        assert!(outcome
            .listings
            .top_matches
            .iter()
            .all(|listing| listing.match_score >= 90));
    }

    #[tokio::test]
    async fn upstream_errors_degrade_to_empty_results() {
        let store = Arc::new(InMemoryPreferenceStore::default());
        let source = MockListingSource::from_payload(json!({ "error": "upstream down" }));
        let service =
            SearchService::new(Arc::new(source)).with_autosave(AutoSaver::new(store.clone()));

        let outcome = service.search(&form()).await;

        assert!(outcome.degraded);
        assert!(outcome.listings.is_empty());
        tokio::task::yield_now().await;
        assert!(store.is_empty(), "failed searches are not tracked");
    }

    #[tokio::test]
    async fn successful_search_is_tracked_in_background() {
        let store = Arc::new(InMemoryPreferenceStore::default());
        let source = MockListingSource::bundled().expect("fixture");
        let service =
            SearchService::new(Arc::new(source)).with_autosave(AutoSaver::new(store.clone()));

        service.search(&form()).await;

        let mut waited = Duration::ZERO;
        while store.is_empty() && waited < Duration::from_secs(2) {
            tokio::time::sleep(Duration::from_millis(10)).await;
            waited += Duration::from_millis(10);
        }

        let records = store.list(&PreferenceFilter::all()).expect("list");
        assert_eq!(records.len(), 1);
        assert!(records[0].is_auto_save);
        assert_eq!(records[0].data["queryType"], "search");
        assert_eq!(records[0].data["results"]["resultCount"], 7);
        assert_eq!(records[0].data["results"]["topMatchesCount"], 3);
        assert_eq!(records[0].data["results"]["formattedPrice"], "$1000 - $2500");
    }

    #[test]
    fn config_without_endpoint_uses_bundled_listings() {
        let config = SearchConfig {
            endpoint: None,
            timeout: Duration::from_secs(10),
        };
        assert!(SearchService::from_config(&config).is_ok());
    }
}
