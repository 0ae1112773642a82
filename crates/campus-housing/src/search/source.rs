use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::query::SearchQuery;
use crate::listings::{parse_listing_payload, ExternalListing, UpstreamPayloadError};

const BUNDLED_LISTINGS: &str = include_str!("../../fixtures/mock_listings.json");

/// Anything that can answer a listing search with raw upstream records.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ExternalListing>, SearchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("listing search request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("listing search returned an error: {0}")]
    Upstream(#[from] UpstreamPayloadError),
    #[error("bundled listings are unreadable: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Posts the query as JSON to an external search endpoint.
#[derive(Debug, Clone)]
pub struct HttpListingSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpListingSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ExternalListing>, SearchError> {
        // Error bodies are JSON objects too, so the status code is not consulted.
        let payload: Value = self
            .client
            .post(&self.endpoint)
            .json(query)
            .send()
            .await?
            .json()
            .await?;
        let listings = parse_listing_payload(payload)?;
        debug!(endpoint = %self.endpoint, count = listings.len(), "listing search answered");
        Ok(listings)
    }
}

/// Serves the bundled realtor-style sample listings for any query.
#[derive(Debug, Clone)]
pub struct MockListingSource {
    payload: Value,
}

impl MockListingSource {
    pub fn bundled() -> Result<Self, SearchError> {
        Ok(Self {
            payload: serde_json::from_str(BUNDLED_LISTINGS)?,
        })
    }

    pub fn from_payload(payload: Value) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl ListingSource for MockListingSource {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<ExternalListing>, SearchError> {
        Ok(parse_listing_payload(self.payload.clone())?)
    }
}
