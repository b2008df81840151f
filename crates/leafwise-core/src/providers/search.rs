//! Web-search provider backed by Google Custom Search
//!
//! Targets agricultural extension material with a few query phrasings and
//! concatenates the top result snippets into free text for the parser.

use crate::error::{LeafwiseError, Result};
use crate::providers::{FreeText, InfoProvider, LookupQuery, RawContent};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Combined snippets below this length carry no real information
const MIN_COMBINED_LEN: usize = 50;

/// Delay between consecutive search queries
const QUERY_DELAY: Duration = Duration::from_secs(1);

pub struct GoogleSearchProvider {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

impl GoogleSearchProvider {
    pub fn new(api_key: String, engine_id: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("leafwise/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(LeafwiseError::Http)?;
        Ok(Self {
            client,
            api_key,
            engine_id,
        })
    }

    /// Query phrasings tried per term, most targeted first
    fn build_queries(term: &str) -> Vec<String> {
        vec![
            format!("{} plant disease treatment prevention", term),
            format!("{} agricultural management control", term),
            format!("{} fungicide pesticide solution", term),
        ]
    }

    /// Join the top results into `title: snippet` description text
    fn combine_items(items: &[SearchItem]) -> String {
        items
            .iter()
            .take(2)
            .map(|item| format!("{}: {}", item.title, item.snippet))
            .collect::<Vec<_>>()
            .join(". ")
    }

    async fn run_query(&self, query: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", "3"),
                ("fields", "items(title,snippet,link)"),
            ])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let parsed: SearchResponse = response.json().await?;
                if parsed.items.is_empty() {
                    return Ok(None);
                }
                let combined = Self::combine_items(&parsed.items);
                Ok(Some(combined).filter(|text| text.len() > MIN_COMBINED_LEN))
            }
            StatusCode::TOO_MANY_REQUESTS => Err(LeafwiseError::ExternalError(
                "Google Custom Search rate limit reached".to_string(),
            )),
            status => {
                tracing::warn!(%status, query, "Google Custom Search returned an error");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl InfoProvider for GoogleSearchProvider {
    fn name(&self) -> &'static str {
        "Google Custom Search"
    }

    // The three query phrasings already fan out; extra terms mostly repeat
    // the same result set against a rate-limited quota
    fn term_budget(&self) -> usize {
        1
    }

    fn courtesy_delay(&self) -> Duration {
        QUERY_DELAY
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Option<RawContent>> {
        let queries = Self::build_queries(&query.entity_name);
        let total = queries.len();

        for (i, search_query) in queries.iter().enumerate() {
            tracing::debug!(query = %search_query, "searching");
            match self.run_query(search_query).await {
                Ok(Some(text)) => return Ok(Some(RawContent::FreeText(FreeText::new(text)))),
                Ok(None) => {}
                // Rate limit: no point in burning the remaining phrasings
                Err(LeafwiseError::ExternalError(msg)) if msg.contains("rate limit") => {
                    tracing::warn!("{}", msg);
                    return Ok(None);
                }
                Err(err) => {
                    tracing::warn!(error = %err, query = %search_query, "search query failed");
                }
            }

            if i + 1 < total {
                tokio::time::sleep(QUERY_DELAY).await;
            }
        }

        Ok(None)
    }
}
