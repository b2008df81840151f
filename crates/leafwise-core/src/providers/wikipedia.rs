//! Encyclopedic-summary provider backed by the Wikipedia REST API
//!
//! The one provider that genuinely benefits from the generated term list:
//! each term is a candidate page title, tried in priority order with a
//! fixed etiquette delay between lookups.

use crate::error::{LeafwiseError, Result};
use crate::providers::{FreeText, InfoProvider, LookupQuery, RawContent};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

/// Extracts shorter than this are stubs or disambiguation noise
const MIN_EXTRACT_LEN: usize = 100;

/// Delay between page lookups, out of respect for Wikipedia's servers
const LOOKUP_DELAY: Duration = Duration::from_millis(500);

pub struct WikipediaProvider {
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
}

impl WikipediaProvider {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                "leafwise/",
                env!("CARGO_PKG_VERSION"),
                " (plant condition information resolver)"
            ))
            .timeout(timeout)
            .build()
            .map_err(LeafwiseError::Http)?;
        Ok(Self { client })
    }

    /// Shape a term into a page title path segment
    fn page_title(term: &str) -> String {
        term.trim().replace(' ', "_")
    }
}

#[async_trait]
impl InfoProvider for WikipediaProvider {
    fn name(&self) -> &'static str {
        "Wikipedia"
    }

    fn courtesy_delay(&self) -> Duration {
        LOOKUP_DELAY
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Option<RawContent>> {
        let title = Self::page_title(&query.term);
        let url = format!("{}/{}", SUMMARY_URL, title);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), %title, "no Wikipedia summary");
            return Ok(None);
        }

        let summary: SummaryResponse = response.json().await?;
        if summary.extract.len() <= MIN_EXTRACT_LEN {
            return Ok(None);
        }

        tracing::debug!(page = %summary.title, "Wikipedia summary accepted");
        let mut content = FreeText::new(summary.extract);
        // Carry the matched page title so callers can show provenance
        if !summary.title.is_empty() {
            content = content.with_metadata("page_title", summary.title);
        }
        Ok(Some(RawContent::FreeText(content)))
    }
}
