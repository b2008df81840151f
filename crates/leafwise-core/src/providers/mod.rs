//! Information provider abstraction
//!
//! Provides a unified interface for looking up condition information from
//! heterogeneous sources:
//! - AI generation (Gemini)
//! - Web search (Google Custom Search)
//! - Encyclopedic summaries (Wikipedia)
//! - Image identification (PlantNet)
//! - The local knowledge base
//!
//! Each adapter implements the InfoProvider trait so the resolution engine
//! can reorder, add, or drop sources without touching orchestration logic.

use crate::error::Result;
use crate::record::{InformationRecord, Variant};
use std::collections::HashMap;
use std::time::Duration;

pub mod gemini;
pub mod local;
pub mod plantnet;
pub mod search;
pub mod wikipedia;

pub use gemini::GeminiProvider;
pub use local::LocalKnowledgeProvider;
pub use plantnet::PlantNetProvider;
pub use search::GoogleSearchProvider;
pub use wikipedia::WikipediaProvider;

/// One lookup attempt: a generated term plus the request context
#[derive(Debug, Clone)]
pub struct LookupQuery {
    /// The original entity name, for providers keyed on exact names
    pub entity_name: String,

    /// The generated lookup term for this attempt
    pub term: String,

    /// Healthy/diseased classification of the entity name
    pub variant: Variant,

    /// Image bytes, present only when the caller has them
    pub image: Option<Vec<u8>>,
}

impl LookupQuery {
    pub fn new(entity_name: impl Into<String>, term: impl Into<String>, variant: Variant) -> Self {
        Self {
            entity_name: entity_name.into(),
            term: term.into(),
            variant,
            image: None,
        }
    }

    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }
}

/// Free text plus any provider-specific metadata worth carrying through
#[derive(Debug, Clone)]
pub struct FreeText {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

impl FreeText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Raw provider output before normalization
#[derive(Debug, Clone)]
pub enum RawContent {
    /// Noisy natural-language text that still needs the free-text parser
    FreeText(FreeText),

    /// A provider-native structured payload, used as-is
    Structured(InformationRecord),
}

/// Information provider trait - all sources must implement this
#[async_trait::async_trait]
pub trait InfoProvider: Send + Sync {
    /// Human-readable source identifier, attached to records as provenance
    fn name(&self) -> &'static str;

    /// Whether this source leaves the machine; remote providers are skipped
    /// wholesale when resolution runs offline
    fn is_remote(&self) -> bool {
        true
    }

    /// How many generated terms are worth trying. Providers keyed on the
    /// entity name itself (prompt or image based) need exactly one.
    fn term_budget(&self) -> usize {
        usize::MAX
    }

    /// Fixed inter-call delay the engine applies between this provider's
    /// term retries, out of etiquette toward the external source
    fn courtesy_delay(&self) -> Duration {
        Duration::ZERO
    }

    /// Whether this provider can serve the query at all (e.g. the image
    /// identifier needs a healthy variant and image bytes)
    fn applies_to(&self, _query: &LookupQuery) -> bool {
        true
    }

    /// Look up one term. `Ok(None)` means no usable result; errors are
    /// demoted to "try next" by the engine, never surfaced to callers.
    async fn lookup(&self, query: &LookupQuery) -> Result<Option<RawContent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_query_builder() {
        let query = LookupQuery::new("Apple leaf", "Apple", Variant::Healthy)
            .with_image(vec![0xff, 0xd8]);
        assert_eq!(query.entity_name, "Apple leaf");
        assert_eq!(query.term, "Apple");
        assert!(query.variant.is_healthy());
        assert_eq!(query.image.as_deref(), Some(&[0xff, 0xd8][..]));
    }
}
