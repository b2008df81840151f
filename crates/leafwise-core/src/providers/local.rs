//! Local knowledge base adapter
//!
//! Wraps the embedded table behind the provider trait so the engine treats
//! the offline fallback like any other source. Always consulted last and
//! never skipped, even when resolution runs offline.

use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::providers::{InfoProvider, LookupQuery, RawContent};
use async_trait::async_trait;
use std::sync::Arc;

pub struct LocalKnowledgeProvider {
    knowledge: Arc<KnowledgeBase>,
}

impl LocalKnowledgeProvider {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl InfoProvider for LocalKnowledgeProvider {
    fn name(&self) -> &'static str {
        "Local Database"
    }

    fn is_remote(&self) -> bool {
        false
    }

    // Entries are keyed on exact entity names, not generated terms
    fn term_budget(&self) -> usize {
        1
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Option<RawContent>> {
        Ok(self
            .knowledge
            .lookup(&query.entity_name)
            .map(RawContent::Structured))
    }
}
