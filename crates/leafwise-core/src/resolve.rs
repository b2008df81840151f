//! Resolution engine
//!
//! Orchestrates the provider chain: providers are consulted in priority
//! order, each given its term budget, and the first usable result wins.
//! Provider errors and timeouts demote to "try the next one"; the terminal
//! knowledge-base fallback guarantees every call returns a record.

use crate::config::Config;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::parse::{parse_free_text, TextShape};
use crate::providers::{
    FreeText, GeminiProvider, GoogleSearchProvider, InfoProvider, LocalKnowledgeProvider,
    LookupQuery, PlantNetProvider, RawContent, WikipediaProvider,
};
use crate::record::{InformationRecord, Variant};
use crate::terms::{QueryTermGenerator, SynonymTable};
use std::sync::Arc;
use std::time::Duration;

pub struct ResolutionEngine {
    providers: Vec<Arc<dyn InfoProvider>>,
    generator: QueryTermGenerator,
    knowledge: Arc<KnowledgeBase>,
    timeout: Duration,
    use_remote: bool,
}

impl ResolutionEngine {
    /// Build the standard provider chain from configuration.
    ///
    /// Remote providers are registered only when their credentials are
    /// present; the local knowledge base is always last in the chain.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let knowledge = Arc::new(KnowledgeBase::builtin()?);
        let credentials = &config.credentials;

        let mut providers: Vec<Arc<dyn InfoProvider>> = Vec::new();

        if let Some(key) = &credentials.gemini_api_key {
            providers.push(Arc::new(GeminiProvider::new(
                key.clone(),
                credentials.gemini_model.clone(),
                timeout,
            )?));
        }
        if let (Some(key), Some(engine_id)) = (
            &credentials.google_api_key,
            &credentials.google_search_engine_id,
        ) {
            providers.push(Arc::new(GoogleSearchProvider::new(
                key.clone(),
                engine_id.clone(),
                timeout,
            )?));
        }
        providers.push(Arc::new(WikipediaProvider::new(timeout)?));
        if let Some(key) = &credentials.plantnet_api_key {
            providers.push(Arc::new(PlantNetProvider::new(key.clone(), timeout)?));
        }
        providers.push(Arc::new(LocalKnowledgeProvider::new(knowledge.clone())));

        Ok(Self {
            providers,
            generator: QueryTermGenerator::new(SynonymTable::builtin()),
            knowledge,
            timeout,
            use_remote: config.use_remote,
        })
    }

    /// Build an engine over an explicit provider chain
    pub fn new(
        providers: Vec<Arc<dyn InfoProvider>>,
        generator: QueryTermGenerator,
        knowledge: Arc<KnowledgeBase>,
        timeout: Duration,
        use_remote: bool,
    ) -> Self {
        Self {
            providers,
            generator,
            knowledge,
            timeout,
            use_remote,
        }
    }

    /// Names of the registered providers, in consultation order
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Resolve an entity name to a normalized record.
    ///
    /// Never fails: when every provider comes up empty the knowledge base
    /// serves either its stored entry or the generic placeholder.
    pub async fn resolve(&self, entity_name: &str, image: Option<Vec<u8>>) -> InformationRecord {
        let variant = Variant::classify(entity_name);
        let terms = self.generator.generate(entity_name);
        tracing::info!(entity = entity_name, ?variant, terms = terms.len(), "resolving");

        for provider in &self.providers {
            if provider.is_remote() && !self.use_remote {
                tracing::debug!(provider = provider.name(), "skipped, remote lookups disabled");
                continue;
            }

            let budget = provider.term_budget().min(terms.len()).max(1);
            let delay = provider.courtesy_delay();

            for (i, term) in terms.iter().take(budget).enumerate() {
                let query = LookupQuery {
                    entity_name: entity_name.to_string(),
                    term: term.clone(),
                    variant,
                    image: image.clone(),
                };
                if !provider.applies_to(&query) {
                    break;
                }

                match tokio::time::timeout(self.timeout, provider.lookup(&query)).await {
                    Ok(Ok(Some(content))) => {
                        tracing::info!(provider = provider.name(), term, "resolved");
                        return self.normalize(content, provider.name(), variant);
                    }
                    Ok(Ok(None)) => {}
                    Ok(Err(err)) => {
                        tracing::warn!(provider = provider.name(), term, error = %err, "lookup failed");
                    }
                    Err(_) => {
                        tracing::warn!(provider = provider.name(), term, "lookup timed out");
                    }
                }

                if i + 1 < budget && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        tracing::info!(entity = entity_name, "all providers exhausted, using fallback");
        self.knowledge.lookup_or_placeholder(entity_name)
    }

    /// Normalize raw provider output into a record
    fn normalize(
        &self,
        content: RawContent,
        source: &'static str,
        variant: Variant,
    ) -> InformationRecord {
        match content {
            RawContent::Structured(record) => record,
            RawContent::FreeText(FreeText { text, metadata }) => {
                let parsed = parse_free_text(&text, variant);
                let mut record = InformationRecord::new(
                    parsed.description,
                    source.to_string(),
                    parsed.shape == TextShape::Structured,
                );
                record.causes = parsed.causes;
                record.effects = parsed.effects;
                record.solutions = parsed.solutions;
                record.prevention = parsed.prevention;
                record.metadata = metadata;
                record
            }
        }
    }
}
