//! AI-generation provider backed by the Gemini API
//!
//! Highest-priority source: asked for a sectioned writeup via a prompt
//! template keyed on the healthy/diseased variant, so its replies usually
//! take the parser's structured path.

use crate::error::{LeafwiseError, Result};
use crate::providers::{FreeText, InfoProvider, LookupQuery, RawContent};
use crate::record::Variant;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Replies shorter than this are noise, not an answer
const MIN_RESPONSE_LEN: usize = 100;

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("leafwise/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(LeafwiseError::Http)?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Build the generation prompt for an entity.
    ///
    /// Healthy entities get a plant-care template; everything else gets the
    /// pathologist template with the five section headers the parser knows.
    fn build_prompt(entity_name: &str, variant: Variant) -> String {
        match variant {
            Variant::Healthy => {
                let plant_type = if entity_name.contains(' ') {
                    entity_name.split_whitespace().next().unwrap_or(entity_name)
                } else {
                    entity_name.trim_end_matches("leaf").trim_matches('_')
                };
                format!(
                    "As a plant expert, provide information about healthy {plant} plants in exactly this format:\n\n\
                     DESCRIPTION: Write 2-3 sentences about what healthy {plant} plants look like.\n\n\
                     GROWING CONDITIONS: List 3-4 optimal growing conditions.\n\n\
                     CHARACTERISTICS: List 3-4 visual characteristics of healthy {plant}.\n\n\
                     MAINTENANCE: List 3-4 care practices.\n\n\
                     DISEASE PREVENTION: List 3-4 preventive measures.\n\n\
                     Use simple, clear language for farmers.",
                    plant = plant_type
                )
            }
            Variant::Diseased => format!(
                "As an agricultural pathologist, provide comprehensive information about {name} in exactly this format:\n\n\
                 DESCRIPTION: Write a detailed paragraph (at least 100 words) about this plant disease, including its \
                 appearance, symptoms, affected plant parts, pathogen type, and how it manifests on the plant. Be thorough and complete.\n\n\
                 CAUSES: List the main causes of this disease:\n\
                 - Primary pathogen or environmental factor\n\
                 - Environmental conditions that favor development\n\
                 - Plant stress factors that contribute\n\
                 - Transmission methods\n\n\
                 EFFECTS: List the visible symptoms and impacts:\n\
                 - Visible symptoms on leaves, stems, fruits\n\
                 - Impact on plant growth and development\n\
                 - Effects on crop yield and quality\n\
                 - Long-term consequences if untreated\n\n\
                 TREATMENT: List specific treatment options:\n\
                 - Recommended fungicides or bactericides\n\
                 - Cultural management practices\n\
                 - Immediate action steps for infected plants\n\
                 - Organic treatment alternatives\n\n\
                 PREVENTION: List preventive measures:\n\
                 - Best practices for disease prevention\n\
                 - Resistant varieties if available\n\
                 - Proper sanitation and hygiene practices\n\
                 - Crop rotation and spacing recommendations\n\n\
                 Provide complete, detailed information in each section. Do not truncate any section.",
                name = entity_name
            ),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        #[derive(Serialize)]
        struct GenerateRequest {
            contents: Vec<Content>,
        }

        #[derive(Serialize)]
        struct Content {
            parts: Vec<Part>,
        }

        #[derive(Serialize)]
        struct Part {
            text: String,
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: CandidateContent,
        }

        #[derive(Deserialize)]
        struct CandidateContent {
            #[serde(default)]
            parts: Vec<CandidatePart>,
        }

        #[derive(Deserialize)]
        struct CandidatePart {
            #[serde(default)]
            text: String,
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LeafwiseError::ExternalError(format!(
                "Gemini API error (HTTP {}): {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response.json().await?;
        let text = generated
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(Some(text).filter(|t| !t.is_empty()))
    }
}

#[async_trait]
impl InfoProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini AI"
    }

    // The prompt is keyed on the entity name; alternate terms add nothing
    fn term_budget(&self) -> usize {
        1
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Option<RawContent>> {
        let prompt = Self::build_prompt(&query.entity_name, query.variant);
        let text = match self.generate(&prompt).await? {
            Some(text) => text,
            None => return Ok(None),
        };

        if text.len() <= MIN_RESPONSE_LEN {
            tracing::debug!(len = text.len(), "Gemini reply below viability threshold");
            return Ok(None);
        }

        tracing::debug!(entity = %query.entity_name, "Gemini reply accepted");
        Ok(Some(RawContent::FreeText(FreeText::new(text))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diseased_prompt_carries_section_headers() {
        let prompt = GeminiProvider::build_prompt("Apple Scab Leaf", Variant::Diseased);
        assert!(prompt.contains("Apple Scab Leaf"));
        for header in ["DESCRIPTION:", "CAUSES:", "EFFECTS:", "TREATMENT:", "PREVENTION:"] {
            assert!(prompt.contains(header), "missing {}", header);
        }
    }

    #[test]
    fn test_healthy_prompt_uses_plant_type() {
        let prompt = GeminiProvider::build_prompt("Apple leaf", Variant::Healthy);
        assert!(prompt.contains("healthy Apple plants"));
        assert!(prompt.contains("GROWING CONDITIONS:"));
        assert!(prompt.contains("DISEASE PREVENTION:"));
        assert!(!prompt.contains("TREATMENT:"));
    }

    #[test]
    fn test_healthy_prompt_single_token_name() {
        let prompt = GeminiProvider::build_prompt("Strawberry_leaf", Variant::Healthy);
        assert!(prompt.contains("Strawberry"));
        assert!(!prompt.contains("Strawberry_leaf plants"));
    }
}
