//! Image-identification provider backed by the PlantNet API
//!
//! Only consulted for healthy specimens when image bytes are available.
//! PlantNet returns an identification rather than prose, so its output is
//! already structured and bypasses the free-text parser.

use crate::error::{LeafwiseError, Result};
use crate::providers::{InfoProvider, LookupQuery, RawContent};
use crate::record::InformationRecord;
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use std::time::Duration;

const IDENTIFY_URL: &str = "https://my-api.plantnet.org/v2/identify/weurope";

pub struct PlantNetProvider {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct IdentifyResponse {
    #[serde(default)]
    results: Vec<IdentifyResult>,
}

#[derive(Debug, Deserialize)]
struct IdentifyResult {
    score: f64,
    species: Species,
}

#[derive(Debug, Deserialize)]
struct Species {
    #[serde(rename = "scientificNameWithoutAuthor")]
    scientific_name: String,
    #[serde(rename = "commonNames", default)]
    common_names: Vec<CommonName>,
}

#[derive(Debug, Deserialize)]
struct CommonName {
    value: String,
}

impl PlantNetProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("leafwise/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(LeafwiseError::Http)?;
        Ok(Self { client, api_key })
    }

    /// Build an identification record from the best match
    fn identification_record(
        scientific_name: &str,
        common_names: &[String],
        confidence: f64,
    ) -> InformationRecord {
        let mut description = format!("Plant identified as {}", scientific_name);
        if !common_names.is_empty() {
            description.push_str(&format!(
                " (commonly known as {})",
                common_names.join(", ")
            ));
        }
        description.push_str(&format!(
            " with {:.1}% confidence using PlantNet's plant identification database.",
            confidence * 100.0
        ));

        let common = if common_names.is_empty() {
            "Not available".to_string()
        } else {
            common_names.join(", ")
        };

        let mut record = InformationRecord::new(description, "PlantNet".to_string(), true);
        record.causes = vec![
            format!("Scientific name: {}", scientific_name),
            format!("Common names: {}", common),
        ];
        record.effects = vec![
            format!("Identification confidence: {:.1}%", confidence * 100.0),
            "Properly identified plant for accurate care".to_string(),
        ];
        record.solutions = vec![
            "Monitor plant health regularly".to_string(),
            "Follow species-specific care guidelines".to_string(),
        ];
        record.prevention = vec![
            "Use correct identification for targeted disease prevention".to_string(),
            "Research species-specific diseases".to_string(),
        ];
        record
            .with_metadata("scientific_name", scientific_name)
            .with_metadata("confidence", format!("{:.4}", confidence))
    }
}

#[async_trait]
impl InfoProvider for PlantNetProvider {
    fn name(&self) -> &'static str {
        "PlantNet"
    }

    // Identification works on the image, not on lookup terms
    fn term_budget(&self) -> usize {
        1
    }

    fn applies_to(&self, query: &LookupQuery) -> bool {
        query.variant.is_healthy() && query.image.is_some()
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Option<RawContent>> {
        let image = match &query.image {
            Some(bytes) => bytes.clone(),
            None => return Ok(None),
        };

        let form = multipart::Form::new()
            .part(
                "images",
                multipart::Part::bytes(image)
                    .file_name("specimen.jpg")
                    .mime_str("image/jpeg")
                    .map_err(LeafwiseError::Http)?,
            )
            .text("modifiers", "crops")
            .text("modifiers", "similar_images")
            .text("api-key", self.api_key.clone());

        let response = self.client.post(IDENTIFY_URL).multipart(form).send().await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "PlantNet identification failed");
            return Ok(None);
        }

        let identified: IdentifyResponse = response.json().await?;
        let best = match identified.results.into_iter().next() {
            Some(best) => best,
            None => return Ok(None),
        };

        let common_names: Vec<String> = best
            .species
            .common_names
            .into_iter()
            .take(3)
            .map(|name| name.value)
            .collect();

        tracing::debug!(
            species = %best.species.scientific_name,
            confidence = best.score,
            "PlantNet identification accepted"
        );

        Ok(Some(RawContent::Structured(Self::identification_record(
            &best.species.scientific_name,
            &common_names,
            best.score,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Variant;

    #[test]
    fn test_applies_only_to_healthy_with_image() {
        let provider =
            PlantNetProvider::new("key".into(), Duration::from_secs(5)).unwrap();

        let healthy_with_image = LookupQuery::new("Apple leaf", "Apple", Variant::Healthy)
            .with_image(vec![1, 2, 3]);
        assert!(provider.applies_to(&healthy_with_image));

        let healthy_no_image = LookupQuery::new("Apple leaf", "Apple", Variant::Healthy);
        assert!(!provider.applies_to(&healthy_no_image));

        let diseased = LookupQuery::new("Apple Scab Leaf", "Apple scab", Variant::Diseased)
            .with_image(vec![1, 2, 3]);
        assert!(!provider.applies_to(&diseased));
    }

    #[test]
    fn test_identification_record_contents() {
        let record = PlantNetProvider::identification_record(
            "Malus domestica",
            &["Apple".to_string(), "Orchard apple".to_string()],
            0.874,
        );
        assert!(record.description.contains("Malus domestica"));
        assert!(record.description.contains("commonly known as Apple, Orchard apple"));
        assert!(record.description.contains("87.4%"));
        assert!(record.is_structured);
        assert_eq!(record.source, "PlantNet");
        assert_eq!(record.metadata.get("scientific_name").unwrap(), "Malus domestica");
        assert_eq!(record.causes.len(), 2);
    }

    #[test]
    fn test_identification_record_without_common_names() {
        let record = PlantNetProvider::identification_record("Rubus idaeus", &[], 0.5);
        assert!(!record.description.contains("commonly known"));
        assert!(record.causes[1].contains("Not available"));
    }

    #[test]
    fn test_identify_response_parses() {
        let json = r#"{
            "results": [{
                "score": 0.91,
                "species": {
                    "scientificNameWithoutAuthor": "Malus domestica",
                    "commonNames": [{"value": "Apple"}]
                }
            }]
        }"#;
        let parsed: IdentifyResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results[0].species.scientific_name, "Malus domestica");
        assert_eq!(parsed.results[0].species.common_names[0].value, "Apple");
    }
}
