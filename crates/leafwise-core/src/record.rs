//! Normalized information records and the healthy/diseased variant heuristic

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum items per list field when parsed from explicit section markers
pub const STRUCTURED_ITEM_CAP: usize = 5;

/// Maximum items per list field when classified from unstructured sentences
pub const UNSTRUCTURED_ITEM_CAP: usize = 3;

/// Character cap per item on the structured path
pub const STRUCTURED_ITEM_LEN: usize = 300;

/// Character cap per item on the unstructured path
pub const UNSTRUCTURED_ITEM_LEN: usize = 250;

/// Character cap for a description synthesized from raw text
pub const DESCRIPTION_LEN: usize = 1000;

/// Source label attached to records served from the builtin knowledge base
pub const LOCAL_SOURCE: &str = "Local Database";

/// Disease-indicating keywords used by the variant heuristic.
///
/// Kept as a plain substring-membership test; prompt selection and
/// header-set selection both depend on this exact behavior.
const DISEASE_KEYWORDS: &[&str] = &[
    "blight",
    "rust",
    "spot",
    "rot",
    "scab",
    "mosaic",
    "virus",
    "bacterial",
];

/// Whether an entity name refers to a healthy specimen or a disease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    Healthy,
    Diseased,
}

impl Variant {
    /// Classify an entity name.
    ///
    /// Healthy iff the lowercase name contains "leaf" and none of the
    /// disease keywords.
    pub fn classify(entity_name: &str) -> Self {
        let lower = entity_name.to_lowercase();
        let diseased = DISEASE_KEYWORDS.iter().any(|kw| lower.contains(kw));
        if lower.contains("leaf") && !diseased {
            Variant::Healthy
        } else {
            Variant::Diseased
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Variant::Healthy)
    }
}

/// Normalized five-field record describing a plant condition.
///
/// Constructed fresh per resolution call and immutable once returned.
/// List fields are never absent: an empty list means "not extracted",
/// not "known to be empty".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InformationRecord {
    /// Free-form paragraph; non-empty on every successful resolution
    pub description: String,

    /// What brings the condition about
    #[serde(default)]
    pub causes: Vec<String>,

    /// Visible symptoms and impact
    #[serde(default)]
    pub effects: Vec<String>,

    /// Treatment options
    #[serde(default)]
    pub solutions: Vec<String>,

    /// Preventive measures
    #[serde(default)]
    pub prevention: Vec<String>,

    /// Provenance: provider name, or "Local Database"
    pub source: String,

    /// True only when list fields came from explicit section markers or a
    /// provider-native structured payload, never from heuristic sentence
    /// classification
    pub is_structured: bool,

    /// Provider-specific extras (scientific name, identification
    /// confidence, matched page title) carried through untouched
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl InformationRecord {
    /// Create a record with empty list fields
    pub fn new(description: String, source: String, is_structured: bool) -> Self {
        Self {
            description,
            causes: Vec::new(),
            effects: Vec::new(),
            solutions: Vec::new(),
            prevention: Vec::new(),
            source,
            is_structured,
            metadata: HashMap::new(),
        }
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Total number of extracted list items across the four fields
    pub fn item_count(&self) -> usize {
        self.causes.len() + self.effects.len() + self.solutions.len() + self.prevention.len()
    }
}

/// Truncate a string to at most `cap` characters, respecting char boundaries
pub(crate) fn truncate_chars(s: &str, cap: usize) -> &str {
    match s.char_indices().nth(cap) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
