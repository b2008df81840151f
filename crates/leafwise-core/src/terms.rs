//! Query term generation
//!
//! Expands an entity name into an ordered, deduplicated list of lookup terms
//! so providers keyed on page titles get multiple chances to hit. Order
//! matters: it defines lookup priority, most-specific first.

use std::collections::HashMap;

/// Plant categories that get generic `{plant}_disease` style terms
const PLANT_CATEGORIES: &[&str] = &["apple", "tomato", "potato", "corn", "grape"];

/// Domain keyword -> generic page-title terms
const KEYWORD_TERMS: &[(&str, &[&str])] = &[
    ("rust", &["Plant_rust", "Rust_(fungus)"]),
    ("blight", &["Plant_blight", "Blight"]),
    ("scab", &["Plant_scab", "Scab_(plant_disease)"]),
    ("spot", &["Leaf_spot", "Bacterial_leaf_spot"]),
];

/// Immutable mapping from entity names to scientific/alternate lookup terms.
///
/// Built once at startup and injected into the generator.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: HashMap<String, Vec<String>>,
}

impl SynonymTable {
    pub fn new(entries: HashMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// The builtin table covering the detection model's label set
    pub fn builtin() -> Self {
        let raw: &[(&str, &[&str])] = &[
            (
                "Apple rust leaf",
                &[
                    "Cedar-apple_rust",
                    "Apple_scab",
                    "Gymnosporangium_juniperi-virginianae",
                ],
            ),
            ("Apple Scab Leaf", &["Apple_scab", "Venturia_inaequalis"]),
            (
                "Tomato leaf late blight",
                &["Phytophthora_infestans", "Late_blight"],
            ),
            (
                "Tomato Early blight leaf",
                &["Alternaria_solani", "Early_blight"],
            ),
            (
                "Potato leaf early blight",
                &["Alternaria_solani", "Early_blight"],
            ),
            (
                "Potato leaf late blight",
                &["Phytophthora_infestans", "Late_blight"],
            ),
            ("Corn rust leaf", &["Corn_rust", "Puccinia_sorghi"]),
            (
                "Corn Gray leaf spot",
                &["Gray_leaf_spot", "Cercospora_zeae-maydis"],
            ),
            (
                "Corn leaf blight",
                &["Northern_corn_leaf_blight", "Exserohilum_turcicum"],
            ),
            (
                "Tomato leaf yellow virus",
                &["Tomato_yellow_leaf_curl_virus", "TYLCV"],
            ),
            (
                "Tomato leaf mosaic virus",
                &["Tobacco_mosaic_virus", "TMV"],
            ),
            (
                "grape leaf black rot",
                &["Black_rot", "Guignardia_bidwellii"],
            ),
            (
                "Bell_pepper leaf spot",
                &["Bacterial_leaf_spot", "Xanthomonas_campestris"],
            ),
            (
                "Squash Powdery mildew leaf",
                &["Powdery_mildew", "Podosphaera_xanthii"],
            ),
            (
                "Tomato leaf bacterial spot",
                &["Bacterial_spot", "Xanthomonas_campestris"],
            ),
        ];

        let entries = raw
            .iter()
            .map(|(name, terms)| {
                (
                    name.to_string(),
                    terms.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, entity_name: &str) -> Option<&[String]> {
        self.entries.get(entity_name).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Generates ordered lookup terms for an entity name
#[derive(Debug, Clone)]
pub struct QueryTermGenerator {
    synonyms: SynonymTable,
}

impl QueryTermGenerator {
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    /// Generate lookup terms, deduplicated, most-specific first.
    ///
    /// Never returns an empty list: the normalized name is always term 0.
    pub fn generate(&self, entity_name: &str) -> Vec<String> {
        let mut terms = Vec::new();

        // The " leaf" suffix strip is deliberately case-sensitive: labels
        // like "Apple Scab Leaf" keep their capitalized suffix.
        let normalized = entity_name.replace(" leaf", "").replace('_', " ");
        push_unique(&mut terms, normalized);

        if let Some(synonyms) = self.synonyms.get(entity_name) {
            for term in synonyms {
                push_unique(&mut terms, term.clone());
            }
        }

        let lower = entity_name.to_lowercase();

        if let Some(plant) = lower.split_whitespace().next() {
            if PLANT_CATEGORIES.contains(&plant) {
                push_unique(&mut terms, format!("{}_disease", plant));
                push_unique(&mut terms, format!("{}_pathology", plant));
            }
        }

        for (keyword, generics) in KEYWORD_TERMS {
            if lower.contains(keyword) {
                for term in *generics {
                    push_unique(&mut terms, term.to_string());
                }
            }
        }

        terms
    }
}

impl Default for QueryTermGenerator {
    fn default() -> Self {
        Self::new(SynonymTable::builtin())
    }
}

fn push_unique(terms: &mut Vec<String>, term: String) {
    if !term.is_empty() && !terms.contains(&term) {
        terms.push(term);
    }
}
