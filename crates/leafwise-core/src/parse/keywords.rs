//! Keyword-based sentence classification for unstructured text
//!
//! When provider text carries no section headers, each sentence is assigned
//! to whichever output fields it shares vocabulary with. A sentence matching
//! no set appears in no list.

use super::items::clean_item;
use crate::record::{UNSTRUCTURED_ITEM_CAP, UNSTRUCTURED_ITEM_LEN};
use lazy_static::lazy_static;
use regex::Regex;

/// Minimum sentence length worth classifying
const SENTENCE_MIN_LEN: usize = 20;

const CAUSE_KEYWORDS: &[&str] = &[
    "caused by",
    "due to",
    "infection",
    "pathogen",
    "fungus",
    "bacteria",
    "virus",
    "environmental",
];

const EFFECT_KEYWORDS: &[&str] = &[
    "symptoms",
    "damage",
    "affects",
    "reduces",
    "impact",
    "yield",
    "production",
    "lesions",
];

const TREATMENT_KEYWORDS: &[&str] = &[
    "treatment",
    "control",
    "manage",
    "fungicide",
    "spray",
    "remove",
    "prune",
    "apply",
];

const PREVENTION_KEYWORDS: &[&str] = &[
    "prevent",
    "avoid",
    "resistant",
    "rotation",
    "sanitation",
    "hygiene",
    "spacing",
];

lazy_static! {
    static ref SENTENCE_END_RE: Regex = Regex::new(r"[.!?]\s+").expect("sentence regex");
}

/// Sentence lists for the four output fields, in field order
#[derive(Debug, Default)]
pub(crate) struct ClassifiedSentences {
    pub causes: Vec<String>,
    pub effects: Vec<String>,
    pub solutions: Vec<String>,
    pub prevention: Vec<String>,
}

/// Split text into sentences and bucket them by field vocabulary.
///
/// A sentence may land in more than one field; each field keeps at most
/// three items.
pub(crate) fn classify_sentences(text: &str) -> ClassifiedSentences {
    let sentences: Vec<&str> = SENTENCE_END_RE.split(text).collect();

    ClassifiedSentences {
        causes: collect_matching(&sentences, CAUSE_KEYWORDS),
        effects: collect_matching(&sentences, EFFECT_KEYWORDS),
        solutions: collect_matching(&sentences, TREATMENT_KEYWORDS),
        prevention: collect_matching(&sentences, PREVENTION_KEYWORDS),
    }
}

fn collect_matching(sentences: &[&str], keywords: &[&str]) -> Vec<String> {
    sentences
        .iter()
        .map(|s| s.trim())
        .filter(|s| s.len() > SENTENCE_MIN_LEN)
        .filter(|s| {
            let lower = s.to_lowercase();
            keywords.iter().any(|kw| lower.contains(kw))
        })
        .filter_map(|s| clean_item(s, UNSTRUCTURED_ITEM_LEN))
        .take(UNSTRUCTURED_ITEM_CAP)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_bucketed_by_vocabulary() {
        let text = "The disease is caused by a soil-borne fungus that persists for years. \
                    Symptoms include wilted leaves and dark lesions on stems. \
                    Apply a copper fungicide at the first sign of trouble. \
                    Crop rotation helps prevent recurrence in later seasons.";
        let classified = classify_sentences(text);

        assert_eq!(classified.causes.len(), 1);
        assert!(classified.causes[0].contains("soil-borne fungus"));
        assert!(!classified.effects.is_empty());
        assert!(classified.solutions.iter().any(|s| s.contains("fungicide")));
        assert!(classified.prevention.iter().any(|s| s.contains("rotation")));
    }

    #[test]
    fn test_unmatched_sentences_appear_nowhere() {
        let text = "The weather was pleasant throughout the entire spring season. \
                    Farmers gathered at the market early in the morning hours.";
        let classified = classify_sentences(text);
        assert!(classified.causes.is_empty());
        assert!(classified.effects.is_empty());
        assert!(classified.solutions.is_empty());
        assert!(classified.prevention.is_empty());
    }

    #[test]
    fn test_sentence_may_match_multiple_fields() {
        let text = "Fungicide sprays control the pathogen and prevent further spread effectively.";
        let classified = classify_sentences(text);
        assert_eq!(classified.causes.len(), 1);
        assert_eq!(classified.solutions.len(), 1);
        assert_eq!(classified.prevention.len(), 1);
    }

    #[test]
    fn test_short_sentences_skipped() {
        let classified = classify_sentences("Fungus is bad. It spreads.");
        assert!(classified.causes.is_empty());
    }

    #[test]
    fn test_field_cap_is_three() {
        let text = "The first pathogen arrived with the imported seedlings last year. \
                    A second pathogen spread from the neighboring orchard quickly. \
                    A third pathogen survives in the soil between growing seasons. \
                    A fourth pathogen travels on contaminated pruning equipment.";
        let classified = classify_sentences(text);
        assert_eq!(classified.causes.len(), 3);
    }
}
