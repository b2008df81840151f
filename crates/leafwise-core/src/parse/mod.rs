//! Free-text parser
//!
//! Turns arbitrarily formatted provider text into the five normalized
//! record fields. The parser is an explicit two-branch strategy: text with
//! recognizable section headers takes the structured path (spans sliced
//! between headers), everything else takes the unstructured path (sentence
//! classification by field vocabulary). Which branch ran is reported in
//! [`TextShape`] so callers can set `is_structured` honestly.

mod items;
mod keywords;

use crate::record::{
    truncate_chars, Variant, DESCRIPTION_LEN, STRUCTURED_ITEM_CAP, STRUCTURED_ITEM_LEN,
};
use items::{clean_item, collapse_whitespace, extract_raw_items, prune_short_items};
use lazy_static::lazy_static;
use regex::Regex;

/// Minimum length for a description extracted from a header span
const DESCRIPTION_MIN_LEN: usize = 50;

/// Section-header keywords whose presence marks text as structured,
/// regardless of variant
const STRUCTURE_MARKERS: &[&str] = &[
    "CAUSES:",
    "EFFECTS:",
    "TREATMENT:",
    "PREVENTION:",
    "SOLUTIONS:",
];

lazy_static! {
    static ref DISEASED_HEADER_RE: Regex = Regex::new(
        r"(?i)\b(DESCRIPTION|CAUSES?|EFFECTS?|TREATMENT|SOLUTIONS?|DISEASE PREVENTION|PREVENTION)\s*:"
    )
    .expect("diseased header regex");
    static ref HEALTHY_HEADER_RE: Regex = Regex::new(
        r"(?i)\b(DESCRIPTION|GROWING CONDITIONS|CONDITIONS|CHARACTERISTICS|MAINTENANCE|CARE|DISEASE PREVENTION|PREVENTION)\s*:"
    )
    .expect("healthy header regex");
}

/// Which parsing branch produced the record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextShape {
    /// Fields sliced from explicit section headers
    Structured,
    /// Fields classified heuristically from sentences
    Unstructured,
}

/// Output slots a recognized header can map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Description,
    Causes,
    Effects,
    Solutions,
    Prevention,
}

/// Parsed record fields plus the branch that produced them
#[derive(Debug, Clone)]
pub struct ParsedText {
    pub shape: TextShape,
    pub description: String,
    pub causes: Vec<String>,
    pub effects: Vec<String>,
    pub solutions: Vec<String>,
    pub prevention: Vec<String>,
}

/// Parse provider free text into normalized record fields.
///
/// The variant selects which header vocabulary maps onto the four list
/// slots; header sets are substituted wholesale, never merged. If any text
/// was supplied at all the returned description is non-empty.
pub fn parse_free_text(text: &str, variant: Variant) -> ParsedText {
    // Strip markup emphasis the upstream generators are fond of
    let normalized = text.replace(['*', '#'], "");
    let normalized = normalized.trim();

    let upper = normalized.to_uppercase();
    let has_sections = STRUCTURE_MARKERS.iter().any(|marker| upper.contains(marker));

    let mut parsed = if has_sections {
        parse_structured(normalized, variant)
    } else {
        parse_unstructured(normalized)
    };

    // Description is never left empty when any input text existed
    if parsed.description.is_empty() && !normalized.is_empty() {
        let collapsed = collapse_whitespace(normalized);
        parsed.description =
            with_sentence_breaks(truncate_chars(&collapsed, DESCRIPTION_LEN));
    }

    prune_short_items(&mut parsed.causes);
    prune_short_items(&mut parsed.effects);
    prune_short_items(&mut parsed.solutions);
    prune_short_items(&mut parsed.prevention);

    parsed
}

/// A recognized header occurrence: where its content starts and where the
/// header token itself begins
struct HeaderMatch {
    slot: Slot,
    header_start: usize,
    content_start: usize,
}

fn scan_headers(text: &str, variant: Variant) -> Vec<HeaderMatch> {
    let re: &Regex = match variant {
        Variant::Healthy => &HEALTHY_HEADER_RE,
        Variant::Diseased => &DISEASED_HEADER_RE,
    };

    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            let slot = slot_for_header(name, variant)?;
            Some(HeaderMatch {
                slot,
                header_start: whole.start(),
                content_start: whole.end(),
            })
        })
        .collect()
}

fn slot_for_header(name: &str, variant: Variant) -> Option<Slot> {
    let canonical = collapse_whitespace(name).to_uppercase();
    let slot = match (variant, canonical.as_str()) {
        (_, "DESCRIPTION") => Slot::Description,
        (_, "PREVENTION") | (_, "DISEASE PREVENTION") => Slot::Prevention,
        (Variant::Diseased, "CAUSE") | (Variant::Diseased, "CAUSES") => Slot::Causes,
        (Variant::Diseased, "EFFECT") | (Variant::Diseased, "EFFECTS") => Slot::Effects,
        (Variant::Diseased, "TREATMENT")
        | (Variant::Diseased, "SOLUTION")
        | (Variant::Diseased, "SOLUTIONS") => Slot::Solutions,
        (Variant::Healthy, "GROWING CONDITIONS") | (Variant::Healthy, "CONDITIONS") => {
            Slot::Causes
        }
        (Variant::Healthy, "CHARACTERISTICS") => Slot::Effects,
        (Variant::Healthy, "MAINTENANCE") | (Variant::Healthy, "CARE") => Slot::Solutions,
        _ => return None,
    };
    Some(slot)
}

/// Structured path: slice spans between consecutive recognized headers.
///
/// Spans stop at the next known header, never at arbitrary punctuation, so
/// content legitimately containing periods survives intact.
fn parse_structured(text: &str, variant: Variant) -> ParsedText {
    let headers = scan_headers(text, variant);

    let mut parsed = ParsedText {
        shape: TextShape::Structured,
        description: String::new(),
        causes: Vec::new(),
        effects: Vec::new(),
        solutions: Vec::new(),
        prevention: Vec::new(),
    };

    // First span per slot wins; repeated headers are ignored
    for (i, header) in headers.iter().enumerate() {
        let span_end = headers
            .get(i + 1)
            .map(|next| next.header_start)
            .unwrap_or(text.len());
        let span = text[header.content_start..span_end].trim();
        if span.is_empty() {
            continue;
        }

        match header.slot {
            Slot::Description => {
                if parsed.description.is_empty() && span.len() > DESCRIPTION_MIN_LEN {
                    parsed.description = with_sentence_breaks(&collapse_whitespace(span));
                }
            }
            slot => {
                let field = field_for_slot(&mut parsed, slot);
                if field.is_empty() {
                    *field = extract_raw_items(span)
                        .iter()
                        .take(STRUCTURED_ITEM_CAP)
                        .filter_map(|raw| clean_item(raw, STRUCTURED_ITEM_LEN))
                        .collect();
                }
            }
        }
    }

    // No DESCRIPTION header (or too short a span): fall back to whatever
    // precedes the first recognized header
    if parsed.description.is_empty() {
        if let Some(first) = headers.first() {
            let preamble = text[..first.header_start].trim();
            if preamble.len() > DESCRIPTION_MIN_LEN {
                parsed.description = with_sentence_breaks(&collapse_whitespace(preamble));
            }
        }
    }

    parsed
}

fn field_for_slot(parsed: &mut ParsedText, slot: Slot) -> &mut Vec<String> {
    match slot {
        Slot::Causes => &mut parsed.causes,
        Slot::Effects => &mut parsed.effects,
        Slot::Solutions => &mut parsed.solutions,
        Slot::Prevention => &mut parsed.prevention,
        Slot::Description => unreachable!("description handled separately"),
    }
}

/// Unstructured path: the whole text becomes the description and sentences
/// are bucketed by field vocabulary
fn parse_unstructured(text: &str) -> ParsedText {
    let classified = keywords::classify_sentences(text);

    let description = if text.is_empty() {
        String::new()
    } else {
        with_sentence_breaks(&collapse_whitespace(text))
    };

    ParsedText {
        shape: TextShape::Unstructured,
        description,
        causes: classified.causes,
        effects: classified.effects,
        solutions: classified.solutions,
        prevention: classified.prevention,
    }
}

/// Insert line breaks after sentence ends for readability
fn with_sentence_breaks(text: &str) -> String {
    text.replace(". ", ".\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURED_SAMPLE: &str = "\
DESCRIPTION: Apple scab is a fungal disease caused by Venturia inaequalis that \
produces dark, olive-green lesions on leaves and corky spots on fruit. It is \
one of the most economically significant apple diseases worldwide.

CAUSES:
- The fungus Venturia inaequalis overwintering in fallen leaves
- Cool, wet spring weather around 60-75 F
- Spore release during extended leaf wetness

EFFECTS:
- Dark scaly lesions on leaves and fruit
- Premature leaf and fruit drop
- Reduced fruit quality and marketability

TREATMENT:
- Apply captan or myclobutanil fungicides on a protective schedule
- Remove and destroy fallen leaves in autumn

PREVENTION:
- Plant scab-resistant cultivars
- Prune trees to improve air circulation";

    #[test]
    fn test_structured_text_fills_all_fields() {
        let parsed = parse_free_text(STRUCTURED_SAMPLE, Variant::Diseased);
        assert_eq!(parsed.shape, TextShape::Structured);
        assert!(parsed.description.contains("Venturia inaequalis"));
        assert_eq!(parsed.causes.len(), 3);
        assert_eq!(parsed.effects.len(), 3);
        assert_eq!(parsed.solutions.len(), 2);
        assert_eq!(parsed.prevention.len(), 2);
    }

    #[test]
    fn test_structured_items_are_well_formed() {
        let parsed = parse_free_text(STRUCTURED_SAMPLE, Variant::Diseased);
        for item in parsed
            .causes
            .iter()
            .chain(&parsed.effects)
            .chain(&parsed.solutions)
            .chain(&parsed.prevention)
        {
            assert!(
                item.ends_with(['.', '!', '?', ':']),
                "missing terminal punctuation: {}",
                item
            );
            let first = item.chars().next().unwrap();
            assert!(!first.is_lowercase(), "not capitalized: {}", item);
        }
    }

    #[test]
    fn test_span_survives_interior_periods() {
        let text = "CAUSES: The fungus thrives at 60-75 F. It overwinters in leaf litter. \
                    EFFECTS: Lesions appear on fruit surfaces quickly.";
        let parsed = parse_free_text(text, Variant::Diseased);
        // Both sentences belong to the causes span; the span ends at the
        // EFFECTS header, not at the first period
        assert_eq!(parsed.causes.len(), 2);
        assert!(parsed.causes[1].contains("overwinters"));
        assert_eq!(parsed.effects.len(), 1);
    }

    #[test]
    fn test_description_from_preamble_without_marker() {
        let text = "A devastating oomycete disease that spreads rapidly through wet foliage \
                    and can destroy entire plantings. CAUSES: Phytophthora infestans spreading in cool wet weather.";
        let parsed = parse_free_text(text, Variant::Diseased);
        assert_eq!(parsed.shape, TextShape::Structured);
        assert!(parsed.description.starts_with("A devastating oomycete"));
    }

    #[test]
    fn test_short_description_span_falls_back_to_full_text() {
        let text = "Too short. CAUSES: A fungus that overwinters in plant debris nearby.";
        let parsed = parse_free_text(text, Variant::Diseased);
        // Preamble under the minimum length; the guarantee stage fills
        // description from the whole normalized text
        assert!(!parsed.description.is_empty());
    }

    #[test]
    fn test_healthy_headers_map_onto_same_slots() {
        let text = "\
DESCRIPTION: Healthy apple foliage is deep green, uniformly colored, and free of \
lesions or discoloration across the whole canopy.

GROWING CONDITIONS:
- Full sun with six or more hours of light
- Well-drained loamy soil

CHARACTERISTICS:
- Glossy green leaves without spots
- Vigorous shoot growth

MAINTENANCE:
- Water deeply during dry spells
- Feed with balanced fertilizer in spring

DISEASE PREVENTION:
- Prune for open canopy airflow
- Rake and remove fallen leaves";
        let parsed = parse_free_text(text, Variant::Healthy);
        assert_eq!(parsed.shape, TextShape::Structured);
        assert_eq!(parsed.causes.len(), 2);
        assert!(parsed.causes[0].contains("Full sun"));
        assert_eq!(parsed.effects.len(), 2);
        assert_eq!(parsed.solutions.len(), 2);
        assert_eq!(parsed.prevention.len(), 2);
    }

    #[test]
    fn test_header_sets_substituted_not_merged() {
        // Healthy vocabulary in diseased mode: CHARACTERISTICS is not a
        // recognized header, and no diseased marker is present either, so
        // the text parses as unstructured
        let text = "CHARACTERISTICS: Glossy green leaves without any visible spots anywhere.";
        let parsed = parse_free_text(text, Variant::Diseased);
        assert_eq!(parsed.shape, TextShape::Unstructured);
    }

    #[test]
    fn test_unstructured_text_classified_by_keywords() {
        let text = "Gray leaf spot is caused by a fungus that survives in corn residue. \
                    The lesions reduce photosynthetic area and lower yield substantially. \
                    Growers apply strobilurin fungicides when conditions favor disease. \
                    Crop rotation with soybeans helps prevent buildup of inoculum.";
        let parsed = parse_free_text(text, Variant::Diseased);
        assert_eq!(parsed.shape, TextShape::Unstructured);
        assert!(parsed.description.contains('\n'));
        assert!(!parsed.causes.is_empty());
        assert!(!parsed.effects.is_empty());
        assert!(!parsed.solutions.is_empty());
        assert!(!parsed.prevention.is_empty());
    }

    #[test]
    fn test_unstructured_unmatched_sentences_stay_out_of_lists() {
        let text = "The orchard sits on a gentle hillside facing the morning sun.";
        let parsed = parse_free_text(text, Variant::Diseased);
        assert_eq!(parsed.shape, TextShape::Unstructured);
        assert!(!parsed.description.is_empty());
        assert!(parsed.causes.is_empty());
        assert!(parsed.effects.is_empty());
        assert!(parsed.solutions.is_empty());
        assert!(parsed.prevention.is_empty());
    }

    #[test]
    fn test_markup_stripped() {
        let text = "**CAUSES:** caused by *Venturia inaequalis* in cool wet springs everywhere.";
        let parsed = parse_free_text(text, Variant::Diseased);
        assert_eq!(parsed.shape, TextShape::Structured);
        assert!(!parsed.causes.is_empty());
        assert!(!parsed.causes[0].contains('*'));
    }

    #[test]
    fn test_empty_input_yields_empty_description() {
        let parsed = parse_free_text("", Variant::Diseased);
        assert!(parsed.description.is_empty());
        assert_eq!(parsed.shape, TextShape::Unstructured);
    }

    #[test]
    fn test_description_never_empty_for_nonempty_input() {
        let parsed = parse_free_text("short note", Variant::Diseased);
        assert_eq!(parsed.description, "short note");
    }

    #[test]
    fn test_fallback_description_capped() {
        // Preamble too short for a description, so the guarantee stage
        // fills it from the whole text, truncated
        let filler = "item ".repeat(400);
        let text = format!("Short. CAUSES: {}", filler);
        let parsed = parse_free_text(&text, Variant::Diseased);
        assert!(!parsed.description.is_empty());
        assert!(parsed.description.chars().count() <= DESCRIPTION_LEN);
    }
}
