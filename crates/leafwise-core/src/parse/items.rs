//! List-item extraction and cleanup
//!
//! A section span rarely arrives in one consistent format, so extraction
//! falls through three strategies: explicit bullet/numbered markers,
//! sentence boundaries followed by a capital letter, then bare
//! semicolon/newline splits.

use crate::record::truncate_chars;
use lazy_static::lazy_static;
use regex::Regex;

/// Minimum pre-clean length for sentence-split items
const SENTENCE_MIN_LEN: usize = 15;

/// Minimum pre-clean length for semicolon/newline-split items
const FRAGMENT_MIN_LEN: usize = 10;

/// Minimum length of a cleaned item; anything shorter is noise
pub(crate) const ITEM_MIN_LEN: usize = 5;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("whitespace regex");
    static ref LEADING_MARKER_RE: Regex = Regex::new(r"^[-•\d.\s]+").expect("marker regex");
    static ref NUMBERED_RE: Regex = Regex::new(r"^\d+\.\s*").expect("numbered regex");
    static ref FRAGMENT_SPLIT_RE: Regex = Regex::new(r"[;\n]+").expect("fragment regex");
}

/// Collapse runs of whitespace into single spaces and trim
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Extract raw items from a section span, most explicit format first
pub(crate) fn extract_raw_items(span: &str) -> Vec<String> {
    let mut items = marker_items(span, |line| line.starts_with('-') || line.starts_with('•'));
    items.extend(marker_items(span, |line| NUMBERED_RE.is_match(line)));

    if items.is_empty() {
        items = split_sentences_at_capital(span)
            .into_iter()
            .filter(|s| s.trim().len() > SENTENCE_MIN_LEN)
            .map(|s| s.trim().to_string())
            .collect();
    }

    if items.is_empty() {
        items = FRAGMENT_SPLIT_RE
            .split(span)
            .filter(|s| s.trim().len() > FRAGMENT_MIN_LEN)
            .map(|s| s.trim().to_string())
            .collect();
    }

    items
}

/// Collect items whose first line matches `starts_item`, folding
/// continuation lines into the item they follow
fn marker_items(span: &str, starts_item: impl Fn(&str) -> bool) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in span.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if starts_item(trimmed) {
            if let Some(item) = current.take() {
                items.push(item);
            }
            current = Some(trimmed.to_string());
        } else if let Some(ref mut item) = current {
            item.push(' ');
            item.push_str(trimmed);
        }
    }
    if let Some(item) = current {
        items.push(item);
    }
    items
}

/// Split at `.` or `;` followed by whitespace and an uppercase letter.
///
/// The delimiter and whitespace are consumed, so pieces lose their trailing
/// punctuation; `clean_item` restores it.
pub(crate) fn split_sentences_at_capital(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    let mut i = 0;
    while i < chars.len() {
        let (idx, c) = chars[i];
        if c == '.' || c == ';' {
            // Look past whitespace for a capital letter
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_whitespace() {
                j += 1;
            }
            if j > i + 1 && j < chars.len() && chars[j].1.is_ascii_uppercase() {
                pieces.push(&text[start..idx]);
                start = chars[j].0;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Normalize one extracted item: strip leading list markers, collapse
/// whitespace, capitalize, cap the length, and terminate with punctuation.
///
/// Returns `None` for items too short to be meaningful. Truncation happens
/// before the terminal punctuation check, so cleaning an already-clean item
/// returns it unchanged.
pub(crate) fn clean_item(raw: &str, cap: usize) -> Option<String> {
    let stripped = LEADING_MARKER_RE.replace(raw, "");
    let collapsed = collapse_whitespace(&stripped);
    if collapsed.len() <= ITEM_MIN_LEN {
        return None;
    }

    let mut chars = collapsed.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => return None,
    };

    let mut item = truncate_chars(&capitalized, cap).to_string();
    if !item.ends_with(['.', '!', '?', ':']) {
        item.push('.');
    }
    Some(item)
}

/// Drop cleaned items that are still too short
pub(crate) fn prune_short_items(items: &mut Vec<String>) {
    items.retain(|item| item.trim().len() > ITEM_MIN_LEN);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::STRUCTURED_ITEM_LEN;
    use proptest::prelude::*;

    #[test]
    fn test_extract_bullet_items() {
        let span = "- Caused by fungal spores\n- Thrives in wet conditions\n- Spreads by wind";
        let items = extract_raw_items(span);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], "- Caused by fungal spores");
    }

    #[test]
    fn test_extract_bullet_with_continuation() {
        let span = "- Caused by the fungus Venturia inaequalis\n  which overwinters in leaves\n- Spreads by rain splash";
        let items = extract_raw_items(span);
        assert_eq!(items.len(), 2);
        assert!(items[0].contains("overwinters in leaves"));
    }

    #[test]
    fn test_extract_numbered_items() {
        let span = "1. Apply fungicide early in the season\n2. Remove fallen leaves promptly";
        let items = extract_raw_items(span);
        assert_eq!(items.len(), 2);
        assert!(items[1].contains("Remove fallen leaves"));
    }

    #[test]
    fn test_extract_sentence_items_when_no_markers() {
        let span = "The fungus overwinters in fallen leaves. Spores release during spring rains. Wind carries them far";
        let items = extract_raw_items(span);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], "The fungus overwinters in fallen leaves");
    }

    #[test]
    fn test_sentence_split_ignores_lowercase_follow() {
        // Periods inside content followed by lowercase are not boundaries
        let pieces = split_sentences_at_capital("grows at approx. two inches per week");
        assert_eq!(pieces.len(), 1);
    }

    #[test]
    fn test_extract_semicolon_fragments_as_last_resort() {
        let span = "copper sprays help; resistant varieties exist";
        let items = extract_raw_items(span);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_clean_item_strips_markers_and_formats() {
        let cleaned = clean_item("- 1. apply   copper fungicide weekly", STRUCTURED_ITEM_LEN);
        assert_eq!(cleaned.as_deref(), Some("Apply copper fungicide weekly."));
    }

    #[test]
    fn test_clean_item_keeps_existing_punctuation() {
        let cleaned = clean_item("Prune for airflow!", STRUCTURED_ITEM_LEN);
        assert_eq!(cleaned.as_deref(), Some("Prune for airflow!"));
    }

    #[test]
    fn test_clean_item_rejects_noise() {
        assert_eq!(clean_item("- ok", STRUCTURED_ITEM_LEN), None);
        assert_eq!(clean_item("   ", STRUCTURED_ITEM_LEN), None);
        assert_eq!(clean_item("1. 2. 3.", STRUCTURED_ITEM_LEN), None);
    }

    #[test]
    fn test_clean_item_caps_length() {
        let long = "a".repeat(500);
        let cleaned = clean_item(&long, STRUCTURED_ITEM_LEN).unwrap();
        // cap chars plus the appended period
        assert_eq!(cleaned.chars().count(), STRUCTURED_ITEM_LEN + 1);
        assert!(cleaned.ends_with('.'));
    }

    #[test]
    fn test_clean_item_idempotent_on_clean_input() {
        let once = clean_item("remove infected plant material promptly", STRUCTURED_ITEM_LEN)
            .expect("cleanable");
        let twice = clean_item(&once, STRUCTURED_ITEM_LEN).expect("cleanable");
        assert_eq!(once, twice);
    }

    proptest! {
        #[test]
        fn prop_clean_item_is_idempotent(raw in "[ a-zA-Z0-9,'()-]{6,400}") {
            if let Some(once) = clean_item(&raw, STRUCTURED_ITEM_LEN) {
                let twice = clean_item(&once, STRUCTURED_ITEM_LEN);
                prop_assert_eq!(Some(once), twice);
            }
        }

        #[test]
        fn prop_clean_item_well_formed(raw in "[ a-zA-Z0-9,;.'()-]{6,400}") {
            if let Some(item) = clean_item(&raw, STRUCTURED_ITEM_LEN) {
                prop_assert!(item.chars().count() <= STRUCTURED_ITEM_LEN + 1);
                prop_assert!(item.ends_with(['.', '!', '?', ':']));
                let first = item.chars().next().unwrap();
                prop_assert!(!first.is_lowercase());
            }
        }
    }
}
