//! Local knowledge base
//!
//! The last fallback of the resolution chain: a static name -> record table
//! embedded at compile time. Lookups never perform I/O and the placeholder
//! path never fails, so the engine can always return something.

use crate::error::Result;
use crate::record::{InformationRecord, LOCAL_SOURCE};
use serde::Deserialize;
use std::collections::HashMap;

const BUILTIN_JSON: &str = include_str!("builtin.json");

/// One stored entry. Disease entries carry causes/effects/solutions/
/// prevention; healthy-leaf entries carry characteristics/maintenance,
/// which map onto the effects/solutions slots.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeEntry {
    pub description: String,
    #[serde(default)]
    pub causes: Vec<String>,
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default)]
    pub prevention: Vec<String>,
    #[serde(default)]
    pub characteristics: Vec<String>,
    #[serde(default)]
    pub maintenance: Vec<String>,
}

impl KnowledgeEntry {
    fn to_record(&self) -> InformationRecord {
        let mut record =
            InformationRecord::new(self.description.clone(), LOCAL_SOURCE.to_string(), true);
        record.causes = self.causes.clone();
        record.effects = if self.effects.is_empty() {
            self.characteristics.clone()
        } else {
            self.effects.clone()
        };
        record.solutions = if self.solutions.is_empty() {
            self.maintenance.clone()
        } else {
            self.solutions.clone()
        };
        record.prevention = self.prevention.clone();
        record
    }
}

/// Static name -> record lookup table
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: HashMap<String, KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Load the builtin table embedded in the binary
    pub fn builtin() -> Result<Self> {
        let entries: HashMap<String, KnowledgeEntry> = serde_json::from_str(BUILTIN_JSON)?;
        Ok(Self { entries })
    }

    /// Build from an externally supplied table
    pub fn new(entries: HashMap<String, KnowledgeEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-name lookup
    pub fn lookup(&self, entity_name: &str) -> Option<InformationRecord> {
        self.entries.get(entity_name).map(|e| e.to_record())
    }

    /// Lookup with the generic placeholder as fallback; never fails
    pub fn lookup_or_placeholder(&self, entity_name: &str) -> InformationRecord {
        self.lookup(entity_name)
            .unwrap_or_else(|| Self::placeholder(entity_name))
    }

    /// Generic record for entities the table does not know
    pub fn placeholder(entity_name: &str) -> InformationRecord {
        let mut record = InformationRecord::new(
            format!(
                "Disease information for {} not available in local database.",
                entity_name
            ),
            LOCAL_SOURCE.to_string(),
            false,
        );
        record.causes = vec!["Information not available - consult plant pathologist".to_string()];
        record.effects = vec!["Information not available - monitor plant symptoms".to_string()];
        record.solutions = vec![
            "Consult with local agricultural extension services".to_string(),
            "Apply general disease management practices".to_string(),
            "Seek professional diagnosis".to_string(),
        ];
        record.prevention = vec![
            "Follow general plant health practices".to_string(),
            "Use integrated pest management".to_string(),
            "Monitor crops regularly".to_string(),
        ];
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_loads() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert!(kb.len() >= 20);
    }

    #[test]
    fn test_lookup_disease_entry() {
        let kb = KnowledgeBase::builtin().unwrap();
        let record = kb.lookup("Apple Scab Leaf").unwrap();
        assert!(record.description.contains("fungal disease"));
        assert_eq!(record.source, LOCAL_SOURCE);
        assert!(record.is_structured);
        assert_eq!(record.causes.len(), 4);
        assert_eq!(record.effects.len(), 5);
    }

    #[test]
    fn test_healthy_entry_maps_characteristics_and_maintenance() {
        let kb = KnowledgeBase::builtin().unwrap();
        let record = kb.lookup("Apple leaf").unwrap();
        assert!(record.causes.is_empty());
        assert_eq!(record.effects.len(), 4);
        assert!(record.effects[0].contains("foliage"));
        assert_eq!(record.solutions.len(), 4);
        assert!(record.prevention.is_empty());
    }

    #[test]
    fn test_unknown_name_gets_placeholder() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert!(kb.lookup("Martian moss").is_none());
        let record = kb.lookup_or_placeholder("Martian moss");
        assert!(record.description.contains("Martian moss"));
        assert_eq!(record.source, LOCAL_SOURCE);
        assert!(!record.is_structured);
        assert!(!record.solutions.is_empty());
    }
}
