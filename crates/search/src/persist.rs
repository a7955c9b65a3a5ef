//! JSON persistence for [`Index`].
//!
//! The persisted form stores the config, every record's original text and
//! the posting-set mapping. Loading re-derives each record from its text and
//! rejects the file if the stored postings disagree with the derived ones.

use crate::config::IndexConfig;
use crate::error::{Result, SearchError};
use crate::index::Index;
use crate::RecordId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    id: RecordId,
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexSnapshot {
    version: u32,
    config: IndexConfig,
    records: Vec<StoredRecord>,
    postings: BTreeMap<String, Vec<RecordId>>,
}

impl From<&Index> for IndexSnapshot {
    fn from(index: &Index) -> Self {
        Self {
            version: FORMAT_VERSION,
            config: *index.config(),
            records: index
                .records()
                .map(|record| StoredRecord {
                    id: record.id(),
                    text: record.text().to_string(),
                })
                .collect(),
            postings: index
                .posting_map()
                .iter()
                .map(|(gram, ids)| (gram.clone(), ids.iter().copied().collect()))
                .collect(),
        }
    }
}

impl TryFrom<IndexSnapshot> for Index {
    type Error = SearchError;

    fn try_from(snapshot: IndexSnapshot) -> Result<Self> {
        if snapshot.version != FORMAT_VERSION {
            return Err(SearchError::CorruptIndex(format!(
                "unsupported format version {} (expected {})",
                snapshot.version, FORMAT_VERSION
            )));
        }
        snapshot
            .config
            .validate()
            .map_err(|e| SearchError::CorruptIndex(e.to_string()))?;

        let mut index = Index::with_config(snapshot.config)?;
        for record in snapshot.records {
            index.add(record.id, record.text).map_err(|e| match e {
                SearchError::DuplicateId(id) => {
                    SearchError::CorruptIndex(format!("record {} stored twice", id))
                }
                other => other,
            })?;
        }

        let stored: BTreeMap<String, BTreeSet<RecordId>> = snapshot
            .postings
            .into_iter()
            .map(|(gram, ids)| (gram, ids.into_iter().collect()))
            .collect();

        if &stored != index.posting_map() {
            return Err(SearchError::CorruptIndex(
                "stored postings do not match record text".to_string(),
            ));
        }

        Ok(index)
    }
}

impl Serialize for Index {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        IndexSnapshot::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Index {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let snapshot = IndexSnapshot::deserialize(deserializer)?;
        Index::try_from(snapshot).map_err(serde::de::Error::custom)
    }
}

impl Index {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load an index written by [`Index::to_json`].
    ///
    /// # Errors
    /// [`SearchError::Json`] for malformed JSON, [`SearchError::CorruptIndex`]
    /// if the content is well-formed but inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: IndexSnapshot = serde_json::from_str(json)?;
        Index::try_from(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scorer;

    fn sample() -> Index {
        let config = IndexConfig::default()
            .with_gram_size(2)
            .with_scorer(Scorer::EditDistance);
        let mut index = Index::with_config(config).unwrap();
        index.add(10, "Zoë's café").unwrap();
        index.add(3, "fuzzy search").unwrap();
        index.add(7, "").unwrap();
        index
    }

    #[test]
    fn test_round_trip() {
        let index = sample();
        let json = index.to_json().unwrap();
        let restored = Index::from_json(&json).unwrap();
        assert_eq!(restored, index);
        assert_eq!(restored.get(10).unwrap().text(), "Zoë's café");
    }

    #[test]
    fn test_round_trip_pretty_via_serde() {
        let index = sample();
        let json = index.to_json_pretty().unwrap();
        let restored: Index = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, index);
    }

    #[test]
    fn test_empty_round_trip() {
        let index = Index::new();
        assert_eq!(Index::from_json(&index.to_json().unwrap()).unwrap(), index);
    }

    #[test]
    fn test_snapshot_layout() {
        let mut index = Index::new();
        index.add(1, "ab").unwrap();
        let value: serde_json::Value = serde_json::from_str(&index.to_json().unwrap()).unwrap();
        assert_eq!(value["version"], FORMAT_VERSION);
        assert_eq!(value["records"][0]["text"], "ab");
        assert_eq!(value["postings"][" ab"], serde_json::json!([1]));
        assert_eq!(value["config"]["scorer"], "ngram_overlap");
    }

    #[test]
    fn test_tampered_postings_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        value["postings"]["qq"] = serde_json::json!([3]);
        let err = Index::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, SearchError::CorruptIndex(_)));
    }

    #[test]
    fn test_foreign_id_in_posting_rejected() {
        let index = sample();
        let gram = index.records().next().unwrap().grams().iter().next().unwrap().clone();
        let mut value: serde_json::Value = serde_json::from_str(&index.to_json().unwrap()).unwrap();
        value["postings"][gram.as_str()]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!(999));
        let err = Index::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, SearchError::CorruptIndex(_)));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        value["version"] = serde_json::json!(99);
        let err = Index::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, SearchError::CorruptIndex(_)));
    }

    #[test]
    fn test_duplicate_record_rejected() {
        let json = r#"{"version":1,"config":{},"records":[{"id":1,"text":"a"},{"id":1,"text":"a"}],"postings":{" a ":[1]}}"#;
        let err = Index::from_json(json).unwrap_err();
        assert!(matches!(err, SearchError::CorruptIndex(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Index::from_json("{not json"), Err(SearchError::Json(_))));
    }
}
