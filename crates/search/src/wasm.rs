//! WASM bindings for the search engine.
//!
//! These bindings let the demo page own an index in the browser and query it
//! on every keystroke. Ids cross the boundary as `RecordId` (`BigInt` in
//! JavaScript) so every id a record can carry is addressable. Structured
//! values travel as JSON strings, and thrown errors are JSON `{code, message}`
//! objects.

use crate::{ErrorReport, Index, IndexConfig, Query, RecordId, Scorer, SearchError};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct Item {
    id: RecordId,
    text: String,
}

fn to_js(e: impl Into<SearchError>) -> JsValue {
    JsValue::from_str(&error_json(&e.into()))
}

fn error_json(e: &SearchError) -> String {
    let report = ErrorReport::from(e);
    serde_json::to_string(&report).unwrap_or(report.message)
}

fn parse_config(config_json: Option<String>) -> Result<IndexConfig, JsValue> {
    match config_json {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(&json).map_err(to_js),
        _ => Ok(IndexConfig::default()),
    }
}

fn parse_items(items_json: &str) -> Result<Vec<Item>, JsValue> {
    serde_json::from_str(items_json).map_err(to_js)
}

/// A fuzzy search index owned by JavaScript.
#[wasm_bindgen]
pub struct FuzzyIndex {
    inner: Index,
}

#[wasm_bindgen]
impl FuzzyIndex {
    /// Create an empty index. `config_json` is an optional JSON `IndexConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FuzzyIndex, JsValue> {
        let config = parse_config(config_json)?;
        let inner = Index::with_config(config).map_err(to_js)?;
        Ok(FuzzyIndex { inner })
    }

    /// Build an index from a JSON array of `{id, text}` records.
    #[wasm_bindgen(js_name = fromRecords)]
    pub fn from_records(records_json: &str, config_json: Option<String>) -> Result<FuzzyIndex, JsValue> {
        let config = parse_config(config_json)?;
        let items = parse_items(records_json)?;
        let inner = crate::build_with_config(config, items.into_iter().map(|item| (item.id, item.text)))
            .map_err(to_js)?;
        Ok(FuzzyIndex { inner })
    }

    /// Load an index previously produced by `toJson`.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<FuzzyIndex, JsValue> {
        let inner = Index::from_json(json).map_err(to_js)?;
        Ok(FuzzyIndex { inner })
    }

    /// Add a record. Throws if the id is already present.
    pub fn add(&mut self, id: RecordId, text: &str) -> Result<(), JsValue> {
        self.inner.add(id, text).map_err(to_js)
    }

    /// Remove a record. Throws if the id is absent.
    pub fn remove(&mut self, id: RecordId) -> Result<(), JsValue> {
        self.inner.remove(id).map(|_| ()).map_err(to_js)
    }

    /// Replace a record's text. Throws if the id is absent.
    pub fn replace(&mut self, id: RecordId, text: &str) -> Result<(), JsValue> {
        self.inner.replace(id, text).map(|_| ()).map_err(to_js)
    }

    /// Rebuild all postings from the stored texts.
    pub fn rebuild(&mut self) {
        self.inner.rebuild();
    }

    /// Query the index.
    ///
    /// # Returns
    /// JSON array of `{id, score, text}` sorted by descending score
    pub fn query(&self, text: &str, max_results: u32, min_score: f64) -> Result<String, JsValue> {
        let query = Query::new(text)
            .with_max_results(max_results as usize)
            .with_min_score(min_score);
        let matches = self.inner.query(&query).map_err(to_js)?;
        serde_json::to_string(&matches).map_err(to_js)
    }

    /// Serialize the whole index to JSON.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.inner.to_json().map_err(to_js)
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if no records are indexed.
    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Normalize text and return the tokens as a JSON array.
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> String {
    serde_json::to_string(&crate::normalize(text)).unwrap_or_else(|_| "[]".to_string())
}

/// Trigram overlap similarity of two texts under the default rules (0-1).
#[wasm_bindgen]
pub fn similarity(a: &str, b: &str) -> f64 {
    Scorer::NGramOverlap.score(&crate::normalize(a), &crate::normalize(b), IndexConfig::default().gram_size)
}

/// Calculate Levenshtein edit distance between two strings.
#[wasm_bindgen]
pub fn edit_distance(a: &str, b: &str) -> usize {
    crate::levenshtein_distance(a, b)
}

/// Build a throwaway index over `items_json` and query it once.
///
/// # Arguments
/// * `query` - Search query
/// * `items_json` - JSON array of items with `id` and `text` fields
/// * `max_results` - Maximum results to return
///
/// # Returns
/// JSON array of matches with `id`, `score` and `text` fields, sorted by score
#[wasm_bindgen]
pub fn search_items(query: &str, items_json: &str, max_results: u32) -> Result<String, JsValue> {
    let items = parse_items(items_json)?;
    let index = crate::build(items.into_iter().map(|item| (item.id, item.text))).map_err(to_js)?;
    let query = Query::new(query).with_max_results(max_results as usize);
    let matches = index.query(&query).map_err(to_js)?;
    serde_json::to_string(&matches).map_err(to_js)
}
