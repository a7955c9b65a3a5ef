//! N-gram inverted index over (id, text) records.

use crate::config::IndexConfig;
use crate::error::{Result, SearchError};
use crate::ngram::GramSet;
use crate::query::{Match, Query};
use crate::scorer::Profile;
use crate::RecordId;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Posting sets keyed by n-gram.
pub(crate) type Postings = BTreeMap<String, BTreeSet<RecordId>>;

/// An indexed record: original text plus its normalized form.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    text: String,
    tokens: Vec<String>,
    pub(crate) profile: Profile,
}

impl Record {
    pub(crate) fn new(id: RecordId, text: String, config: &IndexConfig) -> Self {
        let tokens = config.normalizer().normalize(&text);
        let profile = Profile::new(&tokens, config.gram_size);
        Self { id, text, tokens, profile }
    }

    /// Record id.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Original, unnormalized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Normalized tokens in text order.
    pub fn normalized_tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Distinct n-grams of the normalized tokens.
    pub fn grams(&self) -> &GramSet {
        &self.profile.grams
    }

    pub(crate) fn into_text(self) -> String {
        self.text
    }
}

/// In-memory fuzzy search index.
///
/// Records and their posting entries are created and destroyed together, so
/// after every completed call the postings are exactly what a fresh build of
/// the live records would produce. Mutation needs `&mut Index`; any number
/// of queries may share `&Index`.
///
/// # Example
/// ```
/// use fuzzysearch::{Index, Query};
///
/// let mut index = Index::new();
/// index.add(1, "kitten").unwrap();
/// index.add(2, "sitting").unwrap();
///
/// let matches = index.query(&Query::new("kiten")).unwrap();
/// assert_eq!(matches[0].id, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    config: IndexConfig,
    records: BTreeMap<RecordId, Record>,
    postings: Postings,
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

impl Index {
    /// Creates an empty index with the default config.
    pub fn new() -> Self {
        Self {
            config: IndexConfig::default(),
            records: BTreeMap::new(),
            postings: Postings::new(),
        }
    }

    /// Creates an empty index with a custom config.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Index a new record.
    ///
    /// Fails with [`SearchError::DuplicateId`] if `id` is already present,
    /// leaving the index untouched.
    pub fn add(&mut self, id: RecordId, text: impl Into<String>) -> Result<()> {
        if self.records.contains_key(&id) {
            return Err(SearchError::DuplicateId(id));
        }

        let record = Record::new(id, text.into(), &self.config);
        debug!(id, grams = record.grams().len(), "Adding record");
        self.insert_record(record);
        Ok(())
    }

    /// Remove a record and all of its posting entries.
    ///
    /// Posting sets left empty are pruned. Fails with
    /// [`SearchError::NotFound`] if `id` is absent.
    pub fn remove(&mut self, id: RecordId) -> Result<Record> {
        let record = self.records.remove(&id).ok_or(SearchError::NotFound(id))?;

        for gram in record.grams() {
            if let Some(ids) = self.postings.get_mut(gram) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.postings.remove(gram);
                }
            }
        }

        debug!(id, remaining = self.records.len(), "Removed record");
        Ok(record)
    }

    /// Replace the text of an existing record, returning the previous one.
    ///
    /// Fails with [`SearchError::NotFound`] if `id` is absent.
    pub fn replace(&mut self, id: RecordId, text: impl Into<String>) -> Result<Record> {
        if !self.records.contains_key(&id) {
            return Err(SearchError::NotFound(id));
        }

        let previous = self.remove(id)?;
        let record = Record::new(id, text.into(), &self.config);
        self.insert_record(record);
        Ok(previous)
    }

    /// Discard all derived data and rebuild it from the records' original
    /// text under the current config.
    pub fn rebuild(&mut self) {
        let texts = std::mem::take(&mut self.records)
            .into_iter()
            .map(|(id, record)| (id, record.into_text()));

        self.postings.clear();
        for (id, text) in texts {
            self.insert_record(Record::new(id, text, &self.config));
        }

        debug!(records = self.records.len(), grams = self.postings.len(), "Rebuilt index");
    }

    /// Install a new config and rebuild.
    ///
    /// Normalization rules and gram size can only change through this call.
    /// An invalid config is rejected and the index is left unchanged.
    pub fn reconfigure(&mut self, config: IndexConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.rebuild();
        Ok(())
    }

    /// Run a query against this index.
    pub fn query(&self, query: &Query) -> Result<Vec<Match>> {
        crate::query::query(self, query)
    }

    /// Index config.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no records are indexed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True if a record with `id` is indexed.
    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Look up a record by id.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// All records in ascending id order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Number of distinct n-gram keys.
    pub fn gram_count(&self) -> usize {
        self.postings.len()
    }

    /// Posting set for one n-gram, if any record contains it.
    pub fn postings(&self, gram: &str) -> Option<&BTreeSet<RecordId>> {
        self.postings.get(gram)
    }

    pub(crate) fn posting_map(&self) -> &Postings {
        &self.postings
    }

    fn insert_record(&mut self, record: Record) {
        for gram in record.grams() {
            self.postings.entry(gram.clone()).or_default().insert(record.id);
        }
        self.records.insert(record.id, record);
    }
}
