//! In-memory fuzzy search over short texts.
//!
//! This crate provides:
//! - Unicode-aware normalization (case folding, diacritic stripping)
//! - An n-gram inverted index with incremental add/remove/replace
//! - Two-phase queries: n-gram shortlist, then Jaccard or edit-distance ranking
//! - Lossless JSON persistence
//! - WASM bindings for browser usage (`wasm` feature)
//!
//! # Example
//!
//! ```
//! use fuzzysearch::{build, Query};
//!
//! let index = build([(1, "kitten"), (2, "sitting"), (3, "mitten")]).unwrap();
//! let matches = index
//!     .query(&Query::new("kitten").with_max_results(2).with_min_score(0.3))
//!     .unwrap();
//!
//! assert_eq!(matches[0].id, 1);
//! assert_eq!(matches[0].score, 1.0);
//! assert_eq!(matches[1].id, 3);
//! ```

mod config;
mod error;
mod index;
mod ngram;
mod normalize;
mod persist;
pub mod query;
mod scorer;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::IndexConfig;
pub use error::{ErrorReport, Result, SearchError, SearchErrorCode};
pub use index::{Index, Record};
pub use ngram::{ngrams, GramSet, MAX_GRAM_SIZE, MIN_GRAM_SIZE};
pub use normalize::{normalize, Normalizer};
pub use persist::FORMAT_VERSION;
pub use query::{query, query_with_stats, Match, Query, QueryStats};
pub use scorer::{edit_similarity, jaccard, levenshtein_distance, Scorer};

/// Opaque record identifier, unique within an index.
pub type RecordId = u64;

/// Build an index with the default config from `(id, text)` pairs.
///
/// # Errors
/// [`SearchError::DuplicateId`] if an id appears twice.
pub fn build<I, T>(records: I) -> Result<Index>
where
    I: IntoIterator<Item = (RecordId, T)>,
    T: Into<String>,
{
    build_with_config(IndexConfig::default(), records)
}

/// Build an index with a custom config from `(id, text)` pairs.
pub fn build_with_config<I, T>(config: IndexConfig, records: I) -> Result<Index>
where
    I: IntoIterator<Item = (RecordId, T)>,
    T: Into<String>,
{
    let mut index = Index::with_config(config)?;
    for (id, text) in records {
        index.add(id, text)?;
    }
    tracing::debug!(records = index.len(), grams = index.gram_count(), "Built index");
    Ok(index)
}
