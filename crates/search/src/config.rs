//! Index construction settings.

use crate::error::{Result, SearchError};
use crate::ngram::{MAX_GRAM_SIZE, MIN_GRAM_SIZE};
use crate::normalize::Normalizer;
use crate::scorer::Scorer;
use serde::{Deserialize, Serialize};

/// Settings fixed for the lifetime of an index.
///
/// Changing any of them on a live index goes through
/// [`Index::reconfigure`](crate::Index::reconfigure), which rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Length of the n-grams used as index keys (2..=5)
    pub gram_size: usize,
    /// Lowercase text before indexing
    pub case_fold: bool,
    /// Strip diacritics before indexing
    pub strip_diacritics: bool,
    /// Ranking strategy for shortlisted candidates
    pub scorer: Scorer,
    /// Upper bound on candidates scored per query (None for unbounded)
    pub max_candidates: Option<usize>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            gram_size: 3,
            case_fold: true,
            strip_diacritics: true,
            scorer: Scorer::default(),
            max_candidates: None,
        }
    }
}

impl IndexConfig {
    /// Sets the gram size.
    pub fn with_gram_size(mut self, gram_size: usize) -> Self {
        self.gram_size = gram_size;
        self
    }

    /// Sets the scoring strategy.
    pub fn with_scorer(mut self, scorer: Scorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Sets the shortlist cap.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = Some(max_candidates);
        self
    }

    /// Sets the normalization rules.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.case_fold = normalizer.case_fold;
        self.strip_diacritics = normalizer.strip_diacritics;
        self
    }

    /// The normalizer described by this config.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.case_fold, self.strip_diacritics)
    }

    /// Checks that every setting is in range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_GRAM_SIZE..=MAX_GRAM_SIZE).contains(&self.gram_size) {
            return Err(SearchError::invalid(format!(
                "gram_size must be between {} and {}, got {}",
                MIN_GRAM_SIZE, MAX_GRAM_SIZE, self.gram_size
            )));
        }
        if self.max_candidates == Some(0) {
            return Err(SearchError::invalid("max_candidates must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(IndexConfig::default().validate().is_ok());
    }

    #[test]
    fn test_gram_size_bounds() {
        assert!(IndexConfig::default().with_gram_size(1).validate().is_err());
        assert!(IndexConfig::default().with_gram_size(2).validate().is_ok());
        assert!(IndexConfig::default().with_gram_size(5).validate().is_ok());
        assert!(IndexConfig::default().with_gram_size(6).validate().is_err());
    }

    #[test]
    fn test_zero_candidates_rejected() {
        let err = IndexConfig::default().with_max_candidates(0).validate().unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: IndexConfig = serde_json::from_str(r#"{"gram_size": 2}"#).unwrap();
        assert_eq!(config.gram_size, 2);
        assert!(config.case_fold);
        assert_eq!(config.scorer, Scorer::NGramOverlap);
        assert_eq!(config.max_candidates, None);
    }
}
