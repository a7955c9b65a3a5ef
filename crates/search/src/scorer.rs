//! Similarity scoring between a query and indexed records.

use crate::ngram::{GramSet, ngrams};
use serde::{Deserialize, Serialize};

/// Largest score a non-identical pair can receive. 1.0 is reserved for
/// identical normalized forms.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON;

/// Scoring strategy, fixed when the index is constructed.
///
/// Both strategies shortlist by n-gram overlap; they differ in how the
/// shortlist is ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scorer {
    /// Jaccard overlap of distinct n-grams
    #[default]
    #[serde(rename = "ngram_overlap")]
    NGramOverlap,
    /// Normalized Levenshtein similarity, applied to shortlisted candidates only
    #[serde(rename = "edit_distance")]
    EditDistance,
}

/// Normalized form of a text plus its n-grams, computed once per record or
/// query.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Profile {
    /// Tokens joined by single spaces
    pub form: String,
    pub grams: GramSet,
}

impl Profile {
    pub fn new(tokens: &[String], gram_size: usize) -> Self {
        Self {
            form: tokens.join(" "),
            grams: ngrams(tokens, gram_size),
        }
    }
}

impl Scorer {
    /// Score two normalized token sequences.
    ///
    /// Returns a value in `[0, 1]`: 1.0 for identical normalized forms,
    /// 0.0 when the two share no n-grams.
    ///
    /// # Example
    /// ```
    /// use fuzzysearch::{normalize, Scorer};
    ///
    /// let score = Scorer::NGramOverlap.score(&normalize("kitten"), &normalize("mitten"), 3);
    /// assert!((score - 0.5).abs() < 1e-9);
    /// ```
    pub fn score(&self, query: &[String], candidate: &[String], gram_size: usize) -> f64 {
        let query = Profile::new(query, gram_size);
        let candidate = Profile::new(candidate, gram_size);
        let shared = query.grams.intersection(&candidate.grams).count();
        self.rate(&query, &candidate, shared)
    }

    /// Score with a precomputed shared-gram count, as produced by the
    /// shortlist. Costs O(1) for `NGramOverlap`.
    pub(crate) fn rate(&self, query: &Profile, candidate: &Profile, shared: usize) -> f64 {
        if shared == 0 || query.grams.is_empty() || candidate.grams.is_empty() {
            return 0.0;
        }
        if query.form == candidate.form {
            return 1.0;
        }

        let raw = match self {
            Scorer::NGramOverlap => overlap(shared, query.grams.len(), candidate.grams.len()),
            Scorer::EditDistance => edit_similarity(&query.form, &candidate.form),
        };

        raw.clamp(0.0, BELOW_ONE)
    }
}

#[inline]
fn overlap(shared: usize, left: usize, right: usize) -> f64 {
    let union = left + right - shared;
    if union == 0 {
        return 0.0;
    }
    shared as f64 / union as f64
}

/// Jaccard similarity of two gram sets: `|a ∩ b| / |a ∪ b|`.
pub fn jaccard(a: &GramSet, b: &GramSet) -> f64 {
    let shared = a.intersection(b).count();
    overlap(shared, a.len(), b.len())
}

/// Calculate Levenshtein edit distance between two strings.
///
/// # Arguments
/// * `a` - First string
/// * `b` - Second string
///
/// # Returns
/// Number of single-character edits needed to transform a into b
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 { return n; }
    if n == 0 { return m; }

    // Two rows instead of the full matrix
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Levenshtein distance scaled to a similarity in `[0, 1]`:
/// `1 - distance / max(len_a, len_b)`, lengths in chars.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / longest as f64
}
