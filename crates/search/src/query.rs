//! Query engine: shortlist by shared n-grams, score, rank.

use crate::error::{Result, SearchError};
use crate::index::Index;
use crate::scorer::Profile;
use crate::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Default number of matches returned.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// A search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Raw query text, normalized with the index's rules
    pub text: String,
    /// Maximum number of matches to return (must be > 0)
    pub max_results: usize,
    /// Minimum score a match must reach, in `[0, 1]`
    pub min_score: f64,
}

impl Query {
    /// Creates a query with default limits.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            max_results: DEFAULT_MAX_RESULTS,
            min_score: 0.0,
        }
    }

    /// Sets the result limit.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the score threshold.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Checks the caller contract.
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(SearchError::invalid("max_results must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(SearchError::invalid(format!(
                "min_score must be within [0, 1], got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Id of the matched record
    pub id: RecordId,
    /// Similarity score in `[0, 1]`
    pub score: f64,
    /// Original text of the matched record
    pub text: String,
}

/// Counters describing one query run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    /// Distinct n-grams in the normalized query
    pub query_grams: usize,
    /// Candidates sharing at least one n-gram (after the candidate cap)
    pub shortlisted: usize,
    /// Candidates at or above `min_score`
    pub scored: usize,
    /// Matches returned after truncation
    pub returned: usize,
}

/// Pipeline stage, reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// Collecting candidates from posting sets
    Shortlisting,
    /// Scoring shortlisted candidates
    Scoring,
    /// Sorted and truncated
    Ranked,
}

/// Run `query` against `index`.
///
/// Returns matches ordered by descending score, ties broken by ascending
/// id. An empty query or an empty index yields no matches.
///
/// # Errors
/// [`SearchError::InvalidArgument`] if `max_results` is 0 or `min_score`
/// is outside `[0, 1]`.
pub fn query(index: &Index, query: &Query) -> Result<Vec<Match>> {
    query_with_stats(index, query).map(|(matches, _)| matches)
}

/// Like [`query`], also returning pipeline counters.
pub fn query_with_stats(index: &Index, query: &Query) -> Result<(Vec<Match>, QueryStats)> {
    query.validate()?;

    let config = index.config();
    let tokens = config.normalizer().normalize(&query.text);
    if tokens.is_empty() {
        return Ok((Vec::new(), QueryStats::default()));
    }

    let profile = Profile::new(&tokens, config.gram_size);
    let mut stats = QueryStats {
        query_grams: profile.grams.len(),
        ..QueryStats::default()
    };

    let candidates = shortlist(index, &profile);
    stats.shortlisted = candidates.len();
    debug!(phase = ?QueryPhase::Shortlisting, grams = stats.query_grams, candidates = stats.shortlisted);

    let mut scored = score_candidates(index, &profile, &candidates, query.min_score);
    stats.scored = scored.len();
    debug!(phase = ?QueryPhase::Scoring, kept = stats.scored, min_score = query.min_score);

    rank(&mut scored, query.max_results);
    let matches: Vec<Match> = scored
        .into_iter()
        .filter_map(|(id, score)| {
            index.get(id).map(|record| Match {
                id,
                score,
                text: record.text().to_string(),
            })
        })
        .collect();
    stats.returned = matches.len();
    debug!(phase = ?QueryPhase::Ranked, returned = stats.returned);

    Ok((matches, stats))
}

/// Count shared n-grams per record over the query's posting sets.
///
/// Records sharing no n-gram never appear. With `max_candidates` set, only
/// the records sharing the most n-grams are kept.
fn shortlist(index: &Index, profile: &Profile) -> Vec<(RecordId, usize)> {
    let mut shared: HashMap<RecordId, usize> = HashMap::new();
    for gram in &profile.grams {
        if let Some(ids) = index.postings(gram) {
            for id in ids {
                *shared.entry(*id).or_insert(0) += 1;
            }
        }
    }

    let mut candidates: Vec<(RecordId, usize)> = shared.into_iter().collect();
    if let Some(cap) = index.config().max_candidates {
        if candidates.len() > cap {
            candidates.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            candidates.truncate(cap);
        }
    }
    candidates
}

fn score_candidates(
    index: &Index,
    profile: &Profile,
    candidates: &[(RecordId, usize)],
    min_score: f64,
) -> Vec<(RecordId, f64)> {
    let rate = rater(index, profile, min_score);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        candidates.par_iter().filter_map(rate).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        candidates.iter().filter_map(rate).collect()
    }
}

/// Scores one shortlisted candidate, dropping it below `min_score`.
fn rater<'a>(
    index: &'a Index,
    profile: &'a Profile,
    min_score: f64,
) -> impl Fn(&(RecordId, usize)) -> Option<(RecordId, f64)> + Send + Sync + 'a {
    let scorer = index.config().scorer;
    move |&(id, shared): &(RecordId, usize)| {
        let record = index.get(id)?;
        let score = scorer.rate(profile, &record.profile, shared);
        trace!(id, shared, score, "Scored candidate");
        (score >= min_score).then_some((id, score))
    }
}

fn rank(scored: &mut Vec<(RecordId, f64)>, max_results: usize) {
    scored.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(max_results);
}
