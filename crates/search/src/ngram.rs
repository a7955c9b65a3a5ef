//! N-gram extraction from normalized tokens.

use std::collections::BTreeSet;

/// Distinct n-grams of a record or query, in lexicographic order.
pub type GramSet = BTreeSet<String>;

/// Boundary marker padded around each token.
const PAD: char = ' ';

/// Smallest supported gram size.
pub const MIN_GRAM_SIZE: usize = 2;

/// Largest supported gram size.
pub const MAX_GRAM_SIZE: usize = 5;

/// Extract the distinct n-grams of a token sequence.
///
/// Each token is padded with one boundary marker on both sides and cut into
/// every window of `size` chars. Grams never span two tokens. A padded token
/// shorter than `size` becomes a single gram, so one-letter words stay
/// searchable with larger gram sizes.
///
/// # Example
/// ```
/// let grams = fuzzysearch::ngrams(&["kitten".to_string()], 3);
/// assert!(grams.contains(" ki"));
/// assert!(grams.contains("itt"));
/// assert!(grams.contains("en "));
/// assert_eq!(grams.len(), 6);
/// ```
pub fn ngrams(tokens: &[String], size: usize) -> GramSet {
    let mut grams = GramSet::new();
    for token in tokens {
        extend_token(&mut grams, token, size);
    }
    grams
}

fn extend_token(grams: &mut GramSet, token: &str, size: usize) {
    if token.is_empty() || size == 0 {
        return;
    }

    let padded: Vec<char> = std::iter::once(PAD)
        .chain(token.chars())
        .chain(std::iter::once(PAD))
        .collect();

    if padded.len() <= size {
        grams.insert(padded.into_iter().collect());
        return;
    }

    for window in padded.windows(size) {
        grams.insert(window.iter().collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_trigrams_basic() {
        let grams = ngrams(&tokens(&["hello"]), 3);
        let expected: GramSet = [" he", "hel", "ell", "llo", "lo "]
            .iter()
            .map(|g| g.to_string())
            .collect();
        assert_eq!(grams, expected);
    }

    #[test]
    fn test_empty_tokens() {
        assert!(ngrams(&[], 3).is_empty());
        assert!(ngrams(&tokens(&[""]), 3).is_empty());
    }

    #[test]
    fn test_short_token_kept_whole() {
        let grams = ngrams(&tokens(&["a"]), 4);
        assert_eq!(grams.len(), 1);
        assert!(grams.contains(" a "));
    }

    #[test]
    fn test_deduplicates() {
        // " aaaa " -> " aa", "aaa", "aa "
        let grams = ngrams(&tokens(&["aaaa"]), 3);
        assert_eq!(grams.len(), 3);
    }

    #[test]
    fn test_grams_do_not_span_tokens() {
        let grams = ngrams(&tokens(&["ab", "cd"]), 3);
        assert!(!grams.contains("b c"));
        assert!(grams.contains(" ab"));
        assert!(grams.contains("cd "));
    }

    #[test]
    fn test_multibyte_chars() {
        // Windows are taken over chars, not bytes.
        let grams = ngrams(&tokens(&["日本語"]), 2);
        assert!(grams.contains("日本"));
        assert!(grams.contains("本語"));
        assert_eq!(grams.len(), 4);
    }

    #[test]
    fn test_bigrams() {
        let grams = ngrams(&tokens(&["ab"]), 2);
        let expected: GramSet = [" a", "ab", "b "].iter().map(|g| g.to_string()).collect();
        assert_eq!(grams, expected);
    }
}
