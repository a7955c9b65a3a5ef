//! Text normalization and tokenization.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use unicode_segmentation::UnicodeSegmentation;

/// Normalization rules applied to both indexed text and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    /// Lowercase using Unicode case mapping
    pub case_fold: bool,
    /// Remove combining marks after canonical decomposition ("café" -> "cafe")
    pub strip_diacritics: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            case_fold: true,
            strip_diacritics: true,
        }
    }
}

impl Normalizer {
    /// Creates a normalizer with explicit rules.
    pub fn new(case_fold: bool, strip_diacritics: bool) -> Self {
        Self { case_fold, strip_diacritics }
    }

    /// Split `text` into normalized word tokens.
    ///
    /// Output is always in NFC, so precomposed and decomposed spellings of
    /// the same text produce the same tokens. Tokens follow Unicode word boundaries, so whitespace and punctuation
    /// never appear in the output. Empty input yields an empty sequence.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let folded = if self.case_fold {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let stripped = if self.strip_diacritics {
            strip_diacritics(&folded)
        } else {
            folded.nfc().collect()
        };

        stripped.unicode_words().map(str::to_string).collect()
    }
}

/// Normalize with the default rules (case folding and diacritic stripping).
///
/// # Example
/// ```
/// assert_eq!(fuzzysearch::normalize("Crème Brûlée!"), vec!["creme", "brulee"]);
/// ```
pub fn normalize(text: &str) -> Vec<String> {
    Normalizer::default().normalize(text)
}

fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}
