//! Vocabulary fitting and count-matrix construction.

use std::collections::{HashMap, HashSet};

use ndarray::Array2;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

/// Word tokens, single characters included.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Document-frequency thresholds and n-gram order for a vocabulary fit.
#[derive(Debug, Clone)]
pub struct VocabularyOptions {
    /// Keep a token only if it appears in at least this many documents.
    pub min_df: usize,
    /// Keep a token only if it appears in at most this fraction of documents.
    pub max_df: f64,
    /// n-gram order; one order per build, not mixed.
    pub ngrams: usize,
}

impl Default for VocabularyOptions {
    fn default() -> Self {
        Self {
            min_df: 1,
            max_df: 1.0,
            ngrams: 1,
        }
    }
}

/// A bounded, lexicographically ordered token list fit over one corpus.
///
/// The same fitted vocabulary transforms both the report and the paper
/// text, so the two matrices share column order and token set.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
    ngrams: usize,
}

impl Vocabulary {
    /// Fit a vocabulary over `docs` under the given thresholds.
    pub fn fit(docs: &[String], options: &VocabularyOptions) -> Self {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for doc in docs {
            let seen: HashSet<String> = tokenize(doc, options.ngrams).into_iter().collect();
            for token in seen {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let max_count = options.max_df * docs.len() as f64;
        let mut tokens: Vec<String> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= options.min_df && (*df as f64) <= max_count)
            .map(|(token, _)| token)
            .collect();
        tokens.sort();

        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), i))
            .collect();
        info!(
            documents = docs.len(),
            tokens = tokens.len(),
            ngrams = options.ngrams,
            "fitted vocabulary"
        );
        Self {
            tokens,
            index,
            ngrams: options.ngrams,
        }
    }

    /// Transform documents into a counts matrix over the fitted vocabulary.
    ///
    /// Out-of-vocabulary tokens are ignored, so a document may map to an
    /// all-zero row.
    pub fn transform(&self, docs: &[String]) -> Array2<f64> {
        let mut counts = Array2::<f64>::zeros((docs.len(), self.tokens.len()));
        for (row, doc) in docs.iter().enumerate() {
            for token in tokenize(doc, self.ngrams) {
                if let Some(&col) = self.index.get(&token) {
                    counts[[row, col]] += 1.0;
                }
            }
        }
        counts
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Lowercase a document and emit n-grams of word tokens.
fn tokenize(text: &str, ngrams: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .collect();
    if ngrams <= 1 {
        return words.into_iter().map(|w| w.to_string()).collect();
    }
    if words.len() < ngrams {
        return Vec::new();
    }
    words
        .windows(ngrams)
        .map(|window| window.join(" "))
        .collect()
}
