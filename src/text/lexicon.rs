//! Word tables consulted by stem extraction and the similarity analyzer.
//!
//! Stopwords are matched on raw lowercase tokens. Negations and antonym
//! pairs are stored in stem space so they compare against extracted stems.

use super::stems::stem;
use std::collections::HashSet;

pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "of", "to", "in", "on", "for", "with", "by", "at", "as", "is",
    "are", "was", "were", "be", "being", "been", "that", "this", "these", "those", "from", "over",
    "under", "into", "out", "up", "down", "than", "then", "also", "only",
];

pub const DEFAULT_NEGATIONS: &[&str] = &["not", "never", "no", "non"];

pub const DEFAULT_ANTONYMS: &[(&str, &str)] = &[
    ("equal", "differ"),
    ("equals", "differs"),
    ("marginal", "average"),
    ("mrs", "mrt"),
    ("public", "private"),
    ("pigouvian", "uniform"),
    ("tax", "subsidy"),
    ("separating", "pooling"),
    ("full", "partial"),
    ("rival", "nonrival"),
];

/// Stopword, negation and antonym tables
#[derive(Debug, Clone)]
pub struct Lexicon {
    stopwords: HashSet<String>,
    negations: HashSet<String>,
    antonyms: HashSet<(String, String)>,
}

impl Lexicon {
    /// Empty tables
    pub fn empty() -> Self {
        Self {
            stopwords: HashSet::new(),
            negations: HashSet::new(),
            antonyms: HashSet::new(),
        }
    }

    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords
            .extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
        self
    }

    pub fn with_negations<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.negations
            .extend(words.into_iter().map(|w| stem(w.as_ref().trim())));
        self
    }

    /// Add antonym pairs; each pair matches in both directions
    pub fn with_antonyms<I, S>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        for (a, b) in pairs {
            let a = stem(a.as_ref().trim());
            let b = stem(b.as_ref().trim());
            if a.is_empty() || b.is_empty() || a == b {
                continue;
            }
            self.antonyms.insert((a.clone(), b.clone()));
            self.antonyms.insert((b, a));
        }
        self
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn is_negation(&self, stem: &str) -> bool {
        self.negations.contains(stem)
    }

    pub fn are_antonyms(&self, a: &str, b: &str) -> bool {
        self.antonyms.contains(&(a.to_string(), b.to_string()))
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::empty()
            .with_stopwords(DEFAULT_STOPWORDS.iter().copied())
            .with_negations(DEFAULT_NEGATIONS.iter().copied())
            .with_antonyms(DEFAULT_ANTONYMS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn antonyms_are_stemmed_and_symmetric() {
        let lex = Lexicon::default();
        assert!(lex.are_antonyms("pool", "separat"));
        assert!(lex.are_antonyms("separat", "pool"));
        assert!(lex.are_antonyms("tax", "subsidy"));
        assert!(!lex.are_antonyms("tax", "tax"));
    }

    #[test]
    fn negations_and_stopwords() {
        let lex = Lexicon::default();
        assert!(lex.is_negation("not"));
        assert!(lex.is_negation("never"));
        assert!(lex.is_stopword("the"));
        assert!(!lex.is_stopword("tax"));
    }

    #[test]
    fn extension_adds_to_defaults() {
        let lex = Lexicon::default()
            .with_stopwords(["Which"])
            .with_antonyms([("surplus", "deficit")]);
        assert!(lex.is_stopword("which"));
        assert!(lex.are_antonyms("deficit", "surplus"));
        assert!(lex.are_antonyms("mrt", "mrs"));
    }
}
