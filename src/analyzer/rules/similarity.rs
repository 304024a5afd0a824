//! Near-duplicate detection between the correct answer and each distractor.
//!
//! A distractor is "too similar" when its stem set overlaps the correct
//! answer's by Jaccard >= `min_similarity` and the difference is a trivial
//! flip: a negation or an antonym swap on a handful of stems. High overlap
//! alone is normal in a well-written option set and stays quiet.

use crate::text::{content_stems, Lexicon};
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimilarityParams {
    pub min_similarity: f64,
    /// Largest per-side difference still treated as a flip
    pub max_flip_stems: usize,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            min_similarity: 0.9,
            max_flip_stems: 2,
        }
    }
}

/// |A ∩ B| / |A ∪ B|, with 0.0 when both sets are empty
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimilarityOutcome {
    /// Highest Jaccard against any distractor
    pub max_similarity: f64,
    /// Some distractor is both close and a trivial flip of the correct answer
    pub too_similar: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SimilarityAnalyzer {
    lexicon: Lexicon,
    params: SimilarityParams,
}

impl SimilarityAnalyzer {
    pub fn new(lexicon: Lexicon, params: SimilarityParams) -> Self {
        Self { lexicon, params }
    }

    /// Does the symmetric difference amount to a negation or antonym swap?
    pub fn is_trivial_flip(&self, a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
        let only_a: Vec<&String> = a.difference(b).collect();
        let only_b: Vec<&String> = b.difference(a).collect();

        if only_a.is_empty() && only_b.is_empty() {
            return false;
        }
        let max = self.params.max_flip_stems;
        if only_a.len() > max || only_b.len() > max {
            return false;
        }

        let negated = only_a
            .iter()
            .chain(only_b.iter())
            .any(|s| self.lexicon.is_negation(s));
        if negated {
            return true;
        }

        only_a
            .iter()
            .any(|x| only_b.iter().any(|y| self.lexicon.are_antonyms(x, y)))
    }

    pub fn analyze(&self, correct: &str, distractors: &[String]) -> SimilarityOutcome {
        let ca = content_stems(correct, &self.lexicon);
        let mut out = SimilarityOutcome::default();
        for d in distractors {
            let ds = content_stems(d, &self.lexicon);
            let sim = jaccard(&ca, &ds);
            if sim > out.max_similarity {
                out.max_similarity = sim;
            }
            if sim >= self.params.min_similarity && self.is_trivial_flip(&ca, &ds) {
                out.too_similar = true;
            }
        }
        out
    }
}
