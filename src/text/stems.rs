//! Word counting and crude stem extraction.
//!
//! The stemmer is intentionally lossy: it only needs to make "taxes" and
//! "tax" overlap, not to be linguistically right.

use super::Lexicon;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

const STEM_SUFFIXES: [&str; 4] = ["ing", "ed", "es", "s"];
const MIN_STEMMABLE_LEN: usize = 5;

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("valid word regex"))
}

fn alnum_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z0-9]+").expect("valid token regex"))
}

/// Number of word-character runs in `text`
pub fn word_count(text: &str) -> usize {
    word_regex().find_iter(text).count()
}

/// Strip at most one of `ing`, `ed`, `es`, `s` (in that order) from tokens
/// longer than 4 characters
pub fn stem(token: &str) -> String {
    let token = token.to_lowercase();
    if token.chars().count() >= MIN_STEMMABLE_LEN {
        for suffix in STEM_SUFFIXES {
            if let Some(stripped) = token.strip_suffix(suffix) {
                return stripped.to_string();
            }
        }
    }
    token
}

/// Content-bearing stems of `text`: lowercase alphanumeric runs minus
/// stopwords, each stemmed. Duplicates collapse.
pub fn content_stems(text: &str, lexicon: &Lexicon) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    alnum_regex()
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !lexicon.is_stopword(t))
        .map(stem)
        .collect()
}
