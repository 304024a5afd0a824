//! Answer-option normalization.
//!
//! Raw options arrive as a list, a semicolon-joined string, or nothing at all.
//! Normalization trims, drops empties, dedupes (first occurrence wins) and
//! removes entries equal to the correct answer. It never fails.

use crate::DuplicateInfo;
use serde_json::Value;
use std::collections::HashSet;

const PREVIEW_CHARS: usize = 8;

/// Result of normalizing one question's options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedOptions {
    /// Trimmed, non-empty, unique distractors in source order
    pub distractors: Vec<String>,
    /// First removed entry that equaled the correct answer
    pub duplicate: Option<DuplicateInfo>,
}

/// Normalize a correct-answer value. Strings are trimmed, numbers and
/// booleans stringified, anything else is empty.
pub fn normalize_answer(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Split a raw options value into strings without further cleanup.
///
/// A string is split on `;`. List elements that are strings, numbers or
/// booleans are kept; nulls and nested values are skipped.
pub fn split_raw_options(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::String(s)) => s.split(';').map(str::to_string).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalize a raw options value against the (already normalized) correct answer
pub fn normalize_options(raw: Option<&Value>, correct: &str) -> NormalizedOptions {
    normalize_distractors(&split_raw_options(raw), correct)
}

/// Normalize already-split options against the correct answer
pub fn normalize_distractors<S: AsRef<str>>(raw: &[S], correct: &str) -> NormalizedOptions {
    let correct = correct.trim();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = NormalizedOptions::default();

    let trimmed = raw.iter().map(|s| s.as_ref().trim()).filter(|s| !s.is_empty());
    for (index, option) in trimmed.enumerate() {
        if option == correct {
            if out.duplicate.is_none() {
                out.duplicate = Some(DuplicateInfo {
                    index,
                    preview: preview(option),
                });
            }
            continue;
        }
        if seen.insert(option) {
            out.distractors.push(option.to_string());
        }
    }
    out
}

fn preview(s: &str) -> String {
    if s.chars().count() > PREVIEW_CHARS {
        let head: String = s.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
