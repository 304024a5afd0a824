//! Quiz item schema: field aliases, value coercion and canonical rewriting.
//!
//! Corpora written by older tooling use `question`/`text` for the prompt,
//! `answer`/`correct` for the correct answer and `options` (all choices,
//! correct one included) instead of `distractors`. Lists may be stored as
//! semicolon-joined strings.

use crate::text::{normalize_answer, normalize_distractors, split_raw_options};
use crate::{OptionsField, QuizItem};
use serde_json::{Map, Value};

pub const QUESTION_TEXT_KEYS: [&str; 3] = ["questionText", "question", "text"];
pub const CORRECT_ANSWER_KEYS: [&str; 3] = ["correctAnswer", "answer", "correct"];

const DEFAULT_DIFFICULTY: u8 = 3;

/// First present key from `keys`, with its value
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter().find_map(|k| obj.get(*k).map(|v| (*k, v)))
}

/// Id for the question at zero-based `index`
pub fn item_id(raw: Option<&Value>, index: usize) -> String {
    let id = match raw {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    if id.is_empty() {
        format!("q_{:03}", index + 1)
    } else {
        id
    }
}

/// Difficulty as an integer 1..=5. Accepts integers, numeric strings and
/// names like "very easy" or "very_hard"; anything else is 3.
pub fn coerce_difficulty(raw: Option<&Value>) -> u8 {
    match raw {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => v.clamp(1, 5) as u8,
            None if n.as_u64().is_some() => 5,
            None => DEFAULT_DIFFICULTY,
        },
        Some(Value::String(s)) => {
            let s = s.trim().to_lowercase();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                return s.parse::<u64>().map(|v| v.clamp(1, 5) as u8).unwrap_or(5);
            }
            match s.as_str() {
                "very easy" | "very_easy" => 1,
                "easy" => 2,
                "medium" => 3,
                "hard" => 4,
                "very hard" | "very_hard" => 5,
                _ => DEFAULT_DIFFICULTY,
            }
        }
        _ => DEFAULT_DIFFICULTY,
    }
}

/// Topic tags. A string is split on `;`, `:`, `/` and `,`.
pub fn topic_list(raw: Option<&Value>) -> Vec<String> {
    let parts: Vec<String> = match raw {
        Some(Value::Array(items)) => items.iter().map(scalar_text).collect(),
        Some(Value::String(s)) => s
            .replace('\u{2013}', "-")
            .split(|c| matches!(c, ';' | ':' | '/' | ','))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    let mut out: Vec<String> = Vec::new();
    for part in parts {
        let part = part.trim();
        if !part.is_empty() && !out.iter().any(|t| t == part) {
            out.push(part.to_string());
        }
    }
    out
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// An option list value: a string or an array. `null` and other shapes count as absent.
fn option_list(v: Option<&Value>) -> Option<&Value> {
    v.filter(|v| matches!(v, Value::String(_) | Value::Array(_)))
}

fn optional_text(v: Option<&Value>) -> Option<String> {
    v.map(scalar_text).filter(|s| !s.is_empty())
}

/// Build a `QuizItem` from one element of the `questions` array.
///
/// Non-object elements become an empty item, which classifies as having no
/// distractors.
pub fn parse_item(index: usize, raw: &Value) -> QuizItem {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let (options_field, options) = if let Some(v) = option_list(obj.get("distractors")) {
        (OptionsField::Distractors, split_raw_options(Some(v)))
    } else if let Some(v) = option_list(obj.get("options")) {
        (OptionsField::LegacyOptions, split_raw_options(Some(v)))
    } else {
        (OptionsField::Missing, Vec::new())
    };

    QuizItem {
        id: item_id(obj.get("id"), index),
        question_text: optional_text(lookup(obj, &QUESTION_TEXT_KEYS).map(|(_, v)| v)),
        correct_answer: normalize_answer(lookup(obj, &CORRECT_ANSWER_KEYS).map(|(_, v)| v)),
        distractors: options,
        options_field,
        explanation: optional_text(obj.get("explanation")),
        difficulty: coerce_difficulty(obj.get("difficulty")),
        topic: topic_list(obj.get("topic")),
    }
}

/// Rebuild `obj` with `from` renamed to `to`, keeping key position
fn rename_key(obj: &mut Map<String, Value>, from: &str, to: &str) {
    *obj = std::mem::take(obj)
        .into_iter()
        .map(|(k, v)| if k == from { (to.to_string(), v) } else { (k, v) })
        .collect();
}

/// Rebuild `obj` without the given keys
fn drop_keys(obj: &mut Map<String, Value>, keys: &[&str]) {
    *obj = std::mem::take(obj)
        .into_iter()
        .filter(|(k, _)| !keys.contains(&k.as_str()))
        .collect();
}

/// Move the first present alias to `canonical` and drop the rest. Returns true
/// when the object changed.
fn canonicalize_alias(obj: &mut Map<String, Value>, keys: &[&'static str]) -> bool {
    let canonical = keys[0];
    let Some((found, _)) = lookup(obj, keys) else {
        return false;
    };
    let aliases: Vec<&str> = keys[1..].iter().copied().filter(|k| obj.contains_key(*k)).collect();
    if found != canonical {
        rename_key(obj, found, canonical);
    }
    let leftovers: Vec<&str> = aliases.into_iter().filter(|k| *k != found).collect();
    drop_keys(obj, &leftovers);
    found != canonical || !leftovers.is_empty()
}

/// Rewrite one question object into the canonical schema in place:
/// canonical field names, trimmed text, an id, normalized `distractors`
/// without the correct answer, integer difficulty and a topic list.
///
/// Returns true when anything changed.
pub fn canonicalize_question(index: usize, value: &mut Value) -> bool {
    let Some(obj) = value.as_object_mut() else {
        return false;
    };
    let before = obj.clone();

    canonicalize_alias(obj, &QUESTION_TEXT_KEYS);
    if let Some(Value::String(s)) = obj.get_mut("questionText") {
        *s = s.trim().to_string();
    }

    let id = item_id(obj.get("id"), index);
    obj.insert("id".to_string(), Value::String(id));

    canonicalize_alias(obj, &CORRECT_ANSWER_KEYS);
    let mut correct = normalize_answer(obj.get("correctAnswer"));

    if obj.contains_key("options") {
        if option_list(obj.get("distractors")).is_some() {
            drop_keys(obj, &["options"]);
        } else {
            drop_keys(obj, &["distractors"]);
            rename_key(obj, "options", "distractors");
        }
    }

    let raw = split_raw_options(obj.get("distractors"));
    let mut distractors = normalize_distractors(&raw, &correct).distractors;
    if correct.is_empty() && !distractors.is_empty() {
        correct = distractors.remove(0);
    }
    if obj.contains_key("correctAnswer") || !correct.is_empty() {
        obj.insert("correctAnswer".to_string(), Value::String(correct));
    }
    obj.insert(
        "distractors".to_string(),
        Value::Array(distractors.into_iter().map(Value::String).collect()),
    );

    let difficulty = coerce_difficulty(obj.get("difficulty"));
    obj.insert("difficulty".to_string(), Value::from(difficulty));
    let topic = topic_list(obj.get("topic"));
    obj.insert(
        "topic".to_string(),
        Value::Array(topic.into_iter().map(Value::String).collect()),
    );

    *obj != before
}
