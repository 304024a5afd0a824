//! Conservative auto-fix for quiz banks.
//!
//! Edits are limited to what cannot change the meaning of a question:
//! canonical schema fields, explanatory tails trimmed off distractors, and
//! distractors lengthened with a qualifier when the correct answer stands out
//! as the longest option. Correct answers are never shortened; a correct
//! answer that stands out as the shortest is reported for manual review.

use crate::analyzer::rules::{LengthCueStrategy, RobustLengthCue};
use crate::config::Config;
use crate::corpus::{canonicalize_question, CorpusError};
use crate::text::{normalize_answer, normalize_distractors, split_raw_options};
use crate::Extreme;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Appends allowed per distractor while lengthening
pub const MAX_APPEND_PER_DISTRACTOR: usize = 2;

const QUALIFIER_MAX_CHARS: usize = 120;
const FALLBACK_QUALIFIER: &str =
    " — this narrower interpretation is not supported by the course evidence.";

/// One kind of edit made to a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixKind {
    /// Field names, ids, difficulty or topic rewritten
    Schema,
    /// Text after a spaced dash removed from a distractor
    TrimmedTail,
    /// Distractors lengthened to remove a length cue
    LengthAdjusted,
    /// Length cue that cannot be fixed automatically
    ManualReview,
}

impl std::fmt::Display for FixKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixKind::Schema => write!(f, "schema"),
            FixKind::TrimmedTail => write!(f, "trimmed-tail"),
            FixKind::LengthAdjusted => write!(f, "length-adjusted"),
            FixKind::ManualReview => write!(f, "manual-review"),
        }
    }
}

/// Edits made to one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionFix {
    pub id: String,
    pub kinds: Vec<FixKind>,
}

impl QuestionFix {
    /// True when the question text was actually modified
    pub fn modified(&self) -> bool {
        self.kinds.iter().any(|k| *k != FixKind::ManualReview)
    }
}

/// Fix outcome for one file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixReport {
    pub file_path: PathBuf,
    pub questions: usize,
    pub fixes: Vec<QuestionFix>,
    /// Set when the file was rewritten
    pub backup: Option<PathBuf>,
}

impl FixReport {
    pub fn changed(&self) -> usize {
        self.fixes.iter().filter(|f| f.modified()).count()
    }
}

/// Remove an explanatory tail after a spaced em dash
pub fn trim_explanatory_tail(distractor: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s+—\s+").expect("valid dash regex"));
    match re.find(distractor) {
        Some(m) => distractor[..m.start()].trim().to_string(),
        None => distractor.trim().to_string(),
    }
}

/// First sentence of `text`, split at terminal punctuation followed by whitespace
pub fn first_sentence(text: &str) -> &str {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));
    let text = text.trim();
    match re.find(text) {
        Some(m) => text[..m.start()].trim(),
        None => text,
    }
}

/// Text appended to a distractor, drawn from the explanation when there is one
pub fn qualifier(explanation: Option<&str>) -> String {
    let sentence = first_sentence(explanation.unwrap_or(""));
    if sentence.is_empty() {
        return FALLBACK_QUALIFIER.to_string();
    }
    if sentence.chars().count() <= QUALIFIER_MAX_CHARS {
        return format!(" — {}", sentence);
    }
    let head: String = sentence.chars().take(QUALIFIER_MAX_CHARS).collect();
    let cut = head.rsplit_once(' ').map(|(left, _)| left).unwrap_or(&head);
    format!(" — {}...", cut)
}

/// Applies conservative fixes to corpus documents
pub struct QuizFixer {
    detector: RobustLengthCue,
    max_appends: usize,
}

impl QuizFixer {
    pub fn new() -> Self {
        Self {
            detector: RobustLengthCue::new(),
            max_appends: MAX_APPEND_PER_DISTRACTOR,
        }
    }

    /// Use the configured length-cue thresholds
    pub fn from_config(config: &Config) -> Self {
        Self {
            detector: RobustLengthCue::with_params(config.length_cue_params()),
            max_appends: MAX_APPEND_PER_DISTRACTOR,
        }
    }

    pub fn with_max_appends(mut self, max: usize) -> Self {
        self.max_appends = max;
        self
    }

    /// Fix every question of a parsed corpus document in place
    pub fn fix_document(&self, path: &Path, doc: &mut Value) -> Result<Vec<QuestionFix>, CorpusError> {
        let obj = doc.as_object_mut().ok_or_else(|| CorpusError::NotARecord {
            path: path.to_path_buf(),
        })?;
        let questions = obj
            .get_mut("questions")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| CorpusError::MissingQuestions {
                path: path.to_path_buf(),
            })?;

        let mut fixes = Vec::new();
        for (index, question) in questions.iter_mut().enumerate() {
            if let Some(fix) = self.fix_question(index, question) {
                fixes.push(fix);
            }
        }
        Ok(fixes)
    }

    /// Fix one question; None when nothing was done or needs attention
    pub fn fix_question(&self, index: usize, question: &mut Value) -> Option<QuestionFix> {
        let mut kinds = Vec::new();
        if canonicalize_question(index, question) {
            kinds.push(FixKind::Schema);
        }
        let obj = question.as_object_mut()?;
        let id = obj.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
        let correct = normalize_answer(obj.get("correctAnswer"));
        let explanation = obj.get("explanation").and_then(Value::as_str).map(str::to_string);

        let raw = split_raw_options(obj.get("distractors"));
        let trimmed: Vec<String> = raw.iter().map(|d| trim_explanatory_tail(d)).collect();
        if trimmed != raw {
            kinds.push(FixKind::TrimmedTail);
        }
        let mut distractors = normalize_distractors(&trimmed, &correct).distractors;

        if !distractors.is_empty() {
            let outcome = self.detector.evaluate(&correct, &distractors);
            if outcome.flagged {
                match outcome.stats.extreme {
                    Some(Extreme::Long) => {
                        let suffix = qualifier(explanation.as_deref());
                        let still_flagged = self.lengthen(&correct, &mut distractors, &suffix);
                        kinds.push(FixKind::LengthAdjusted);
                        if still_flagged {
                            kinds.push(FixKind::ManualReview);
                        }
                    }
                    _ => kinds.push(FixKind::ManualReview),
                }
            }
        }

        let rewritten = Value::Array(distractors.into_iter().map(Value::String).collect());
        if obj.get("distractors") != Some(&rewritten) {
            obj.insert("distractors".to_string(), rewritten);
        }

        if kinds.is_empty() {
            None
        } else {
            log::debug!("question {}: {:?}", id, kinds);
            Some(QuestionFix { id, kinds })
        }
    }

    /// Append `suffix` to distractors round-robin until the cue disappears or
    /// every distractor has had `max_appends`. Returns whether it is still flagged.
    fn lengthen(&self, correct: &str, distractors: &mut [String], suffix: &str) -> bool {
        let budget = self.max_appends * distractors.len();
        for appended in 0..budget {
            let i = appended % distractors.len();
            distractors[i].push_str(suffix);
            if !self.detector.evaluate(correct, distractors).flagged {
                return false;
            }
        }
        true
    }

    /// Fix a corpus file. Writes only when `write` is set and something
    /// changed, after copying the original to `<file>.bak`.
    pub fn fix_file(&self, path: &Path, write: bool) -> Result<FixReport> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus: {}", path.display()))?;
        let mut doc: Value = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in corpus: {}", path.display()))?;
        let fixes = self.fix_document(path, &mut doc)?;
        let questions = doc
            .get("questions")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        let mut report = FixReport {
            file_path: path.to_path_buf(),
            questions,
            fixes,
            backup: None,
        };

        if write && report.changed() > 0 {
            let mut backup = path.as_os_str().to_owned();
            backup.push(".bak");
            let backup = PathBuf::from(backup);
            fs::write(&backup, &text)
                .with_context(|| format!("Failed to write backup: {}", backup.display()))?;
            let mut out = serde_json::to_string_pretty(&doc)
                .with_context(|| format!("Failed to encode {}", path.display()))?;
            out.push('\n');
            fs::write(path, out).with_context(|| format!("Failed to write {}", path.display()))?;
            report.backup = Some(backup);
        }

        Ok(report)
    }
}

impl Default for QuizFixer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const LONG_CORRECT: &str = "A per unit tax equal to marginal external damage at the efficient \
        output level so that private and social marginal cost coincide";

    #[test]
    fn test_trim_explanatory_tail() {
        assert_eq!(
            trim_explanatory_tail("Durable goods — Durability requires long horizons"),
            "Durable goods"
        );
        assert_eq!(trim_explanatory_tail("  Plain option "), "Plain option");
        // an unspaced dash is part of the text
        assert_eq!(trim_explanatory_tail("Cost—benefit"), "Cost—benefit");
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("Taxes fix it. Quotas do not."), "Taxes fix it");
        assert_eq!(first_sentence("Only one sentence."), "Only one sentence.");
        assert_eq!(first_sentence("   "), "");
    }

    #[test]
    fn test_qualifier_variants() {
        assert_eq!(qualifier(Some("It internalizes damage. More text.")), " — It internalizes damage");
        assert_eq!(qualifier(None), FALLBACK_QUALIFIER);

        let long = "word ".repeat(40);
        let q = qualifier(Some(&long));
        assert!(q.ends_with("..."));
        assert!(q.chars().count() <= QUALIFIER_MAX_CHARS + " — ...".chars().count());
        assert!(!q.contains("wor..."));
    }

    #[test]
    fn test_lengthens_long_correct_answer() {
        let mut q = json!({
            "id": "q1",
            "correctAnswer": LONG_CORRECT,
            "distractors": ["Quota", "Subsidy", "Ban"],
            "explanation": "Pigouvian taxes price the externality. Other text."
        });
        let fix = QuizFixer::new().fix_question(0, &mut q).unwrap();
        assert!(fix.kinds.contains(&FixKind::LengthAdjusted));
        let ds: Vec<&str> = q["distractors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(ds[0].starts_with("Quota — Pigouvian taxes price the externality"));

        let strings: Vec<String> = ds.iter().map(|s| s.to_string()).collect();
        let still = RobustLengthCue::new().evaluate(LONG_CORRECT, &strings).flagged;
        assert_eq!(still, fix.kinds.contains(&FixKind::ManualReview));
    }

    #[test]
    fn test_append_budget_respected() {
        let mut q = json!({
            "id": "q1",
            "correctAnswer": LONG_CORRECT,
            "distractors": ["Quota", "Subsidy"],
            "explanation": "Short."
        });
        QuizFixer::new().fix_question(0, &mut q).unwrap();
        for d in q["distractors"].as_array().unwrap() {
            assert!(d.as_str().unwrap().matches(" — ").count() <= MAX_APPEND_PER_DISTRACTOR);
        }
    }

    #[test]
    fn test_short_cue_needs_manual_review() {
        let mut q = json!({
            "id": "q2",
            "correctAnswer": "Tax",
            "distractors": [
                "A subsidy paid to every consumer in proportion to purchases",
                "A quota assigned to every firm in proportion to past output",
                "A ban applied to every plant in proportion to emission levels"
            ]
        });
        let before = q["distractors"].clone();
        let fix = QuizFixer::new().fix_question(0, &mut q).unwrap();
        assert_eq!(fix.kinds, vec![FixKind::Schema, FixKind::ManualReview]);
        assert!(fix.modified());
        assert_eq!(q["distractors"], before);
        assert_eq!(q["correctAnswer"], "Tax");
    }

    #[test]
    fn test_clean_question_untouched() {
        let mut q = json!({
            "id": "q3",
            "questionText": "Which?",
            "correctAnswer": "Moral hazard",
            "distractors": ["Adverse selection", "Signaling"],
            "difficulty": 3,
            "topic": ["info"]
        });
        assert!(QuizFixer::new().fix_question(0, &mut q).is_none());
    }

    #[test]
    fn test_fix_file_dry_run_and_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("week1.json");
        let original = json!({
            "title": "Week 1",
            "questions": [
                {"id": "a", "correctAnswer": "Tax", "distractors": ["Subsidy — paid per unit", "Tax"], "difficulty": 2, "topic": []}
            ]
        })
        .to_string();
        fs::write(&path, &original).unwrap();

        let report = QuizFixer::new().fix_file(&path, false).unwrap();
        assert_eq!(report.changed(), 1);
        assert!(report.backup.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);

        let report = QuizFixer::new().fix_file(&path, true).unwrap();
        let backup = report.backup.unwrap();
        assert_eq!(backup, dir.path().join("week1.json.bak"));
        assert_eq!(fs::read_to_string(&backup).unwrap(), original);

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["questions"][0]["distractors"], json!(["Subsidy"]));
        let keys: Vec<&String> = written.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["title", "questions"]);
    }

    #[test]
    fn test_fix_document_requires_questions() {
        let mut doc = json!({"items": []});
        let err = QuizFixer::new()
            .fix_document(Path::new("x.json"), &mut doc)
            .unwrap_err();
        assert!(matches!(err, CorpusError::MissingQuestions { .. }));
    }
}
