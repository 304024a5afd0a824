//! quizlint: shortcut linter for multiple-choice quiz banks
//!
//! This library detects answer-selection shortcuts in quiz items (the correct
//! answer betrayed by its length, or distractors that are trivial negations of
//! it), classifies them as blocking or informational, and decides per corpus
//! file whether the share of blocking questions stays under a threshold.

pub mod analyzer;
pub mod config;
pub mod corpus;
pub mod fixer;
pub mod reporter;
pub mod text;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A multiple-choice quiz item as loaded from a corpus file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    /// Item identifier (numeric ids are stringified, missing ids become `q_NNN`)
    pub id: String,
    /// Question prompt, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    /// Correct answer (empty when absent)
    pub correct_answer: String,
    /// Raw answer options in source order, split but not yet normalized
    pub distractors: Vec<String>,
    /// Which field the options came from
    #[serde(default)]
    pub options_field: OptionsField,
    /// Explanation shown after answering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Difficulty 1-5
    pub difficulty: u8,
    /// Topic tags (deduplicated, source order)
    #[serde(default)]
    pub topic: Vec<String>,
}

/// Source field of the answer options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum OptionsField {
    /// `distractors`: incorrect options only
    #[default]
    Distractors,
    /// Legacy `options`: all options, correct answer included
    LegacyOptions,
    /// Neither field present
    Missing,
}

/// Kind of shortcut or structural problem found on a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagKind {
    /// Correct answer length alone betrays it
    LengthCue,
    /// A distractor is a trivial negation/antonym flip of the correct answer
    TooSimilar,
    /// A distractor equals the correct answer
    DuplicateCorrect,
    /// No usable distractors remain after normalization
    NoDistractors,
}

impl FlagKind {
    pub const ALL: [FlagKind; 4] = [
        FlagKind::LengthCue,
        FlagKind::TooSimilar,
        FlagKind::DuplicateCorrect,
        FlagKind::NoDistractors,
    ];

    /// Severity used when config does not override it
    pub fn default_severity(self) -> Severity {
        match self {
            FlagKind::TooSimilar => Severity::Informational,
            FlagKind::LengthCue | FlagKind::DuplicateCorrect | FlagKind::NoDistractors => {
                Severity::Blocking
            }
        }
    }

    /// Parse a kebab-case flag token
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.to_string() == token)
    }
}

impl std::fmt::Display for FlagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagKind::LengthCue => write!(f, "length-cue"),
            FlagKind::TooSimilar => write!(f, "too-similar"),
            FlagKind::DuplicateCorrect => write!(f, "duplicate-correct"),
            FlagKind::NoDistractors => write!(f, "no-distractors"),
        }
    }
}

/// Whether a flag counts toward the corpus failure ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blocking,
    Informational,
}

/// A flag attached to a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flag {
    pub kind: FlagKind,
    pub severity: Severity,
}

impl Flag {
    pub fn new(kind: FlagKind, severity: Severity) -> Self {
        Self { kind, severity }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Blocking
    }
}

/// Which end of the distractor distribution the correct answer sits at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extreme {
    Short,
    Long,
}

/// Per-question length statistics, recomputed on every run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthStats {
    /// Word count of the correct answer
    pub correct_words: usize,
    /// Word count of each distractor
    pub distractor_words: Vec<usize>,
    /// Median distractor word count
    pub median: f64,
    /// Median absolute deviation of distractor word counts
    pub mad: f64,
    /// |correct - median| / MAD (0 when MAD is 0)
    pub robust_z: f64,
    /// Coefficient of variation of distractor word counts
    pub cv: f64,
    /// Words between the correct answer and the nearest distractor on its extreme side
    pub nearest_gap: usize,
    /// Extreme side, if the correct answer sits at or beyond one
    pub extreme: Option<Extreme>,
}

/// A removed distractor that duplicated the correct answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateInfo {
    /// Position among the trimmed, non-empty options
    pub index: usize,
    /// Short preview of the removed text
    pub preview: String,
}

/// Numeric evidence behind a question's flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub length: LengthStats,
    /// Highest Jaccard similarity between the correct answer and any distractor
    pub max_similarity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<DuplicateInfo>,
}

impl Diagnostics {
    /// One-line evidence string for report rows
    pub fn detail(&self) -> String {
        let mut bits = vec![
            format!("len_ca={}", self.length.correct_words),
            format!("med_ds={:.1}", self.length.median),
            format!("gap={}", self.length.nearest_gap),
            format!("zMAD={:.2}", self.length.robust_z),
            format!("cv={:.2}", self.length.cv),
            format!("sim={:.2}", self.max_similarity),
        ];
        if let Some(ref dup) = self.duplicate {
            bits.push(format!("dup_idx={} prev='{}'", dup.index, dup.preview));
        }
        bits.join(" ")
    }
}

/// Classification of one question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReport {
    pub id: String,
    /// Flags to report (informational ones only when enabled)
    pub flags: Vec<Flag>,
    /// Absent when the question short-circuited on no distractors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

impl QuestionReport {
    /// True when any flag counts toward the failure ratio
    pub fn is_blocking(&self) -> bool {
        self.flags.iter().any(Flag::is_blocking)
    }

    pub fn has(&self, kind: FlagKind) -> bool {
        self.flags.iter().any(|f| f.kind == kind)
    }

    /// Space-joined flag tokens, each prefixed with a marker
    pub fn flag_tokens(&self) -> String {
        self.flags
            .iter()
            .map(|f| format!("❗{}", f.kind))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Evidence string, or a fixed note for short-circuited questions
    pub fn detail(&self) -> String {
        match self.diagnostics {
            Some(ref d) => d.detail(),
            None => "No distractors".to_string(),
        }
    }
}

/// Pass/fail decision for one corpus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub total_questions: usize,
    pub blocking_questions: usize,
    /// blocking / total (0 for an empty corpus)
    pub blocking_ratio: f64,
    pub threshold: f64,
    pub passed: bool,
}

/// Lint result for one corpus file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusReport {
    pub file_path: PathBuf,
    /// One entry per question, in corpus order
    pub questions: Vec<QuestionReport>,
    pub verdict: Verdict,
}

impl CorpusReport {
    /// Questions with at least one reported flag
    pub fn flagged(&self) -> impl Iterator<Item = &QuestionReport> {
        self.questions.iter().filter(|q| !q.flags.is_empty())
    }
}

/// A corpus file excluded from the run because it could not be loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCorpus {
    pub file_path: PathBuf,
    pub reason: String,
}

/// Public API: lint a single corpus file. Used by programmatic consumers.
///
/// * `path` - path to the corpus JSON file
/// * `work_dir` - directory for config lookup
/// * `config_path` - optional path to .quizlintrc.json; if None, searches from work_dir
pub fn lint_file(
    path: &std::path::Path,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<CorpusReport> {
    let config = crate::config::load_config(work_dir, config_path)?;
    let engine = crate::analyzer::LintEngine::from_config(&config);
    let corpus = crate::corpus::Corpus::load(path)?;
    Ok(engine.lint_corpus(&corpus, Some(&config)))
}
