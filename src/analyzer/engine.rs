//! Lint engine - classifies questions and lints corpora

use crate::config::{Config, EffectiveConfig};
use crate::corpus::Corpus;
use crate::text::normalize_distractors;
use crate::{
    CorpusReport, Diagnostics, Flag, FlagKind, OptionsField, QuestionReport, QuizItem, Severity,
    SkippedCorpus,
};
use std::path::{Path, PathBuf};

use super::rules::{LengthCueStrategy, RobustLengthCue, SimilarityAnalyzer};
use super::VerdictCalculator;

/// Main lint engine: one length-cue strategy plus the similarity analyzer
pub struct LintEngine {
    length: Box<dyn LengthCueStrategy>,
    similarity: SimilarityAnalyzer,
    /// Whether informational flags appear in reports
    report_informational: bool,
}

impl LintEngine {
    /// Engine with built-in defaults
    pub fn new() -> Self {
        Self {
            length: Box::new(RobustLengthCue::new()),
            similarity: SimilarityAnalyzer::default(),
            report_informational: false,
        }
    }

    /// Engine configured from a loaded config (lexicon, detector params, reporting)
    pub fn from_config(config: &Config) -> Self {
        Self {
            length: Box::new(RobustLengthCue::with_params(config.length_cue_params())),
            similarity: SimilarityAnalyzer::new(config.build_lexicon(), config.similarity_params()),
            report_informational: config.report_informational(),
        }
    }

    /// Swap the length-cue strategy
    pub fn with_length_strategy(mut self, strategy: Box<dyn LengthCueStrategy>) -> Self {
        self.length = strategy;
        self
    }

    pub fn with_report_informational(mut self, report: bool) -> Self {
        self.report_informational = report;
        self
    }

    pub fn length_strategy(&self) -> &dyn LengthCueStrategy {
        self.length.as_ref()
    }

    /// Classify one question. Pure: same item and config give the same report.
    pub fn classify(&self, item: &QuizItem, effective: &EffectiveConfig) -> QuestionReport {
        let correct = item.correct_answer.trim();
        let normalized = normalize_distractors(&item.distractors, correct);

        // Legacy `options` lists carry the correct answer on purpose
        let duplicate = match item.options_field {
            OptionsField::LegacyOptions => None,
            _ => normalized.duplicate,
        };

        let mut raised = Vec::new();
        if duplicate.is_some() {
            raised.push(FlagKind::DuplicateCorrect);
        }

        if normalized.distractors.is_empty() {
            raised.push(FlagKind::NoDistractors);
            return QuestionReport {
                id: item.id.clone(),
                flags: self.apply_severities(&raised, effective),
                diagnostics: None,
            };
        }

        let length = self.length.evaluate(correct, &normalized.distractors);
        if length.flagged {
            raised.push(FlagKind::LengthCue);
        }

        let similarity = self.similarity.analyze(correct, &normalized.distractors);
        if similarity.too_similar {
            raised.push(FlagKind::TooSimilar);
        }

        QuestionReport {
            id: item.id.clone(),
            flags: self.apply_severities(&raised, effective),
            diagnostics: Some(Diagnostics {
                length: length.stats,
                max_similarity: similarity.max_similarity,
                duplicate,
            }),
        }
    }

    /// Map raised flags through config severities, dropping disabled ones and
    /// hidden informational ones
    fn apply_severities(&self, raised: &[FlagKind], effective: &EffectiveConfig) -> Vec<Flag> {
        raised
            .iter()
            .filter_map(|&kind| {
                let severity = effective.severity_for(kind)?;
                if severity == Severity::Informational && !self.report_informational {
                    return None;
                }
                Some(Flag::new(kind, severity))
            })
            .collect()
    }

    /// Lint every question of a corpus and compute its verdict
    pub fn lint_corpus(&self, corpus: &Corpus, config: Option<&Config>) -> CorpusReport {
        let effective = config
            .map(|c| c.effective_for_file(&corpus.path))
            .unwrap_or_default();

        let questions: Vec<QuestionReport> = corpus
            .items
            .iter()
            .map(|item| self.classify(item, &effective))
            .collect();
        let verdict = VerdictCalculator::calculate(&questions, effective.threshold);

        log::debug!(
            "{}: {}/{} blocking questions (threshold {:.2})",
            corpus.path.display(),
            verdict.blocking_questions,
            verdict.total_questions,
            verdict.threshold
        );

        CorpusReport {
            file_path: corpus.path.clone(),
            questions,
            verdict,
        }
    }

    /// Load and lint one file
    pub fn lint_path(&self, path: &Path, config: Option<&Config>) -> Result<CorpusReport, SkippedCorpus> {
        match Corpus::load(path) {
            Ok(corpus) => Ok(self.lint_corpus(&corpus, config)),
            Err(e) => {
                log::debug!("skipping {}: {}", path.display(), e);
                Err(SkippedCorpus {
                    file_path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Lint files sequentially
    pub fn lint_many(&self, paths: &[PathBuf], config: Option<&Config>) -> LintRun {
        LintRun::collect(paths.iter().map(|p| self.lint_path(p, config)))
    }

    /// Lint files in parallel using rayon. Corpora share no state, so the
    /// result equals `lint_many` after sorting.
    pub fn lint_parallel(&self, paths: &[PathBuf], config: Option<&Config>) -> LintRun {
        use rayon::prelude::*;

        let results: Vec<_> = paths.par_iter().map(|p| self.lint_path(p, config)).collect();
        LintRun::collect(results)
    }

    /// Aggregate statistics over linted corpora
    pub fn aggregate_stats(reports: &[CorpusReport]) -> AggregateStats {
        let mut stats = AggregateStats {
            files_linted: reports.len(),
            ..AggregateStats::default()
        };
        for report in reports {
            stats.total_questions += report.verdict.total_questions;
            stats.blocking_questions += report.verdict.blocking_questions;
            stats.flagged_questions += report.flagged().count();
            if !report.verdict.passed {
                stats.files_failed += 1;
            }
        }
        stats
    }
}

impl Default for LintEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of linting several files
#[derive(Debug, Default)]
pub struct LintRun {
    /// Reports sorted by path
    pub reports: Vec<CorpusReport>,
    /// Files that could not be loaded, sorted by path
    pub skipped: Vec<SkippedCorpus>,
}

impl LintRun {
    fn collect<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<CorpusReport, SkippedCorpus>>,
    {
        let mut run = LintRun::default();
        for result in results {
            match result {
                Ok(report) => run.reports.push(report),
                Err(skipped) => run.skipped.push(skipped),
            }
        }
        run.reports.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        run.skipped.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        run
    }

    /// True when every linted corpus passed
    pub fn passed(&self) -> bool {
        self.reports.iter().all(|r| r.verdict.passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &CorpusReport> {
        self.reports.iter().filter(|r| !r.verdict.passed)
    }
}

/// Aggregate statistics from multiple corpora
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub files_linted: usize,
    pub files_failed: usize,
    pub total_questions: usize,
    pub blocking_questions: usize,
    /// Questions with at least one reported flag
    pub flagged_questions: usize,
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Reported length-cue questions always have the correct answer at an extreme
        #[test]
        fn length_cue_implies_extreme(
            correct in 1usize..60,
            ds in prop::collection::vec(1usize..60, 1..6)
        ) {
            let distractors: Vec<String> = ds
                .iter()
                .enumerate()
                .map(|(i, &n)| format!("d{} {}", i, words(n.saturating_sub(1))).trim().to_string())
                .collect();
            let q = QuizItem {
                id: "p".to_string(),
                question_text: None,
                correct_answer: words(correct),
                distractors,
                options_field: OptionsField::Distractors,
                explanation: None,
                difficulty: 3,
                topic: Vec::new(),
            };
            let report = LintEngine::new().classify(&q, &EffectiveConfig::default());
            if report.has(FlagKind::LengthCue) {
                let d = report.diagnostics.unwrap();
                let min = *d.length.distractor_words.iter().min().unwrap();
                let max = *d.length.distractor_words.iter().max().unwrap();
                prop_assert!(d.length.correct_words <= min || d.length.correct_words >= max);
                prop_assert!(d.length.cv <= 0.35);
            }
        }
    }
}
