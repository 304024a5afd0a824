//! Regression tests: baseline blocking and flagged counts per quiz-bank file.
//! Update baselines intentionally when flag rules or thresholds change.
//!
//! NOTE: These tests protect against *accidental* classification changes, not
//! *incorrect* ones. See tests/integration.rs for semantic correctness tests.

use quizlint::analyzer::rules::LegacyRatioLengthCue;
use quizlint::analyzer::LintEngine;
use std::path::Path;

fn lint(path: &str) -> quizlint::CorpusReport {
    LintEngine::new()
        .lint_path(Path::new(path), None)
        .unwrap_or_else(|e| panic!("lint({}) skipped: {}", path, e.reason))
}

macro_rules! regression {
    ($name:ident, $path:expr, $blocking:expr, $flagged:expr, $passed:expr) => {
        #[test]
        fn $name() {
            let r = lint($path);
            assert_eq!(
                r.verdict.blocking_questions, $blocking,
                "{} blocking count changed from baseline",
                $path
            );
            assert_eq!(
                r.flagged().count(),
                $flagged,
                "{} flagged count changed from baseline",
                $path
            );
            assert_eq!(r.verdict.passed, $passed, "{} verdict changed", $path);
        }
    };
}

regression!(clean, "test-repos/quiz-bank/clean.json", 0, 0, true);
regression!(length_cue, "test-repos/quiz-bank/length-cue.json", 3, 3, false);
regression!(legacy_options, "test-repos/quiz-bank/legacy-options.json", 0, 0, true);
regression!(semicolon_strings, "test-repos/quiz-bank/semicolon-strings.json", 2, 2, false);
// too-similar is informational and hidden by default
regression!(similar, "test-repos/quiz-bank/similar.json", 0, 0, true);

macro_rules! skipped {
    ($name:ident, $path:expr, $reason:expr) => {
        #[test]
        fn $name() {
            let err = LintEngine::new()
                .lint_path(Path::new($path), None)
                .expect_err("corpus should be skipped");
            assert!(
                err.reason.contains($reason),
                "{}: unexpected reason {}",
                $path,
                err.reason
            );
        }
    };
}

skipped!(malformed, "test-repos/quiz-bank/malformed.json", "invalid JSON");
skipped!(no_questions, "test-repos/quiz-bank/no-questions.json", "no questions array");

// The character-ratio strategy is kept only for comparison with the robust one.
macro_rules! legacy_ratio {
    ($name:ident, $path:expr, $blocking:expr) => {
        #[test]
        fn $name() {
            let engine = LintEngine::new()
                .with_length_strategy(Box::new(LegacyRatioLengthCue::new()));
            let r = engine
                .lint_path(Path::new($path), None)
                .unwrap_or_else(|e| panic!("lint({}) skipped: {}", $path, e.reason));
            assert_eq!(
                r.verdict.blocking_questions, $blocking,
                "{} legacy blocking count changed from baseline",
                $path
            );
        }
    };
}

legacy_ratio!(legacy_clean, "test-repos/quiz-bank/clean.json", 0);
legacy_ratio!(legacy_length_cue, "test-repos/quiz-bank/length-cue.json", 3);
// Long near-copies tie on length: robust sees no extreme gap, the ratio test still fires
legacy_ratio!(legacy_similar, "test-repos/quiz-bank/similar.json", 1);
