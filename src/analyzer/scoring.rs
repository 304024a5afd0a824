//! Per-corpus pass/fail verdict

use crate::{QuestionReport, Verdict};

/// Blocking-question ratio at or above which a corpus fails
pub const DEFAULT_THRESHOLD: f64 = 0.20;

/// Stricter ratio for banks that have already been cleaned up
pub const STRICT_THRESHOLD: f64 = 0.10;

/// Calculator for corpus verdicts
pub struct VerdictCalculator;

impl VerdictCalculator {
    /// Count blocking questions and compare the ratio against `threshold`.
    /// An empty corpus has ratio 0 and passes any positive threshold.
    pub fn calculate(questions: &[QuestionReport], threshold: f64) -> Verdict {
        let total_questions = questions.len();
        let blocking_questions = questions.iter().filter(|q| q.is_blocking()).count();
        Self::from_counts(total_questions, blocking_questions, threshold)
    }

    pub fn from_counts(total_questions: usize, blocking_questions: usize, threshold: f64) -> Verdict {
        let blocking_ratio = if total_questions == 0 {
            0.0
        } else {
            blocking_questions as f64 / total_questions as f64
        };
        Verdict {
            total_questions,
            blocking_questions,
            blocking_ratio,
            threshold,
            passed: blocking_ratio < threshold,
        }
    }

    /// Short status word for summary lines
    pub fn status(verdict: &Verdict) -> &'static str {
        if verdict.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }
}
