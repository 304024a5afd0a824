//! Length-cue detection: does the correct answer's length alone give it away?
//!
//! `RobustLengthCue` is the production strategy. It flags only when the
//! correct answer sits at an extreme of the distractor word counts, is
//! separated from the nearest distractor by a clear gap, has a large
//! MAD-based effect size, and the distractors are not already dispersed.
//!
//! `LegacyRatioLengthCue` keeps the older character-ratio test for regression
//! comparison. It is weaker and raises more false positives.

use super::stats;
use super::{LengthCueOutcome, LengthCueStrategy};
use crate::text::word_count;
use crate::{Extreme, LengthStats};
use serde::Deserialize;

/// Thresholds for the robust strategy
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LengthCueParams {
    /// Floor of the gap threshold, in words
    pub min_gap: usize,
    /// Gap threshold as a fraction of the median distractor length
    pub gap_median_fraction: f64,
    /// Robust z required when MAD > 0
    pub min_robust_z: f64,
    /// Gap required instead of z when all distractors have the same length
    pub flat_gap: usize,
    /// Largest distractor coefficient of variation that still allows a flag
    pub max_cv: f64,
}

impl Default for LengthCueParams {
    fn default() -> Self {
        Self {
            min_gap: 5,
            gap_median_fraction: 0.2,
            min_robust_z: 2.5,
            flat_gap: 7,
            max_cv: 0.35,
        }
    }
}

/// Word-count statistics for a correct answer against its distractors
pub fn describe(correct_words: usize, distractor_words: &[usize]) -> LengthStats {
    let mut out = LengthStats {
        correct_words,
        distractor_words: distractor_words.to_vec(),
        ..LengthStats::default()
    };
    let (Some(&min_ds), Some(&max_ds)) =
        (distractor_words.iter().min(), distractor_words.iter().max())
    else {
        return out;
    };

    let values: Vec<f64> = distractor_words.iter().map(|&w| w as f64).collect();
    out.median = stats::median(&values);
    out.mad = stats::mad(&values);
    out.cv = stats::coefficient_of_variation(&values);
    out.robust_z = if out.mad > 0.0 {
        (correct_words as f64 - out.median).abs() / out.mad
    } else {
        0.0
    };

    if correct_words <= min_ds {
        out.extreme = Some(Extreme::Short);
        out.nearest_gap = min_ds - correct_words;
    } else if correct_words >= max_ds {
        out.extreme = Some(Extreme::Long);
        out.nearest_gap = correct_words - max_ds;
    }
    out
}

/// Extremity + gap + robust effect size + dispersion guard
#[derive(Debug, Clone, Default)]
pub struct RobustLengthCue {
    params: LengthCueParams,
}

impl RobustLengthCue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: LengthCueParams) -> Self {
        Self { params }
    }

    /// Words the nearest distractor must be away for a given median
    pub fn gap_threshold(&self, median: f64) -> f64 {
        (self.params.min_gap as f64).max((self.params.gap_median_fraction * median).round())
    }

    /// Apply all four tests to precomputed statistics
    pub fn assess(&self, stats: &LengthStats) -> bool {
        if stats.extreme.is_none() {
            return false;
        }
        let gap = stats.nearest_gap as f64;
        let strong_gap = gap >= self.gap_threshold(stats.median);
        let big_effect = if stats.mad > 0.0 {
            stats.robust_z >= self.params.min_robust_z
        } else {
            stats.nearest_gap >= self.params.flat_gap
        };
        let calm_distractors = stats.cv <= self.params.max_cv;
        strong_gap && big_effect && calm_distractors
    }

    /// Evaluate raw word counts
    pub fn evaluate_counts(&self, correct_words: usize, distractor_words: &[usize]) -> LengthCueOutcome {
        let stats = describe(correct_words, distractor_words);
        LengthCueOutcome {
            flagged: self.assess(&stats),
            stats,
        }
    }
}

impl LengthCueStrategy for RobustLengthCue {
    fn name(&self) -> &'static str {
        "robust"
    }

    fn evaluate(&self, correct: &str, distractors: &[String]) -> LengthCueOutcome {
        let ds_w: Vec<usize> = distractors.iter().map(|d| word_count(d)).collect();
        self.evaluate_counts(word_count(correct), &ds_w)
    }
}

/// Character-length ratio against the median distractor
#[derive(Debug, Clone)]
pub struct LegacyRatioLengthCue {
    ratio: f64,
}

impl LegacyRatioLengthCue {
    pub const DEFAULT_RATIO: f64 = 1.125;

    pub fn new() -> Self {
        Self {
            ratio: Self::DEFAULT_RATIO,
        }
    }

    pub fn with_ratio(ratio: f64) -> Self {
        Self { ratio }
    }
}

impl Default for LegacyRatioLengthCue {
    fn default() -> Self {
        Self::new()
    }
}

impl LengthCueStrategy for LegacyRatioLengthCue {
    fn name(&self) -> &'static str {
        "legacy-ratio"
    }

    fn evaluate(&self, correct: &str, distractors: &[String]) -> LengthCueOutcome {
        let lens: Vec<f64> = distractors.iter().map(|d| d.chars().count() as f64).collect();
        let med = stats::median(&lens);
        let flagged = med > 0.0 && correct.chars().count() as f64 / med > self.ratio;
        let ds_w: Vec<usize> = distractors.iter().map(|d| word_count(d)).collect();
        LengthCueOutcome {
            flagged,
            stats: describe(word_count(correct), &ds_w),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robust() -> RobustLengthCue {
        RobustLengthCue::new()
    }

    #[test]
    fn short_answers_within_small_gap_not_flagged() {
        // "Moral hazard" vs "Adverse selection", "Signaling", "Screening"
        let out = robust().evaluate_counts(2, &[2, 1, 1]);
        assert_eq!(out.stats.median, 1.0);
        assert_eq!(out.stats.extreme, Some(Extreme::Long));
        assert_eq!(out.stats.nearest_gap, 0);
        assert!(!out.flagged);
    }

    #[test]
    fn long_outlier_flagged() {
        let out = robust().evaluate_counts(40, &[5, 6, 5, 7]);
        assert_eq!(out.stats.median, 5.5);
        assert_eq!(out.stats.nearest_gap, 33);
        assert!(out.stats.robust_z > 2.5);
        assert!(out.stats.cv <= 0.35);
        assert!(out.flagged);
    }

    #[test]
    fn inside_range_never_flagged() {
        let out = robust().evaluate_counts(20, &[2, 3, 60]);
        assert_eq!(out.stats.extreme, None);
        assert_eq!(out.stats.nearest_gap, 0);
        assert!(!out.flagged);
    }

    #[test]
    fn short_outlier_flagged() {
        let out = robust().evaluate_counts(1, &[12, 13, 12, 14]);
        assert_eq!(out.stats.extreme, Some(Extreme::Short));
        assert_eq!(out.stats.nearest_gap, 11);
        assert!(out.flagged);
    }

    #[test]
    fn flat_distractors_use_flat_gap() {
        // MAD == 0: gap 6 passes the gap test (>= 5) but not the flat gap (>= 7)
        assert!(!robust().evaluate_counts(16, &[10, 10, 10]).flagged);
        assert!(robust().evaluate_counts(17, &[10, 10, 10]).flagged);
    }

    #[test]
    fn gap_threshold_scales_with_median() {
        let r = robust();
        assert_eq!(r.gap_threshold(1.0), 5.0);
        assert_eq!(r.gap_threshold(40.0), 8.0);
        // 0.2 * 32.5 = 6.5 rounds away from zero
        assert_eq!(r.gap_threshold(32.5), 7.0);
    }

    #[test]
    fn dispersed_distractors_suppress_flag() {
        let out = robust().evaluate_counts(60, &[2, 10, 20, 30]);
        assert!(out.stats.cv > 0.35);
        assert!(!out.flagged);
    }

    #[test]
    fn legacy_ratio_flags_modest_differences() {
        let legacy = LegacyRatioLengthCue::new();
        let ds = vec!["Price floor".to_string(), "Price cap".to_string()];
        let out = legacy.evaluate("A binding price ceiling", &ds);
        assert!(out.flagged);
        assert!(!robust().evaluate("A binding price ceiling", &ds).flagged);
    }

    #[test]
    fn legacy_ratio_zero_median_not_flagged() {
        let out = LegacyRatioLengthCue::new().evaluate("anything", &[]);
        assert!(!out.flagged);
    }

    #[test]
    fn empty_distractors_describe_safely() {
        let s = describe(3, &[]);
        assert_eq!(s.correct_words, 3);
        assert_eq!(s.extreme, None);
        assert_eq!(s.cv, 0.0);
    }
}
