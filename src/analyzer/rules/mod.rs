//! Detection rules for shortcut cues in quiz items

pub mod length_cue;
pub mod similarity;
pub mod stats;

pub use length_cue::{LegacyRatioLengthCue, LengthCueParams, RobustLengthCue};
pub use similarity::{jaccard, SimilarityAnalyzer, SimilarityOutcome, SimilarityParams};

use crate::LengthStats;

/// Result of a length-cue evaluation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LengthCueOutcome {
    pub flagged: bool,
    pub stats: LengthStats,
}

/// Pluggable length-cue test. The engine runs exactly one strategy.
pub trait LengthCueStrategy: Send + Sync {
    /// Name of the strategy
    fn name(&self) -> &'static str;

    /// Judge whether the correct answer stands out by length alone
    fn evaluate(&self, correct: &str, distractors: &[String]) -> LengthCueOutcome;
}
