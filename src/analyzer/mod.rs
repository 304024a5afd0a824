//! Analyzer module - question classification and corpus verdicts

pub mod engine;
pub mod rules;
pub mod scoring;

pub use engine::{AggregateStats, LintEngine, LintRun};
pub use scoring::{VerdictCalculator, DEFAULT_THRESHOLD, STRICT_THRESHOLD};
