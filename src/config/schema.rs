//! Config schema and deserialization

use crate::analyzer::rules::{LengthCueParams, SimilarityParams};
use crate::analyzer::scoring::DEFAULT_THRESHOLD;
use crate::text::Lexicon;
use crate::{FlagKind, Severity};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Flag severity override (blocking, informational, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Blocking,
    Informational,
    /// Drop the flag entirely
    Off,
}

impl RuleSeverity {
    /// Convert to crate::Severity if not Off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Blocking => Some(Severity::Blocking),
            RuleSeverity::Informational => Some(Severity::Informational),
            RuleSeverity::Off => None,
        }
    }
}

/// Extra or replacement word tables
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LexiconConfig {
    /// Start from empty tables instead of the built-in ones
    #[serde(default)]
    pub replace_defaults: bool,

    #[serde(default)]
    pub stopwords: Vec<String>,

    #[serde(default)]
    pub negations: Vec<String>,

    /// Antonym pairs, matched in both directions
    #[serde(default)]
    pub antonyms: Vec<(String, String)>,
}

impl LexiconConfig {
    fn is_empty(&self) -> bool {
        !self.replace_defaults
            && self.stopwords.is_empty()
            && self.negations.is_empty()
            && self.antonyms.is_empty()
    }
}

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Optional threshold override for matched files
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Optional flag severity overrides for matched files
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,
}

/// Root config structure for .quizlintrc.json
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Blocking-question ratio at or above which a corpus fails. Default: 0.20
    #[serde(default)]
    pub threshold: Option<f64>,

    /// Show informational flags in reports. Never affects pass/fail.
    #[serde(default)]
    pub report_informational: Option<bool>,

    /// Per-flag severity overrides. Key is the flag name in kebab-case.
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,

    /// Glob patterns for files/directories to exclude
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Filename suffixes treated as corpus files when walking directories (default: .json)
    #[serde(default)]
    pub file_patterns: Vec<String>,

    /// Directory linted when no path is given on the command line
    #[serde(default)]
    pub data_root: Option<String>,

    #[serde(default)]
    pub lexicon: LexiconConfig,

    #[serde(default)]
    pub length_cue: Option<LengthCueParams>,

    #[serde(default)]
    pub similarity: Option<SimilarityParams>,

    /// Per-path configuration overrides
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<f64>, show_informational: bool) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if show_informational {
            self.report_informational = Some(true);
        }
        self
    }

    /// A blocking-ratio threshold from any source must be a ratio
    pub fn check_threshold(t: f64) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&t) {
            anyhow::bail!("threshold must be between 0 and 1, got {}", t);
        }
        Ok(())
    }

    /// Reject values that cannot be meaningful
    pub fn validate(&self) -> anyhow::Result<()> {
        let thresholds = self
            .threshold
            .iter()
            .chain(self.overrides.iter().filter_map(|o| o.threshold.as_ref()));
        for t in thresholds {
            Self::check_threshold(*t)?;
        }
        if let Some(ref sim) = self.similarity {
            if !(0.0..=1.0).contains(&sim.min_similarity) {
                anyhow::bail!(
                    "similarity.minSimilarity must be between 0 and 1, got {}",
                    sim.min_similarity
                );
            }
        }
        if let Some(ref lc) = self.length_cue {
            if lc.gap_median_fraction < 0.0 || lc.min_robust_z < 0.0 || lc.max_cv < 0.0 {
                anyhow::bail!("lengthCue parameters must not be negative");
            }
        }
        let names = self
            .rules
            .keys()
            .chain(self.overrides.iter().flat_map(|o| o.rules.keys()));
        for name in names {
            if FlagKind::from_token(name).is_none() {
                log::warn!("unknown flag '{}' in config rules, ignoring", name);
            }
        }
        Ok(())
    }

    /// Threshold after defaults
    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn report_informational(&self) -> bool {
        self.report_informational.unwrap_or(false)
    }

    /// Get the configured severity for a flag, if any
    pub fn rule_severity(&self, flag: &str) -> Option<RuleSeverity> {
        self.rules.get(flag).copied()
    }

    pub fn length_cue_params(&self) -> LengthCueParams {
        self.length_cue.unwrap_or_default()
    }

    pub fn similarity_params(&self) -> SimilarityParams {
        self.similarity.unwrap_or_default()
    }

    /// Word tables with configured additions (or replacements)
    pub fn build_lexicon(&self) -> Lexicon {
        let base = if self.lexicon.replace_defaults {
            Lexicon::empty()
        } else {
            Lexicon::default()
        };
        base.with_stopwords(&self.lexicon.stopwords)
            .with_negations(&self.lexicon.negations)
            .with_antonyms(
                self.lexicon
                    .antonyms
                    .iter()
                    .map(|(a, b)| (a.as_str(), b.as_str())),
            )
    }

    /// Get effective config for a specific file path, applying overrides
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            threshold: self.threshold(),
            rules: self.rules.clone(),
        };

        // Apply matching overrides in order
        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(threshold) = override_cfg.threshold {
                    effective.threshold = threshold;
                }
                for (rule, severity) in &override_cfg.rules {
                    effective.rules.insert(rule.clone(), *severity);
                }
            }
        }

        effective
    }

    /// Check if a file path matches any of the override patterns
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        let path_str = file_path.to_string_lossy();
        for pattern in patterns {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(file_path)
                    || path_str.contains(pattern.trim_start_matches("**/"))
                {
                    return true;
                }
            }
        }
        false
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.report_informational.is_none() {
            self.report_informational = base.report_informational;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.data_root.is_none() {
            self.data_root = base.data_root;
        }
        if self.length_cue.is_none() {
            self.length_cue = base.length_cue;
        }
        if self.similarity.is_none() {
            self.similarity = base.similarity;
        }

        // Merge rules (this config takes precedence)
        for (rule, severity) in base.rules {
            self.rules.entry(rule).or_insert(severity);
        }

        // Merge ignore patterns
        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.file_patterns.is_empty() {
            self.file_patterns = base.file_patterns;
        }

        // Lexicon: a child that says anything about the lexicon wins outright
        if self.lexicon.is_empty() {
            self.lexicon = base.lexicon;
        }

        // Prepend base overrides
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }

    /// Filename suffixes for directory walks
    pub fn get_file_patterns(&self) -> Vec<&str> {
        if self.file_patterns.is_empty() {
            vec![".json"]
        } else {
            self.file_patterns.iter().map(|s| s.as_str()).collect()
        }
    }
}

/// Effective configuration for a specific file (after applying overrides)
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub threshold: f64,
    pub rules: HashMap<String, RuleSeverity>,
}

impl EffectiveConfig {
    /// Severity for a flag, or None when the flag is turned off
    pub fn severity_for(&self, kind: FlagKind) -> Option<Severity> {
        match self.rules.get(&kind.to_string()) {
            Some(rs) => rs.to_severity(),
            None => Some(kind.default_severity()),
        }
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            rules: HashMap::new(),
        }
    }
}
