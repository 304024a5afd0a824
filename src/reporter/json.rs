//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::{CorpusReport, SkippedCorpus};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single corpus as JSON
    pub fn report(&self, report: &CorpusReport) -> String {
        self.encode(report, "{}")
    }

    /// Report multiple corpora as a JSON array
    pub fn report_many(&self, reports: &[CorpusReport]) -> String {
        self.encode(reports, "[]")
    }

    /// Report with skipped files and a summary
    pub fn report_with_summary(
        &self,
        reports: &[CorpusReport],
        skipped: &[SkippedCorpus],
        stats: &AggregateStats,
    ) -> String {
        let output = JsonOutput {
            results: reports,
            skipped,
            summary: JsonSummary {
                stats: *stats,
                files_skipped: skipped.len(),
                passed: stats.files_failed == 0,
            },
        };
        self.encode(&output, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [CorpusReport],
    skipped: &'a [SkippedCorpus],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    #[serde(flatten)]
    stats: AggregateStats,
    files_skipped: usize,
    passed: bool,
}
