//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::VerdictCalculator;
use crate::{CorpusReport, QuestionReport, SkippedCorpus, Verdict};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
    /// Prefix stripped from displayed file paths
    base: Option<PathBuf>,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
            base: None,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Show file paths relative to `base` when they live under it
    pub fn with_base(mut self, base: PathBuf) -> Self {
        self.base = Some(base);
        self
    }

    /// Report all corpora: the flag table, then per-file verdicts
    pub fn report_many(&self, reports: &[CorpusReport], stats: &AggregateStats) {
        print!("{}", self.render(reports, stats));
    }

    /// Report in quiet mode (one line per file)
    pub fn report_quiet(&self, reports: &[CorpusReport]) {
        for report in reports {
            println!("{}", self.quiet_line(report));
        }
    }

    /// Skipped corpora go to stderr
    pub fn report_skipped(&self, skipped: &[SkippedCorpus]) {
        for s in skipped {
            eprintln!("{}: {}", self.paint("Skipped", Paint::Warn), s.reason);
        }
    }

    /// Full human-readable report as text
    pub fn render(&self, reports: &[CorpusReport], stats: &AggregateStats) -> String {
        let mut out = String::new();
        let rows: Vec<(&CorpusReport, &QuestionReport)> = reports
            .iter()
            .flat_map(|r| r.flagged().map(move |q| (r, q)))
            .collect();

        if rows.is_empty() {
            out.push_str(&format!("{}\n", self.paint("No issues found ✅", Paint::Good)));
        } else {
            out.push_str(&format!("{}\n", self.paint("Lint results:", Paint::Bold)));
            out.push_str(&format!(
                "{}\n",
                self.paint(
                    &format!(
                        "{:24} | {:10} | {:20} | Details",
                        "File", "ID", "Flags"
                    ),
                    Paint::Bold
                )
            ));
            out.push_str(&format!("{}\n", "-".repeat(80)));
            for (report, question) in rows {
                out.push_str(&self.row(&report.file_path, question));
                out.push('\n');
            }
        }

        out.push('\n');
        for report in reports {
            out.push_str(&self.summary_line(report));
            out.push('\n');
        }

        let failed = reports.iter().filter(|r| !r.verdict.passed).count();
        if failed > 0 {
            out.push_str(&format!(
                "\n{}\n",
                self.paint(
                    &format!("{} file(s) failed per-file threshold. Fix before commit.", failed),
                    Paint::Bad
                )
            ));
        }

        if self.verbose {
            out.push_str(&format!(
                "\n   Files linted:       {}\n   Questions:          {}\n   Flagged questions:  {}\n   Blocking questions: {}\n",
                stats.files_linted,
                stats.total_questions,
                stats.flagged_questions,
                stats.blocking_questions
            ));
        }
        out
    }

    /// One table row: file | id | flags | detail
    pub fn row(&self, file: &Path, question: &QuestionReport) -> String {
        let flags = format!("{:20}", question.flag_tokens());
        format!(
            "{:24} | {:10} | {} | {}",
            self.short_path(file),
            question.id,
            self.paint(&flags, Paint::Warn),
            question.detail()
        )
    }

    /// Per-file verdict line
    pub fn summary_line(&self, report: &CorpusReport) -> String {
        let v = &report.verdict;
        let text = if v.passed {
            format!(
                "{}: {}/{} blocking questions ({}) within per-file {} threshold",
                self.short_path(&report.file_path),
                v.blocking_questions,
                v.total_questions,
                percent(v.blocking_ratio),
                percent(v.threshold)
            )
        } else {
            format!(
                "{}: {}/{} blocking questions ({}) — exceeds per-file {} threshold",
                self.short_path(&report.file_path),
                v.blocking_questions,
                v.total_questions,
                percent(v.blocking_ratio),
                percent(v.threshold)
            )
        };
        let paint = if v.passed { Paint::Good } else { Paint::Bad };
        self.paint(&text, paint)
    }

    /// `path: blocking/total (ratio) PASS|FAIL`
    pub fn quiet_line(&self, report: &CorpusReport) -> String {
        let v: &Verdict = &report.verdict;
        let status = VerdictCalculator::status(v);
        let status = if v.passed {
            self.paint(status, Paint::Good)
        } else {
            self.paint(status, Paint::Bad)
        };
        format!(
            "{}: {}/{} ({}) {}",
            report.file_path.display(),
            v.blocking_questions,
            v.total_questions,
            percent(v.blocking_ratio),
            status
        )
    }

    fn short_path(&self, path: &Path) -> String {
        let shown = self
            .base
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path);
        shown.display().to_string()
    }

    fn paint(&self, text: &str, paint: Paint) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        match paint {
            Paint::Bold => text.bold().to_string(),
            Paint::Good => text.green().bold().to_string(),
            Paint::Bad => text.red().bold().to_string(),
            Paint::Warn => text.yellow().to_string(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
enum Paint {
    Bold,
    Good,
    Bad,
    Warn,
}

fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::LintEngine;
    use crate::{Diagnostics, Flag, FlagKind, Severity};

    fn report(path: &str, questions: Vec<QuestionReport>, threshold: f64) -> CorpusReport {
        CorpusReport {
            file_path: PathBuf::from(path),
            verdict: VerdictCalculator::calculate(&questions, threshold),
            questions,
        }
    }

    fn flagged(id: &str, kind: FlagKind) -> QuestionReport {
        QuestionReport {
            id: id.to_string(),
            flags: vec![Flag::new(kind, Severity::Blocking)],
            diagnostics: Some(Diagnostics::default()),
        }
    }

    fn clean(id: &str) -> QuestionReport {
        QuestionReport {
            id: id.to_string(),
            flags: vec![],
            diagnostics: Some(Diagnostics::default()),
        }
    }

    #[test]
    fn no_issues_message() {
        let reports = vec![report("a.json", vec![clean("1")], 0.2)];
        let stats = LintEngine::aggregate_stats(&reports);
        let text = ConsoleReporter::new().without_colors().render(&reports, &stats);
        assert!(text.starts_with("No issues found"));
        assert!(!text.contains("failed per-file threshold"));
    }

    #[test]
    fn rows_and_failure_footer() {
        let reports = vec![report(
            "src/_data/week1.json",
            vec![flagged("q_001", FlagKind::LengthCue), clean("q_002")],
            0.2,
        )];
        let stats = LintEngine::aggregate_stats(&reports);
        let reporter = ConsoleReporter::new()
            .without_colors()
            .with_base(PathBuf::from("src/_data"));
        let text = reporter.render(&reports, &stats);
        assert!(text.contains("week1.json               | q_001      | ❗length-cue"));
        assert!(text.contains("len_ca=0 med_ds=0.0 gap=0 zMAD=0.00 cv=0.00 sim=0.00"));
        assert!(text.contains("week1.json: 1/2 blocking questions (50%) — exceeds per-file 20% threshold"));
        assert!(text.contains("1 file(s) failed per-file threshold."));
        assert!(!text.contains("q_002"));
    }

    #[test]
    fn quiet_line_format() {
        let r = report(
            "bank.json",
            vec![flagged("a", FlagKind::NoDistractors), clean("b"), clean("c"), clean("d")],
            0.2,
        );
        let line = ConsoleReporter::new().without_colors().quiet_line(&r);
        assert_eq!(line, "bank.json: 1/4 (25%) FAIL");

        let r = report("empty.json", vec![], 0.2);
        let line = ConsoleReporter::new().without_colors().quiet_line(&r);
        assert_eq!(line, "empty.json: 0/0 (0%) PASS");
    }

    #[test]
    fn verbose_adds_aggregate_stats() {
        let reports = vec![report("ok.json", vec![clean("1")], 0.2)];
        let stats = LintEngine::aggregate_stats(&reports);
        let text = ConsoleReporter::new()
            .without_colors()
            .verbose()
            .render(&reports, &stats);
        assert!(text.contains("Files linted:       1"));
    }

    #[test]
    fn every_file_gets_a_summary_line() {
        let reports = vec![
            report("ok.json", vec![clean("1")], 0.2),
            report("bad.json", vec![flagged("1", FlagKind::LengthCue)], 0.2),
        ];
        let stats = LintEngine::aggregate_stats(&reports);
        let text = ConsoleReporter::new().without_colors().render(&reports, &stats);
        assert!(text.contains("ok.json: 0/1 blocking questions (0%) within per-file 20% threshold"));
        assert!(text.contains("bad.json: 1/1 blocking questions (100%) — exceeds per-file 20% threshold"));
        assert!(!text.contains("Files linted:"));
    }
}
