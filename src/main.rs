//! quizlint: shortcut linter CLI for multiple-choice quiz banks

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use quizlint::analyzer::{LintEngine, DEFAULT_THRESHOLD, STRICT_THRESHOLD};
use quizlint::config::{
    build_ignore_set, default_config_json, is_ignored, load_config, Config, CONFIG_FILENAME,
};
use quizlint::fixer::QuizFixer;
use quizlint::reporter::{ConsoleReporter, JsonReporter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

/// quizlint: find answer-selection shortcuts in quiz banks
#[derive(Parser, Debug)]
#[command(name = "quizlint")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Corpus files, directories or glob patterns (default: dataRoot from config)
    paths: Vec<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Blocking-question ratio at which a file fails (e.g. 0.2)
    #[arg(long, short)]
    threshold: Option<f64>,

    /// Quiet mode (one line per file)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (also enables debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Report informational flags such as too-similar
    #[arg(long)]
    show_informational: bool,

    /// Path to config file (default: search .quizlintrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only lint staged (git) corpus files (for pre-commit hooks)
    #[arg(long)]
    staged: bool,

    /// Only lint corpus files changed since last commit (git diff HEAD plus untracked)
    #[arg(long)]
    changed: bool,

    /// Lint files in parallel (default when there are many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .quizlintrc.json with sensible defaults
    Init {
        /// Blocking-question ratio threshold (default 0.2)
        #[arg(long)]
        threshold: Option<f64>,

        /// Use the stricter 0.1 threshold
        #[arg(long, conflicts_with = "threshold")]
        strict: bool,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Apply conservative fixes (dry run unless --write)
    Fix {
        /// Corpus files, directories or glob patterns
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write changes back (the original is kept as <file>.bak)
        #[arg(long)]
        write: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the fix report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Init {
                threshold,
                strict,
                dir,
            } => run_init(threshold, strict, dir.as_deref()),
            Commands::Fix {
                paths,
                write,
                config,
                json,
            } => run_fix(&paths, write, config.as_deref(), json),
        };
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let work_dir = work_dir_for(&args.paths, &cwd);

    // load_config validates the file; only the CLI threshold is new here
    if let Some(t) = args.threshold {
        Config::check_threshold(t)?;
    }
    let config = load_config(&work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.show_informational);

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let patterns = config.get_file_patterns();

    let files = if args.staged {
        collect_git_files(&work_dir, GitSelection::Staged, ignore_set.as_ref(), &patterns)?
    } else if args.changed {
        collect_git_files(&work_dir, GitSelection::Changed, ignore_set.as_ref(), &patterns)?
    } else {
        let targets = target_paths(&args.paths, &config, &work_dir)?;
        collect_corpus_files(&targets, ignore_set.as_ref(), &patterns)?
    };

    if files.is_empty() {
        if args.staged || args.changed {
            if !args.quiet {
                eprintln!("{}: No staged/changed corpus files to lint; skipping.", "Info".blue());
            }
            return Ok(ExitCode::SUCCESS);
        }
        eprintln!("{}: No corpus files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = LintEngine::from_config(&config);
    let use_parallel = args.parallel || args.jobs.is_some() || files.len() > 10;
    let run = if use_parallel {
        engine.lint_parallel(&files, Some(&config))
    } else {
        engine.lint_many(&files, Some(&config))
    };

    let mut console = ConsoleReporter::new();
    if args.verbose {
        console = console.verbose();
    }
    if let Some(ref root) = config.data_root {
        console = console.with_base(work_dir.join(root));
    }
    if !args.quiet {
        console.report_skipped(&run.skipped);
    }

    if run.reports.is_empty() {
        eprintln!("{}: All corpus files failed to load", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = LintEngine::aggregate_stats(&run.reports);
    if args.json {
        let reporter = JsonReporter::new().pretty();
        println!(
            "{}",
            reporter.report_with_summary(&run.reports, &run.skipped, &stats)
        );
    } else if args.quiet {
        console.report_quiet(&run.reports);
    } else {
        console.report_many(&run.reports, &stats);
    }

    if run.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn run_init(threshold: Option<f64>, strict: bool, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }
    let threshold_value = if strict {
        STRICT_THRESHOLD
    } else {
        threshold.unwrap_or(DEFAULT_THRESHOLD)
    };
    if !(0.0..=1.0).contains(&threshold_value) {
        anyhow::bail!("threshold must be between 0 and 1, got {}", threshold_value);
    }
    std::fs::write(&config_path, default_config_json(threshold_value))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    println!(
        "{}: Created {} with threshold={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    Ok(ExitCode::SUCCESS)
}

fn run_fix(
    paths: &[PathBuf],
    write: bool,
    config_path: Option<&Path>,
    json: bool,
) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let work_dir = work_dir_for(paths, &cwd);
    let config = load_config(&work_dir, config_path)?;
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let files = collect_corpus_files(paths, ignore_set.as_ref(), &config.get_file_patterns())?;
    if files.is_empty() {
        eprintln!("{}: No corpus files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    let fixer = QuizFixer::from_config(&config);
    let mut reports = Vec::new();
    let mut had_errors = false;
    for file in &files {
        match fixer.fix_file(file, write) {
            Ok(report) => reports.push(report),
            Err(e) => {
                had_errors = true;
                eprintln!("{}: {:#}", "Skipped".yellow(), e);
            }
        }
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("Failed to encode fix report")?
        );
    } else {
        println!("{}", "Auto-fix report:".bold());
        for report in &reports {
            println!(
                " - {}: questions={} changed={}",
                report.file_path.display(),
                report.questions,
                report.changed()
            );
            for fix in &report.fixes {
                let kinds: Vec<String> = fix.kinds.iter().map(|k| k.to_string()).collect();
                println!("     {}: {}", fix.id, kinds.join(", "));
            }
        }
        let total: usize = reports.iter().map(|r| r.changed()).sum();
        println!("Total changed: {}", total);
        if write {
            println!("Wrote changes to files where fixes applied (originals kept as .bak).");
        } else {
            println!("Dry-run: no files were modified. Re-run with --write to apply.");
        }
    }

    if had_errors && reports.is_empty() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Directory used for config lookup and git commands
fn work_dir_for(paths: &[PathBuf], cwd: &Path) -> PathBuf {
    match paths.first() {
        Some(p) if has_glob_chars(p) => cwd.to_path_buf(),
        Some(p) if p.is_file() => p
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf()),
        Some(p) if p.is_dir() => p.clone(),
        _ => cwd.to_path_buf(),
    }
}

/// Paths from the command line, or the configured data root
fn target_paths(paths: &[PathBuf], config: &Config, work_dir: &Path) -> Result<Vec<PathBuf>> {
    if !paths.is_empty() {
        return Ok(paths.to_vec());
    }
    match config.data_root {
        Some(ref root) => Ok(vec![work_dir.join(root)]),
        None => anyhow::bail!(
            "no corpus path given (pass a file, directory or glob, or set dataRoot in {})",
            CONFIG_FILENAME
        ),
    }
}

fn has_glob_chars(path: &Path) -> bool {
    path.to_string_lossy().contains(['*', '?', '['])
}

/// Expand explicit paths, directories and glob patterns into corpus files
fn collect_corpus_files(
    paths: &[PathBuf],
    ignore_set: Option<&globset::GlobSet>,
    patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if has_glob_chars(path) {
            let pattern = path.to_string_lossy();
            let entries = glob::glob(&pattern)
                .with_context(|| format!("Invalid glob pattern: {}", pattern))?;
            for entry in entries.filter_map(|e| e.ok()) {
                if entry.is_dir() {
                    walk_dir(&entry, ignore_set, patterns, &mut files);
                } else if is_corpus_file(&entry, patterns) && !ignored(&entry, ignore_set) {
                    files.push(entry);
                }
            }
        } else if path.is_file() {
            if !ignored(path, ignore_set) {
                files.push(path.clone());
            }
        } else if path.is_dir() {
            walk_dir(path, ignore_set, patterns, &mut files);
        } else {
            // kept so the run reports it as skipped instead of aborting
            log::debug!("path does not exist: {}", path.display());
            files.push(path.clone());
        }
    }

    // Sort for consistent output
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_dir(
    dir: &Path,
    ignore_set: Option<&globset::GlobSet>,
    patterns: &[&str],
    files: &mut Vec<PathBuf>,
) {
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if entry.file_type().is_file()
            && is_corpus_file(file_path, patterns)
            && !ignored(file_path, ignore_set)
        {
            files.push(file_path.to_path_buf());
        }
    }
}

fn ignored(path: &Path, ignore_set: Option<&globset::GlobSet>) -> bool {
    ignore_set.is_some_and(|set| is_ignored(path, set))
}

fn is_corpus_file(path: &Path, patterns: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    if path
        .components()
        .any(|c| c.as_os_str() == "node_modules" || c.as_os_str() == ".git")
    {
        return false;
    }
    patterns.iter().any(|p| name.ends_with(p))
}

#[derive(Debug, Clone, Copy)]
enum GitSelection {
    /// `git diff --cached`
    Staged,
    /// `git diff HEAD` plus untracked files
    Changed,
}

fn git_output(work_dir: &Path, args: &[&str]) -> Result<String> {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(work_dir)
        .output()
        .context("Failed to run git (is this a git repo?)")?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Collect corpus files from git: staged, or changed against HEAD plus untracked
fn collect_git_files(
    work_dir: &Path,
    selection: GitSelection,
    ignore_set: Option<&globset::GlobSet>,
    patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    let root = PathBuf::from(git_output(work_dir, &["rev-parse", "--show-toplevel"])?.trim());
    let names = match selection {
        GitSelection::Staged => git_output(&root, &["diff", "--cached", "--name-only"])?,
        GitSelection::Changed => {
            let mut names = git_output(&root, &["diff", "HEAD", "--name-only"])?;
            // Untracked files are best effort
            if let Ok(untracked) = git_output(&root, &["ls-files", "--others", "--exclude-standard"]) {
                names.push_str(&untracked);
            }
            names
        }
    };
    log::debug!("git {:?} selection from {}", selection, root.display());

    let mut files = Vec::new();
    for line in names.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let candidate = root.join(line);
        if is_corpus_file(&candidate, patterns)
            && !ignored(&candidate, ignore_set)
            && candidate.exists()
        {
            files.push(candidate);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}
