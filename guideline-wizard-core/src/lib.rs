// guideline-wizard-core/src/lib.rs

// declare modules
pub mod analysis;
pub mod collect;
pub mod config;
pub mod error;
pub mod persist;
pub mod utils;

// re-export key items for external use by other crates
pub use anyhow::{Context, Result};
pub use clap::Parser;
pub use console::style;

pub use crate::analysis::{
    analyse_files, build_report, classify, diff_guidelines, parse_sections, qualifying, render,
    AnalysisReport, FilePatterns, FileStat, GuidelinesDocument, NamingConvention,
    NamingConventionStat, RunMetrics, Section, ThemeMatch,
};
pub use crate::collect::{
    collect_commits, collect_review_comments, repo_root, CollectorUnavailable, RawRecord,
    RecordSource,
};
pub use crate::config::{AnalysisWindow, Depth, DepthProfile, RefreshConfig};
pub use crate::error::RefreshError;
pub use crate::persist::{canonical_guidelines_path, sanitize_area, save_outputs, SavedPaths};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};

/// argument parsing struct shared by the cli crate
#[derive(Parser, Debug, Clone)]
#[command(name = "guideline-wizard")]
pub struct GuidelineCliArgs {
    /// area of the codebase to analyse, relative to the repository root
    #[arg(short, long)]
    pub area: String,

    /// analysis depth: quick (30 days), standard (90 days), deep (180 days)
    #[arg(short, long, value_enum, default_value = "standard")]
    pub depth: Depth,

    /// path to the repository (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<String>,

    /// path to a custom configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// show detailed progress information
    #[arg(short, long)]
    pub verbose: bool,
}

/// what a completed run produced, for the caller to display
#[derive(Debug)]
pub struct RefreshOutcome {
    pub guidelines_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub report_path: PathBuf,
    pub changes_from_previous: Vec<String>,
}

/// the complete refresh pipeline: collect, classify, scan, render, diff, save
pub fn execute_guideline_flow(args: GuidelineCliArgs) -> Result<RefreshOutcome> {
    let start = args.path.clone().unwrap_or_else(|| ".".to_string());
    let repo_root = collect::repo_root(Path::new(&start))?;
    let config = RefreshConfig::load(args.config.as_deref(), &repo_root)?;
    let window = AnalysisWindow::new(&args.area, args.depth, &config)?;

    println!("{}", style("\nguideline-wizard 🧭").cyan().bold());
    println!("{}\n", style("evidence-based coding guideline generator").dim());
    println!("  area:  {}", style(&window.area).green());
    println!("  depth: {}", style(window.depth).green());
    if args.verbose {
        println!("  repo:  {}", style(repo_root.display()).dim());
    }
    println!();

    // fatal before any output is written
    let area_path = repo_root.join(&window.area);
    if !area_path.is_dir() {
        return Err(RefreshError::AreaNotFound(area_path).into());
    }

    let mut findings: Vec<String> = Vec::new();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} collecting history and reviews...")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));

    let commits = match collect_commits(&repo_root, &window.area, &window) {
        Ok(records) => records,
        Err(err) => {
            findings.push(format!("commit history unavailable: {}", err.reason));
            Vec::new()
        }
    };
    let reviews = match collect_review_comments(&repo_root, &window.area, &window) {
        Ok(records) => records,
        Err(err) => {
            findings.push(format!("review analysis skipped: {}", err.reason));
            Vec::new()
        }
    };

    spinner.finish_and_clear();

    let metrics = RunMetrics {
        total_commits: commits.len(),
        total_review_comments: reviews.len(),
    };
    if args.verbose {
        println!(
            "  found {} commits and {} review comments in the window",
            metrics.total_commits, metrics.total_review_comments
        );
    }

    let mut records = commits;
    records.extend(reviews);

    let themes = config.themes_for_area(&window.area);
    let theme_matches = classify(&records, &themes);

    let patterns = analyse_files(&area_path, |name| config.is_ignored_dir(name))?;
    if args.verbose {
        println!("  scanned {} files under {}", patterns.total_files, window.area);
    }

    let generated_at = Local::now();
    let document = render(
        &window,
        &theme_matches,
        &patterns,
        &metrics,
        &config.technology_themes,
        &config.required_sections_for(&window.area),
        generated_at,
    );

    let guidelines_dir = repo_root.join(&config.guidelines_dir);
    let reports_dir = repo_root.join(&config.reports_dir);

    let canonical = canonical_guidelines_path(&guidelines_dir, &window.area);
    let previous = fs::read_to_string(&canonical).ok();
    let changes = diff_guidelines(previous.as_deref(), &document);

    let report = build_report(
        &window,
        &theme_matches,
        &patterns,
        &metrics,
        findings,
        changes,
        generated_at,
    );

    let saved = save_outputs(
        &guidelines_dir,
        &reports_dir,
        &window.area,
        &document.to_markdown(),
        &report.to_markdown(),
        generated_at,
    )?;

    println!("{}", style("✅ guideline refresh complete").green().bold());
    println!("  guidelines: {}", style(saved.guidelines.display()).yellow());
    if let Some(backup) = &saved.backup {
        println!("  backup:     {}", style(backup.display()).dim());
    }
    println!("  report:     {}", style(saved.report.display()).yellow());

    Ok(RefreshOutcome {
        guidelines_path: saved.guidelines,
        backup_path: saved.backup,
        report_path: saved.report,
        changes_from_previous: report.changes_from_previous,
    })
}
