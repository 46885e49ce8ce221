// commit history collector - shells out to git and parses a machine-readable log

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local};
use git2::Repository;

use crate::config::AnalysisWindow;

use super::{CollectorUnavailable, RawRecord, RecordSource};

// ascii unit/record separators keep subjects and bodies unambiguous
const FIELD_SEP: char = '\x1f';
const RECORD_SEP: char = '\x1e';

/// locate the repository root containing the given path
pub fn repo_root(start: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(start).context("not inside a git repository")?;
    let workdir = repo
        .workdir()
        .context("repository has no working tree (bare repository?)")?;
    Ok(workdir.to_path_buf())
}

/// collect one record per commit touching the area within the lookback window
pub fn collect_commits(
    repo_root: &Path,
    area: &str,
    window: &AnalysisWindow,
) -> Result<Vec<RawRecord>, CollectorUnavailable> {
    let since = (Local::now() - Duration::days(i64::from(window.lookback_days)))
        .format("%Y-%m-%d")
        .to_string();
    let pretty = format!("--pretty=format:%H{FIELD_SEP}%aI{FIELD_SEP}%an{FIELD_SEP}%s{FIELD_SEP}%b{RECORD_SEP}");

    let output = Command::new("git")
        .current_dir(repo_root)
        .arg("log")
        .arg(format!("--since={since}"))
        .arg(pretty)
        .arg("--")
        .arg(area)
        .output()
        .map_err(|e| CollectorUnavailable::new("git", format!("failed to launch git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr.lines().next().unwrap_or("git log failed").to_string();
        return Err(CollectorUnavailable::new("git", reason));
    }

    Ok(parse_log_output(&String::from_utf8_lossy(&output.stdout)))
}

/// parse separator-delimited git log output into raw records; tolerant of
/// trailing separators and blank entries
pub fn parse_log_output(output: &str) -> Vec<RawRecord> {
    output
        .split(RECORD_SEP)
        .filter_map(|entry| {
            let entry = entry.trim_matches(|c| c == '\n' || c == '\r');
            if entry.is_empty() {
                return None;
            }
            let mut fields = entry.splitn(5, FIELD_SEP);
            let _hash = fields.next()?;
            let date = fields.next().unwrap_or_default();
            let author = fields.next().unwrap_or_default();
            let subject = fields.next().unwrap_or_default().trim();
            let body = fields.next().unwrap_or_default().trim();

            let text = if body.is_empty() {
                subject.to_string()
            } else {
                format!("{subject}\n\n{body}")
            };
            if text.is_empty() {
                return None;
            }

            Some(RawRecord {
                source: RecordSource::Commit,
                text,
                timestamp: DateTime::parse_from_rfc3339(date).ok(),
                author: (!author.is_empty()).then(|| author.to_string()),
            })
        })
        .collect()
}
