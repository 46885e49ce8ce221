// analysis report - metrics and findings explaining a refresh run

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::config::{AnalysisWindow, Depth};

use super::files::FilePatterns;
use super::render::MAJORITY_CONVENTION_THRESHOLD;
use super::themes::ThemeMatch;
use super::RunMetrics;

/// write-once artifact accompanying the guidelines document
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub area: String,
    pub depth: Depth,
    pub generated_at: DateTime<Local>,
    /// raw counts, including themes below the frequency threshold
    pub metrics: BTreeMap<String, u64>,
    pub findings: Vec<String>,
    pub changes_from_previous: Vec<String>,
}

impl AnalysisReport {
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Guideline Refresh Report\n\n");
        out.push_str(&format!("**Area:** `{}`\n", self.area));
        out.push_str(&format!("**Depth:** {}\n", self.depth));
        out.push_str(&format!(
            "**Generated:** {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));

        out.push_str("## Metrics\n\n");
        for (name, value) in &self.metrics {
            out.push_str(&format!("- **{name}:** {value}\n"));
        }

        out.push_str("\n## Findings\n\n");
        if self.findings.is_empty() {
            out.push_str("- none recorded\n");
        } else {
            for finding in &self.findings {
                out.push_str(&format!("- {finding}\n"));
            }
        }

        out.push_str("\n## Changes from Previous\n\n");
        if self.changes_from_previous.is_empty() {
            out.push_str("- no structural changes from the previous version\n");
        } else {
            for change in &self.changes_from_previous {
                out.push_str(&format!("- {change}\n"));
            }
        }

        out
    }
}

/// assemble the report: collector findings are passed in, data-derived
/// findings (dominant naming, top theme) are appended here
pub fn build_report(
    window: &AnalysisWindow,
    theme_matches: &BTreeMap<String, ThemeMatch>,
    patterns: &FilePatterns,
    metrics: &RunMetrics,
    mut findings: Vec<String>,
    changes_from_previous: Vec<String>,
    generated_at: DateTime<Local>,
) -> AnalysisReport {
    let mut metric_map: BTreeMap<String, u64> = BTreeMap::new();
    metric_map.insert("total_commits".to_string(), metrics.total_commits as u64);
    metric_map.insert(
        "total_review_comments".to_string(),
        metrics.total_review_comments as u64,
    );
    metric_map.insert("total_files".to_string(), patterns.total_files as u64);
    for (name, theme) in theme_matches {
        metric_map.insert(format!("theme_{name}"), theme.count as u64);
    }

    if let Some(majority) = patterns.majority_convention(MAJORITY_CONVENTION_THRESHOLD) {
        findings.push(format!(
            "dominant naming convention: {} ({:.1}% of files)",
            majority.convention.as_str(),
            majority.count as f64 / patterns.total_files as f64 * 100.0
        ));
    }

    if let Some(top) = top_theme(theme_matches) {
        findings.push(format!(
            "most frequent theme: {} ({} mentions)",
            top.name, top.count
        ));
    }

    AnalysisReport {
        area: window.area.clone(),
        depth: window.depth,
        generated_at,
        metrics: metric_map,
        findings,
        changes_from_previous,
    }
}

fn top_theme(theme_matches: &BTreeMap<String, ThemeMatch>) -> Option<&ThemeMatch> {
    theme_matches
        .values()
        .filter(|theme| theme.count > 0)
        .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.name.cmp(&a.name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::themes::classify;
    use crate::collect::{RawRecord, RecordSource};
    use crate::config::RefreshConfig;
    use chrono::TimeZone;

    fn window() -> AnalysisWindow {
        AnalysisWindow {
            area: "frontend/components".to_string(),
            depth: Depth::Standard,
            lookback_days: 90,
            max_review_items: 50,
            min_pattern_frequency: 5,
        }
    }

    fn stamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn metrics_include_every_theme_even_below_threshold() {
        let config = RefreshConfig::default();
        let records = vec![RawRecord::new(RecordSource::Commit, "add unit test")];
        let matches = classify(&records, &config.themes);

        let report = build_report(
            &window(),
            &matches,
            &FilePatterns::default(),
            &RunMetrics {
                total_commits: 1,
                total_review_comments: 0,
            },
            Vec::new(),
            Vec::new(),
            stamp(),
        );

        // one metric per configured theme plus the three volume counters
        assert_eq!(report.metrics.len(), config.themes.len() + 3);
        assert_eq!(report.metrics["theme_testing"], 1);
        assert_eq!(report.metrics["theme_security"], 0);
        assert_eq!(report.metrics["total_commits"], 1);
    }

    #[test]
    fn collector_findings_survive_into_the_rendered_report() {
        let config = RefreshConfig::default();
        let matches = classify(&[], &config.themes);
        let findings = vec!["review analysis skipped: gh not found on PATH".to_string()];

        let report = build_report(
            &window(),
            &matches,
            &FilePatterns::default(),
            &RunMetrics::default(),
            findings,
            Vec::new(),
            stamp(),
        );
        let markdown = report.to_markdown();

        let skip_lines = markdown
            .lines()
            .filter(|line| line.contains("review analysis skipped"))
            .count();
        assert_eq!(skip_lines, 1);
    }

    #[test]
    fn empty_changes_render_an_explicit_no_change_line() {
        let config = RefreshConfig::default();
        let matches = classify(&[], &config.themes);
        let report = build_report(
            &window(),
            &matches,
            &FilePatterns::default(),
            &RunMetrics::default(),
            Vec::new(),
            Vec::new(),
            stamp(),
        );
        assert!(report
            .to_markdown()
            .contains("- no structural changes from the previous version"));
    }

    #[test]
    fn change_lines_are_listed_in_order() {
        let config = RefreshConfig::default();
        let matches = classify(&[], &config.themes);
        let changes = vec![
            "Added: Recommendations".to_string(),
            "Changed: Analysis Summary".to_string(),
        ];
        let report = build_report(
            &window(),
            &matches,
            &FilePatterns::default(),
            &RunMetrics::default(),
            Vec::new(),
            changes,
            stamp(),
        );
        let markdown = report.to_markdown();
        let added = markdown.find("- Added: Recommendations").unwrap();
        let changed = markdown.find("- Changed: Analysis Summary").unwrap();
        assert!(added < changed);
    }
}
