// guideline rendering - a pure, deterministic template over the run's data

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::config::AnalysisWindow;
use crate::utils::display_theme;

use super::files::FilePatterns;
use super::themes::{qualifying, ThemeMatch};
use super::RunMetrics;

/// share of files a naming convention must exceed to be called out
pub const MAJORITY_CONVENTION_THRESHOLD: f64 = 0.6;

/// how many extensions the file-organization section lists
const MAX_LISTED_EXTENSIONS: usize = 5;

/// one `## ` heading and the text under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// the rendered guidelines for one area, superseding any previous version
#[derive(Debug, Clone, PartialEq)]
pub struct GuidelinesDocument {
    pub area: String,
    pub generated_at: DateTime<Local>,
    pub sections: Vec<Section>,
}

impl GuidelinesDocument {
    /// deterministic markdown; identical documents serialize byte-identically
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Coding Guidelines: {}\n\n", self.area));
        out.push_str(&format!(
            "**Last updated:** {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M")
        ));
        out.push_str("**Generated by:** guideline-wizard\n\n");
        for section in &self.sections {
            out.push_str(&format!("## {}\n\n{}\n\n", section.heading, section.body));
        }
        out.push_str("---\n\n");
        out.push_str(
            "*These guidelines are generated from observed repository activity. \
             Review and enrich with code examples before adopting.*\n",
        );
        out
    }
}

/// render the guidelines document from classified themes and file patterns
///
/// pure function of its inputs: fixed section order, data-empty sections
/// omitted, required sections from area configuration appended last
pub fn render(
    window: &AnalysisWindow,
    theme_matches: &BTreeMap<String, ThemeMatch>,
    patterns: &FilePatterns,
    metrics: &RunMetrics,
    technology_themes: &[String],
    required_sections: &[String],
    generated_at: DateTime<Local>,
) -> GuidelinesDocument {
    let mut sections = Vec::new();

    sections.push(Section {
        heading: "Analysis Summary".to_string(),
        body: summary_body(window, metrics, patterns),
    });

    if let Some(body) = technology_body(theme_matches, technology_themes) {
        sections.push(Section {
            heading: "Technology Focus".to_string(),
            body,
        });
    }

    if patterns.total_files > 0 {
        sections.push(Section {
            heading: "File Organization".to_string(),
            body: organization_body(patterns),
        });
    }

    let ranked = qualifying(theme_matches, window.min_pattern_frequency);
    if !ranked.is_empty() {
        sections.push(Section {
            heading: "Code Review Focus Areas".to_string(),
            body: focus_body(&ranked),
        });
        sections.push(Section {
            heading: "Recommendations".to_string(),
            body: recommendations_body(&ranked, window),
        });
    }

    for heading in required_sections {
        if !sections.iter().any(|s| &s.heading == heading) {
            sections.push(Section {
                heading: heading.clone(),
                body: "_No recurring signals for this section in the analysis window; \
                       kept per area configuration._"
                    .to_string(),
            });
        }
    }

    GuidelinesDocument {
        area: window.area.clone(),
        generated_at,
        sections,
    }
}

fn summary_body(window: &AnalysisWindow, metrics: &RunMetrics, patterns: &FilePatterns) -> String {
    format!(
        "- **Depth profile:** {} ({}-day lookback)\n\
         - **Commits analysed:** {}\n\
         - **Review comments analysed:** {}\n\
         - **Files in area:** {}",
        window.depth,
        window.lookback_days,
        metrics.total_commits,
        metrics.total_review_comments,
        patterns.total_files
    )
}

fn technology_body(
    theme_matches: &BTreeMap<String, ThemeMatch>,
    technology_themes: &[String],
) -> Option<String> {
    let mut entries: Vec<&ThemeMatch> = technology_themes
        .iter()
        .filter_map(|name| theme_matches.get(name))
        .filter(|theme| theme.count > 0)
        .collect();
    if entries.is_empty() {
        return None;
    }
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    let mut body = String::from("Recurring technology signals in commits and reviews:\n");
    for theme in entries {
        body.push_str(&format!(
            "\n- **{}**: {} mention{}",
            display_theme(&theme.name),
            theme.count,
            plural(theme.count)
        ));
    }
    Some(body)
}

fn organization_body(patterns: &FilePatterns) -> String {
    let mut body = String::from("**Primary file types:**\n");
    for stat in patterns.extensions.iter().take(MAX_LISTED_EXTENSIONS) {
        body.push_str(&format!(
            "\n- `{}`: {} file{} ({:.1}%)",
            stat.extension,
            stat.count,
            plural(stat.count),
            percentage(stat.count, patterns.total_files)
        ));
    }

    body.push_str("\n\n**Observed naming patterns:**\n");
    for stat in &patterns.naming {
        body.push_str(&format!(
            "\n- **{}**: {} file{} ({:.1}%)",
            stat.convention.as_str(),
            stat.count,
            plural(stat.count),
            percentage(stat.count, patterns.total_files)
        ));
    }

    if let Some(majority) = patterns.majority_convention(MAJORITY_CONVENTION_THRESHOLD) {
        body.push_str(&format!(
            "\n\n**Majority convention:** `{}` ({:.1}% of files); name new files to match.",
            majority.convention.as_str(),
            percentage(majority.count, patterns.total_files)
        ));
    }

    body
}

fn focus_body(ranked: &[&ThemeMatch]) -> String {
    let mut body =
        String::from("Themes that cleared the configured frequency threshold, ranked by mentions:\n");
    for theme in ranked {
        body.push_str(&format!(
            "\n### {} ({} mention{})\n",
            display_theme(&theme.name),
            theme.count,
            plural(theme.count)
        ));
        if let Some(example) = theme.examples.first() {
            body.push_str(&format!("\nExample feedback: \"{example}\"\n"));
        }
    }
    // single trailing newline is stripped so section bodies stay uniform
    body.trim_end().to_string()
}

fn recommendations_body(ranked: &[&ThemeMatch], window: &AnalysisWindow) -> String {
    let mut body = String::from("Based on the analysis above:\n");
    for (index, theme) in ranked.iter().enumerate() {
        body.push_str(&format!(
            "\n{}. **{}**: mentioned {} time{} in the last {} days of history and review; \
             keep it a first-class item on the review checklist.",
            index + 1,
            display_theme(&theme.name),
            theme.count,
            plural(theme.count),
            window.lookback_days
        ));
    }
    body
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
