// coarse guideline diffing - section-level comparison against the saved copy

use lazy_static::lazy_static;
use regex::Regex;

use super::render::{GuidelinesDocument, Section};

/// notice emitted when no previous guidelines exist for the area
pub const INITIAL_VERSION_NOTICE: &str =
    "No previous guidelines found; this is the initial version.";

/// extract `## ` sections from a saved guidelines document
///
/// text before the first heading (title, metadata) belongs to no section;
/// a bare `---` rule ends the section list, keeping the document footer out
/// of the last section's body
pub fn parse_sections(markdown: &str) -> Vec<Section> {
    lazy_static! {
        static ref HEADING: Regex = Regex::new(r"^## (.+)$").unwrap();
    }

    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in markdown.lines() {
        if line.trim() == "---" && current.is_some() {
            break;
        }
        if let Some(caps) = HEADING.captures(line) {
            if let Some((heading, lines)) = current.take() {
                sections.push(section_from(heading, lines));
            }
            current = Some((caps[1].trim().to_string(), Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }
    if let Some((heading, lines)) = current.take() {
        sections.push(section_from(heading, lines));
    }

    sections
}

fn section_from(heading: String, lines: Vec<&str>) -> Section {
    Section {
        heading,
        body: lines.join("\n").trim().to_string(),
    }
}

/// compare the newly rendered document against the previously saved markdown
///
/// whole-section-body equality only; returns human-readable change lines,
/// empty when nothing structural changed
pub fn diff_guidelines(previous: Option<&str>, new_document: &GuidelinesDocument) -> Vec<String> {
    let previous = match previous {
        Some(markdown) => markdown,
        None => return vec![INITIAL_VERSION_NOTICE.to_string()],
    };

    let old_sections = parse_sections(previous);
    let mut changes = Vec::new();

    for section in &new_document.sections {
        if !old_sections.iter().any(|old| old.heading == section.heading) {
            changes.push(format!("Added: {}", section.heading));
        }
    }
    for old in &old_sections {
        if !new_document
            .sections
            .iter()
            .any(|section| section.heading == old.heading)
        {
            changes.push(format!("Removed: {}", old.heading));
        }
    }
    for section in &new_document.sections {
        if let Some(old) = old_sections.iter().find(|old| old.heading == section.heading) {
            if old.body != section.body.trim() {
                changes.push(format!("Changed: {}", section.heading));
            }
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn document(sections: &[(&str, &str)]) -> GuidelinesDocument {
        GuidelinesDocument {
            area: "frontend/components".to_string(),
            generated_at: Local.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap(),
            sections: sections
                .iter()
                .map(|(heading, body)| Section {
                    heading: heading.to_string(),
                    body: body.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn missing_previous_yields_exactly_the_initial_notice() {
        let doc = document(&[("Analysis Summary", "- stats")]);
        let changes = diff_guidelines(None, &doc);
        assert_eq!(changes, vec![INITIAL_VERSION_NOTICE.to_string()]);
    }

    #[test]
    fn identical_documents_produce_no_change_lines() {
        let doc = document(&[
            ("Analysis Summary", "- **Commits analysed:** 3"),
            ("Recommendations", "1. keep testing"),
        ]);
        let markdown = doc.to_markdown();
        assert!(diff_guidelines(Some(&markdown), &doc).is_empty());
    }

    #[test]
    fn timestamp_only_reruns_produce_no_change_lines() {
        let doc = document(&[("Analysis Summary", "- stable body")]);
        let markdown = doc.to_markdown();
        let mut later = doc.clone();
        later.generated_at = Local.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).unwrap();
        assert!(diff_guidelines(Some(&markdown), &later).is_empty());
    }

    #[test]
    fn added_removed_and_changed_sections_are_reported() {
        let old = document(&[
            ("Analysis Summary", "- old stats"),
            ("File Organization", "- `.ts`: 4 files"),
        ]);
        let new = document(&[
            ("Analysis Summary", "- new stats"),
            ("Recommendations", "1. add tests"),
        ]);
        let changes = diff_guidelines(Some(&old.to_markdown()), &new);
        assert_eq!(
            changes,
            vec![
                "Added: Recommendations".to_string(),
                "Removed: File Organization".to_string(),
                "Changed: Analysis Summary".to_string(),
            ]
        );
    }

    #[test]
    fn parsing_survives_subheadings_and_stops_at_the_footer_rule() {
        let markdown = "# Coding Guidelines: x\n\n\
                        ## Focus\n\n### Testing (2 mentions)\n\nbody line\n\n\
                        ---\n\n*footer*\n";
        let sections = parse_sections(markdown);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "Focus");
        assert!(sections[0].body.contains("### Testing (2 mentions)"));
        assert!(!sections[0].body.contains("footer"));
    }
}
