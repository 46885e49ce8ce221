// review-comment collector - wraps the gh cli and filters merged prs by area

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use which::which;

use crate::config::AnalysisWindow;

use super::{CollectorUnavailable, RawRecord, RecordSource};

/// collect one record per review comment on merged prs that touch the area
pub fn collect_review_comments(
    repo_root: &Path,
    area: &str,
    window: &AnalysisWindow,
) -> Result<Vec<RawRecord>, CollectorUnavailable> {
    which("gh").map_err(|_| CollectorUnavailable::new("gh", "gh not found on PATH"))?;

    let limit = window.max_review_items.to_string();
    let output = Command::new("gh")
        .current_dir(repo_root)
        .args([
            "pr",
            "list",
            "--state",
            "merged",
            "--limit",
            limit.as_str(),
            "--json",
            "number,title,body,reviews,files",
        ])
        .output()
        .map_err(|e| CollectorUnavailable::new("gh", format!("failed to launch gh: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("gh pr list failed (is gh authenticated?)")
            .to_string();
        return Err(CollectorUnavailable::new("gh", reason));
    }

    relevant_review_records(&String::from_utf8_lossy(&output.stdout), area)
        .map_err(|e| CollectorUnavailable::new("gh", format!("unexpected pr payload: {e}")))
}

/// parse the gh json payload and keep review comments from prs whose changed
/// files mention the area
pub fn relevant_review_records(
    payload: &str,
    area: &str,
) -> Result<Vec<RawRecord>, serde_json::Error> {
    let prs: Vec<PullRequest> = serde_json::from_str(payload)?;

    let records = prs
        .into_iter()
        .filter(|pr| pr.files.iter().any(|file| file.path.contains(area)))
        .flat_map(|pr| pr.reviews)
        .filter(|review| !review.body.trim().is_empty())
        .map(|review| RawRecord {
            source: RecordSource::ReviewComment,
            text: review.body,
            timestamp: review.submitted_at,
            author: review.author.map(|author| author.login),
        })
        .collect();

    Ok(records)
}

// only the fields the filter and record extraction need; the rest of the
// payload is ignored
#[derive(Debug, Deserialize)]
struct PullRequest {
    #[serde(default)]
    reviews: Vec<Review>,
    #[serde(default)]
    files: Vec<ChangedFile>,
}

#[derive(Debug, Deserialize)]
struct Review {
    #[serde(default)]
    body: String,
    #[serde(default, rename = "submittedAt")]
    submitted_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    author: Option<ReviewAuthor>,
}

#[derive(Debug, Deserialize)]
struct ReviewAuthor {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ChangedFile {
    path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"[
        {
            "number": 41,
            "title": "rework button props",
            "body": "typed props everywhere",
            "files": [{"path": "frontend/components/Button.tsx"}],
            "reviews": [
                {"body": "please add a unit test for the disabled state",
                 "submittedAt": "2026-02-01T09:00:00Z",
                 "author": {"login": "riley"}},
                {"body": "   "},
                {"body": "prop types look much safer now"}
            ]
        },
        {
            "number": 42,
            "title": "backend cleanup",
            "body": null,
            "files": [{"path": "backend/api/routes.rs"}],
            "reviews": [{"body": "unrelated to the frontend area"}]
        }
    ]"#;

    #[test]
    fn keeps_one_record_per_relevant_review_comment() {
        let records = relevant_review_records(PAYLOAD, "frontend/components").unwrap();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.source == RecordSource::ReviewComment));
        assert_eq!(records[0].text, "please add a unit test for the disabled state");
        assert_eq!(records[0].author.as_deref(), Some("riley"));
        assert!(records[0].timestamp.is_some());
    }

    #[test]
    fn prs_outside_the_area_are_filtered_out() {
        let records = relevant_review_records(PAYLOAD, "backend/api").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "unrelated to the frontend area");
    }

    #[test]
    fn blank_review_bodies_are_skipped() {
        let records = relevant_review_records(PAYLOAD, "frontend/components").unwrap();
        assert!(records.iter().all(|r| !r.text.trim().is_empty()));
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(relevant_review_records("not json", "area").is_err());
    }

    #[test]
    fn empty_pr_list_yields_no_records() {
        assert!(relevant_review_records("[]", "area").unwrap().is_empty());
    }
}
