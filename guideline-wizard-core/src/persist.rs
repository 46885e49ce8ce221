// persistence - backup, atomic overwrite, and report files

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::RefreshError;

/// where each artifact of a run ended up
#[derive(Debug, Clone)]
pub struct SavedPaths {
    pub guidelines: PathBuf,
    pub backup: Option<PathBuf>,
    pub report: PathBuf,
}

/// make an area name safe for a filename; replacing separators also keeps
/// every artifact inside the configured output directories
pub fn sanitize_area(area: &str) -> String {
    area.replace(['/', '\\'], "_")
}

/// canonical guidelines path for an area inside the guidelines directory
pub fn canonical_guidelines_path(guidelines_dir: &Path, area: &str) -> PathBuf {
    guidelines_dir.join(format!("{}.md", sanitize_area(area)))
}

/// write both artifacts: backup the previous guidelines unconditionally,
/// then replace the canonical file atomically, then write the run report
pub fn save_outputs(
    guidelines_dir: &Path,
    reports_dir: &Path,
    area: &str,
    guidelines_md: &str,
    report_md: &str,
    generated_at: DateTime<Local>,
) -> Result<SavedPaths, RefreshError> {
    fs::create_dir_all(guidelines_dir)
        .map_err(|e| RefreshError::persistence(guidelines_dir, e))?;
    fs::create_dir_all(reports_dir).map_err(|e| RefreshError::persistence(reports_dir, e))?;

    let stem = sanitize_area(area);
    let stamp = generated_at.format("%Y%m%d_%H%M%S");
    let canonical = canonical_guidelines_path(guidelines_dir, area);

    let backup = if canonical.is_file() {
        let backup_path = guidelines_dir.join(format!("{stem}.{stamp}.md.bak"));
        fs::copy(&canonical, &backup_path)
            .map_err(|e| RefreshError::persistence(&backup_path, e))?;
        Some(backup_path)
    } else {
        None
    };

    // the canonical file is never left truncated: the new content lands in a
    // sibling temp file first and replaces it in one rename
    let tmp = guidelines_dir.join(format!("{stem}.md.tmp"));
    fs::write(&tmp, guidelines_md).map_err(|e| RefreshError::persistence(&tmp, e))?;
    fs::rename(&tmp, &canonical).map_err(|e| RefreshError::persistence(&canonical, e))?;

    let report = reports_dir.join(format!("guideline-refresh-{stamp}.md"));
    fs::write(&report, report_md).map_err(|e| RefreshError::persistence(&report, e))?;

    Ok(SavedPaths {
        guidelines: canonical,
        backup,
        report,
    })
}
