// file-pattern analysis - extension counts and naming conventions for an area

use std::collections::BTreeMap;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

use crate::error::RefreshError;

/// directory names skipped entirely unless overridden by configuration
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    "vendor",
    "__pycache__",
    ".git",
];

/// files sharing one extension (leading dot, case-sensitive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub extension: String,
    pub count: usize,
}

/// filename shape, assigned by fixed precedence so every file lands in
/// exactly one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NamingConvention {
    Pascal,
    Camel,
    Kebab,
    Snake,
    Other,
}

impl NamingConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::Pascal => "PascalCase",
            NamingConvention::Camel => "camelCase",
            NamingConvention::Kebab => "kebab-case",
            NamingConvention::Snake => "snake_case",
            NamingConvention::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConventionStat {
    pub convention: NamingConvention,
    pub count: usize,
}

/// everything the walk produced, ordered for deterministic rendering
#[derive(Debug, Clone, Default)]
pub struct FilePatterns {
    pub total_files: usize,
    /// descending count, ties by extension
    pub extensions: Vec<FileStat>,
    /// descending count, ties by precedence order
    pub naming: Vec<NamingConventionStat>,
}

impl FilePatterns {
    /// the convention covering more than the given share of files, if any
    pub fn majority_convention(&self, threshold: f64) -> Option<&NamingConventionStat> {
        if self.total_files == 0 {
            return None;
        }
        self.naming
            .first()
            .filter(|stat| stat.count as f64 / self.total_files as f64 > threshold)
    }
}

/// walk the area subtree and aggregate extension and naming statistics
///
/// hidden entries are skipped; directories for which the predicate returns
/// true are pruned without descending
pub fn analyse_files<F>(area_path: &Path, ignore_dir: F) -> Result<FilePatterns, RefreshError>
where
    F: Fn(&str) -> bool,
{
    if !area_path.is_dir() {
        return Err(RefreshError::AreaNotFound(area_path.to_path_buf()));
    }

    let mut extensions: BTreeMap<String, usize> = BTreeMap::new();
    let mut naming: BTreeMap<NamingConvention, usize> = BTreeMap::new();
    let mut total_files = 0usize;

    let walker = WalkDir::new(area_path).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            return false;
        }
        !(entry.file_type().is_dir() && ignore_dir(&name))
    });

    for entry in walker {
        // unreadable entries degrade to "not counted" rather than aborting
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        total_files += 1;

        if let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) {
            *extensions.entry(format!(".{ext}")).or_insert(0) += 1;
        }

        let stem = entry
            .path()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        *naming.entry(classify_naming(stem)).or_insert(0) += 1;
    }

    let mut extension_stats: Vec<FileStat> = extensions
        .into_iter()
        .map(|(extension, count)| FileStat { extension, count })
        .collect();
    extension_stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.extension.cmp(&b.extension))
    });

    let mut naming_stats: Vec<NamingConventionStat> = naming
        .into_iter()
        .map(|(convention, count)| NamingConventionStat { convention, count })
        .collect();
    naming_stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.convention.cmp(&b.convention))
    });

    Ok(FilePatterns {
        total_files,
        extensions: extension_stats,
        naming: naming_stats,
    })
}

/// classify a filename stem into exactly one convention
///
/// fixed precedence: Pascal, then camel, then kebab, then snake, then other;
/// kebab and snake require at least one separator, so a bare lowercase word
/// counts as camelCase
pub fn classify_naming(stem: &str) -> NamingConvention {
    lazy_static! {
        static ref PASCAL: Regex = Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap();
        static ref CAMEL: Regex = Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap();
        static ref KEBAB: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)+$").unwrap();
        static ref SNAKE: Regex = Regex::new(r"^[a-z0-9]+(?:_[a-z0-9]+)+$").unwrap();
    }

    if PASCAL.is_match(stem) {
        NamingConvention::Pascal
    } else if CAMEL.is_match(stem) {
        NamingConvention::Camel
    } else if KEBAB.is_match(stem) {
        NamingConvention::Kebab
    } else if SNAKE.is_match(stem) {
        NamingConvention::Snake
    } else {
        NamingConvention::Other
    }
}
