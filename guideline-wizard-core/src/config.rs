// configuration loading and the per-run analysis window

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::RefreshError;

/// default configuration file looked up at the repository root
pub const CONFIG_FILE_NAME: &str = "guideline-wizard.toml";

/// named preset controlling lookback window and data volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Depth {
    Quick,
    Standard,
    Deep,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Quick => "quick",
            Depth::Standard => "standard",
            Depth::Deep => "deep",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// tunable numbers behind one depth preset
#[derive(Debug, Clone)]
pub struct DepthProfile {
    /// how many days of commit history to inspect
    pub lookback_days: u32,
    /// how many merged pull requests to pull review comments from
    pub max_review_items: u32,
    /// themes below this match count stay out of the rendered recommendations
    pub min_pattern_frequency: usize,
}

/// optional per-area additions layered on top of the global dictionary
#[derive(Debug, Clone, Default)]
pub struct AreaOverrides {
    pub extra_patterns: BTreeMap<String, Vec<String>>,
    pub required_sections: Vec<String>,
}

/// immutable configuration loaded once at startup
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub quick: DepthProfile,
    pub standard: DepthProfile,
    pub deep: DepthProfile,
    /// theme name -> lowercase keywords matched as substrings
    pub themes: BTreeMap<String, Vec<String>>,
    /// theme names surfaced in the "Technology Focus" section
    pub technology_themes: Vec<String>,
    /// directory names skipped entirely during the file walk
    pub ignored_dirs: Vec<String>,
    pub guidelines_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub areas: BTreeMap<String, AreaOverrides>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        let themes = [
            ("testing", vec!["test", "coverage", "spec", "jest", "vitest", "cypress"]),
            ("type_safety", vec!["type", "typescript", "interface", "any", "unknown"]),
            ("performance", vec!["performance", "optimize", "slow", "cache", "memo", "lazy"]),
            ("security", vec!["security", "vulnerability", "sanitize", "injection", "xss"]),
            ("naming", vec!["naming", "rename", "name is", "variable name"]),
            ("documentation", vec!["document", "comment", "readme", "docs", "jsdoc"]),
            ("accessibility", vec!["accessibility", "a11y", "aria", "screen reader"]),
            ("error_handling", vec!["error", "exception", "catch", "throw"]),
            ("code_organization", vec!["structure", "organize", "directory", "folder", "split"]),
            ("typescript", vec!["typescript", "tsx"]),
            ("react", vec!["react", "jsx", "hook", "component"]),
            ("vue", vec!["vue", "composition"]),
            ("async", vec!["async", "await", "promise"]),
        ];

        RefreshConfig {
            quick: DepthProfile {
                lookback_days: 30,
                max_review_items: 20,
                min_pattern_frequency: 3,
            },
            standard: DepthProfile {
                lookback_days: 90,
                max_review_items: 50,
                min_pattern_frequency: 5,
            },
            deep: DepthProfile {
                lookback_days: 180,
                max_review_items: 100,
                min_pattern_frequency: 3,
            },
            themes: themes
                .into_iter()
                .map(|(name, keywords)| {
                    (
                        name.to_string(),
                        keywords.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
            technology_themes: vec![
                "typescript".to_string(),
                "react".to_string(),
                "vue".to_string(),
                "async".to_string(),
            ],
            ignored_dirs: crate::analysis::files::DEFAULT_IGNORED_DIRS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            guidelines_dir: PathBuf::from(".guidelines"),
            reports_dir: PathBuf::from(".guidelines/reports"),
            areas: BTreeMap::new(),
        }
    }
}

impl RefreshConfig {
    /// load configuration, preferring an explicit file, then the repo-root
    /// config file, then the built-in defaults
    pub fn load(explicit: Option<&Path>, repo_root: &Path) -> Result<Self, RefreshError> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(RefreshError::config_invalid(
                        "config",
                        format!("file not found: {}", path.display()),
                    ));
                }
                Some(path.to_path_buf())
            }
            None => {
                let candidate = repo_root.join(CONFIG_FILE_NAME);
                candidate.is_file().then_some(candidate)
            }
        };

        let mut config = RefreshConfig::default();
        if let Some(path) = path {
            let text = fs::read_to_string(&path).map_err(|e| {
                RefreshError::config_invalid("config", format!("{}: {e}", path.display()))
            })?;
            let raw: RawConfig = toml::from_str(&text)
                .map_err(|e| RefreshError::config_invalid("config", e.to_string()))?;
            config.apply(raw);
        }
        config.validate()?;
        Ok(config)
    }

    /// parse configuration from an in-memory TOML document
    pub fn from_toml(text: &str) -> Result<Self, RefreshError> {
        let raw: RawConfig =
            toml::from_str(text).map_err(|e| RefreshError::config_invalid("config", e.to_string()))?;
        let mut config = RefreshConfig::default();
        config.apply(raw);
        config.validate()?;
        Ok(config)
    }

    pub fn profile(&self, depth: Depth) -> &DepthProfile {
        match depth {
            Depth::Quick => &self.quick,
            Depth::Standard => &self.standard,
            Depth::Deep => &self.deep,
        }
    }

    /// the global dictionary plus any extra patterns configured for the area
    pub fn themes_for_area(&self, area: &str) -> BTreeMap<String, Vec<String>> {
        let mut themes = self.themes.clone();
        if let Some(overrides) = self.areas.get(area) {
            for (name, keywords) in &overrides.extra_patterns {
                themes
                    .entry(name.clone())
                    .or_default()
                    .extend(keywords.iter().cloned());
            }
        }
        themes
    }

    pub fn required_sections_for(&self, area: &str) -> Vec<String> {
        self.areas
            .get(area)
            .map(|overrides| overrides.required_sections.clone())
            .unwrap_or_default()
    }

    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dirs.iter().any(|dir| dir == name)
    }

    fn apply(&mut self, raw: RawConfig) {
        if let Some(depths) = raw.depth {
            if let Some(profile) = depths.quick {
                self.quick = profile.into();
            }
            if let Some(profile) = depths.standard {
                self.standard = profile.into();
            }
            if let Some(profile) = depths.deep {
                self.deep = profile.into();
            }
        }
        if let Some(output) = raw.output {
            if let Some(dir) = output.guidelines_dir {
                self.guidelines_dir = PathBuf::from(dir);
            }
            if let Some(dir) = output.reports_dir {
                self.reports_dir = PathBuf::from(dir);
            }
        }
        let explicit_tech = raw.technology_themes.is_some();
        if let Some(themes) = raw.themes {
            self.themes = themes;
        }
        if let Some(tech) = raw.technology_themes {
            self.technology_themes = tech;
        }
        // a replaced dictionary keeps only the default technology themes it
        // still defines, unless the list was spelled out explicitly
        if !explicit_tech {
            self.technology_themes
                .retain(|name| self.themes.contains_key(name));
        }
        if let Some(dirs) = raw.ignored_dirs {
            self.ignored_dirs = dirs;
        }
        self.areas = raw
            .areas
            .into_iter()
            .map(|(area, overrides)| {
                (
                    area,
                    AreaOverrides {
                        extra_patterns: overrides.extra_patterns,
                        required_sections: overrides.required_sections,
                    },
                )
            })
            .collect();
    }

    /// reject malformed entries up front, naming the offending field
    fn validate(&mut self) -> Result<(), RefreshError> {
        for (name, profile) in [
            ("depth.quick", &self.quick),
            ("depth.standard", &self.standard),
            ("depth.deep", &self.deep),
        ] {
            if profile.lookback_days == 0 {
                return Err(RefreshError::config_invalid(name, "lookback_days must be positive"));
            }
            if profile.max_review_items == 0 {
                return Err(RefreshError::config_invalid(name, "max_review_items must be positive"));
            }
            if profile.min_pattern_frequency == 0 {
                return Err(RefreshError::config_invalid(
                    name,
                    "min_pattern_frequency must be positive",
                ));
            }
        }

        if self.themes.is_empty() {
            return Err(RefreshError::config_invalid("themes", "at least one theme is required"));
        }
        for (name, keywords) in &mut self.themes {
            if keywords.is_empty() {
                return Err(RefreshError::config_invalid(
                    "themes",
                    format!("theme '{name}' has no keywords"),
                ));
            }
            if keywords.iter().any(|kw| kw.trim().is_empty()) {
                return Err(RefreshError::config_invalid(
                    "themes",
                    format!("theme '{name}' contains an empty keyword"),
                ));
            }
            // matching is a plain substring test over lowered record text
            for keyword in keywords.iter_mut() {
                *keyword = keyword.to_lowercase();
            }
        }

        for tech in &self.technology_themes {
            if !self.themes.contains_key(tech) {
                return Err(RefreshError::config_invalid(
                    "technology_themes",
                    format!("'{tech}' is not a configured theme"),
                ));
            }
        }

        for (area, overrides) in &mut self.areas {
            for (name, keywords) in &mut overrides.extra_patterns {
                if keywords.is_empty() {
                    return Err(RefreshError::config_invalid(
                        "areas",
                        format!("area '{area}' pattern '{name}' has no keywords"),
                    ));
                }
                for keyword in keywords.iter_mut() {
                    *keyword = keyword.to_lowercase();
                }
            }
            if overrides.required_sections.iter().any(|s| s.trim().is_empty()) {
                return Err(RefreshError::config_invalid(
                    "areas",
                    format!("area '{area}' has an empty required section name"),
                ));
            }
        }

        Ok(())
    }
}

/// immutable per-run parameters derived from the selected depth profile
#[derive(Debug, Clone)]
pub struct AnalysisWindow {
    pub area: String,
    pub depth: Depth,
    pub lookback_days: u32,
    pub max_review_items: u32,
    pub min_pattern_frequency: usize,
}

impl AnalysisWindow {
    pub fn new(area: &str, depth: Depth, config: &RefreshConfig) -> Result<Self, RefreshError> {
        let area = area.trim_end_matches('/');
        if area.trim().is_empty() {
            return Err(RefreshError::config_invalid(
                "area",
                "must be a non-empty relative path",
            ));
        }
        if Path::new(area).is_absolute() {
            return Err(RefreshError::config_invalid(
                "area",
                "must be relative to the repository root",
            ));
        }
        let profile = config.profile(depth);
        Ok(AnalysisWindow {
            area: area.to_string(),
            depth,
            lookback_days: profile.lookback_days,
            max_review_items: profile.max_review_items,
            min_pattern_frequency: profile.min_pattern_frequency,
        })
    }
}

// raw serde mirror of the TOML schema; unknown keys are rejected outright

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    ignored_dirs: Option<Vec<String>>,
    #[serde(default)]
    technology_themes: Option<Vec<String>>,
    #[serde(default)]
    depth: Option<RawDepths>,
    #[serde(default)]
    output: Option<RawOutput>,
    #[serde(default)]
    themes: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    areas: BTreeMap<String, RawAreaOverrides>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDepths {
    #[serde(default)]
    quick: Option<RawProfile>,
    #[serde(default)]
    standard: Option<RawProfile>,
    #[serde(default)]
    deep: Option<RawProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProfile {
    lookback_days: u32,
    max_review_items: u32,
    min_pattern_frequency: usize,
}

impl From<RawProfile> for DepthProfile {
    fn from(raw: RawProfile) -> Self {
        DepthProfile {
            lookback_days: raw.lookback_days,
            max_review_items: raw.max_review_items,
            min_pattern_frequency: raw.min_pattern_frequency,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    #[serde(default)]
    guidelines_dir: Option<String>,
    #[serde(default)]
    reports_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawAreaOverrides {
    #[serde(default)]
    extra_patterns: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    required_sections: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RefreshError;

    #[test]
    fn default_config_passes_validation() {
        let mut config = RefreshConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.profile(Depth::Standard).lookback_days, 90);
        assert_eq!(config.profile(Depth::Quick).max_review_items, 20);
        assert_eq!(config.profile(Depth::Deep).lookback_days, 180);
    }

    #[test]
    fn zero_lookback_is_rejected_naming_the_field() {
        let toml = r#"
            [depth.quick]
            lookback_days = 0
            max_review_items = 20
            min_pattern_frequency = 3
        "#;
        let err = RefreshConfig::from_toml(toml).unwrap_err();
        match err {
            RefreshError::ConfigInvalid { field, reason } => {
                assert_eq!(field, "depth.quick");
                assert!(reason.contains("lookback_days"));
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn unknown_technology_theme_is_rejected() {
        let toml = r#"technology_themes = ["cobol"]"#;
        let err = RefreshConfig::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("technology_themes"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(RefreshConfig::from_toml("unexpected_key = 1").is_err());
    }

    #[test]
    fn keywords_are_lowercased_at_load() {
        let toml = r#"
            [themes]
            testing = ["Test", "COVERAGE"]
        "#;
        let config = RefreshConfig::from_toml(toml).unwrap();
        assert_eq!(config.themes["testing"], vec!["test", "coverage"]);
    }

    #[test]
    fn area_extra_patterns_merge_into_the_dictionary() {
        let toml = r#"
            [areas."frontend/components".extra_patterns]
            hooks = ["hook", "useeffect"]
            testing = ["playwright"]
        "#;
        let config = RefreshConfig::from_toml(toml).unwrap();
        let themes = config.themes_for_area("frontend/components");
        assert_eq!(themes["hooks"], vec!["hook", "useeffect"]);
        assert!(themes["testing"].contains(&"playwright".to_string()));
        // other areas see the global dictionary untouched
        assert!(!config.themes_for_area("backend/api").contains_key("hooks"));
    }

    #[test]
    fn window_rejects_empty_or_absolute_areas() {
        let config = RefreshConfig::default();
        assert!(AnalysisWindow::new("", Depth::Standard, &config).is_err());
        assert!(AnalysisWindow::new("/etc", Depth::Standard, &config).is_err());
        let window = AnalysisWindow::new("frontend/components/", Depth::Quick, &config).unwrap();
        assert_eq!(window.area, "frontend/components");
        assert_eq!(window.lookback_days, 30);
    }
}
