// theme classification - buckets raw records by keyword dictionary

use std::collections::BTreeMap;

use crate::collect::RawRecord;
use crate::utils::clean_excerpt;

/// sampled matches kept per theme for quoting in the rendered output
pub const MAX_EXAMPLES_PER_THEME: usize = 5;

/// aggregated matches for one theme across the whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeMatch {
    pub name: String,
    pub count: usize,
    /// first few matching texts in input order, cleaned for display
    pub examples: Vec<String>,
}

/// classify records against the theme dictionary
///
/// every configured theme appears in the result, zero-count when nothing
/// matched; a record matches a theme when any keyword occurs as a
/// case-insensitive substring, and may match several themes at once
pub fn classify(
    records: &[RawRecord],
    themes: &BTreeMap<String, Vec<String>>,
) -> BTreeMap<String, ThemeMatch> {
    let lowered: Vec<(&String, Vec<String>)> = themes
        .iter()
        .map(|(name, keywords)| {
            (name, keywords.iter().map(|kw| kw.to_lowercase()).collect())
        })
        .collect();

    let mut matches: BTreeMap<String, ThemeMatch> = themes
        .keys()
        .map(|name| {
            (
                name.clone(),
                ThemeMatch {
                    name: name.clone(),
                    count: 0,
                    examples: Vec::new(),
                },
            )
        })
        .collect();

    for record in records {
        let text = record.text.to_lowercase();
        for (name, keywords) in &lowered {
            if keywords.iter().any(|kw| text.contains(kw.as_str())) {
                if let Some(theme) = matches.get_mut(name.as_str()) {
                    theme.count += 1;
                    if theme.examples.len() < MAX_EXAMPLES_PER_THEME {
                        theme.examples.push(clean_excerpt(&record.text));
                    }
                }
            }
        }
    }

    matches
}

/// themes at or above the frequency threshold, ranked by count descending
/// with ties broken by name for reproducible output
pub fn qualifying(
    matches: &BTreeMap<String, ThemeMatch>,
    min_pattern_frequency: usize,
) -> Vec<&ThemeMatch> {
    let mut ranked: Vec<&ThemeMatch> = matches
        .values()
        .filter(|theme| theme.count >= min_pattern_frequency)
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::{RawRecord, RecordSource};

    fn dictionary(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(name, keywords)| {
                (
                    name.to_string(),
                    keywords.iter().map(|kw| kw.to_string()).collect(),
                )
            })
            .collect()
    }

    fn commit(text: &str) -> RawRecord {
        RawRecord::new(RecordSource::Commit, text)
    }

    #[test]
    fn empty_input_yields_every_theme_with_zero_count() {
        let themes = dictionary(&[("testing", &["test"]), ("naming", &["rename"])]);
        let matches = classify(&[], &themes);
        assert_eq!(matches.len(), 2);
        for theme in matches.values() {
            assert_eq!(theme.count, 0);
            assert!(theme.examples.is_empty());
        }
    }

    #[test]
    fn keyword_matching_is_case_insensitive_both_ways() {
        let themes = dictionary(&[("type_safety", &["PROP"])]);
        let records = vec![commit("Fix prop Types in the form")];
        let matches = classify(&records, &themes);
        assert_eq!(matches["type_safety"].count, 1);
    }

    #[test]
    fn a_record_may_match_several_themes() {
        let themes = dictionary(&[("testing", &["test"]), ("performance", &["slow"])]);
        let records = vec![commit("add test for the slow path")];
        let matches = classify(&records, &themes);
        assert_eq!(matches["testing"].count, 1);
        assert_eq!(matches["performance"].count, 1);
    }

    #[test]
    fn examples_are_a_stable_prefix_of_the_matches() {
        let themes = dictionary(&[("testing", &["test"])]);
        let records: Vec<RawRecord> = (0..8)
            .map(|i| commit(&format!("test change {i}")))
            .collect();
        let matches = classify(&records, &themes);
        assert_eq!(matches["testing"].count, 8);
        assert_eq!(matches["testing"].examples.len(), MAX_EXAMPLES_PER_THEME);
        assert_eq!(matches["testing"].examples[0], "test change 0");
        assert_eq!(matches["testing"].examples[4], "test change 4");
    }

    #[test]
    fn frequency_scenario_from_three_commits() {
        let themes = dictionary(&[("testing", &["test"]), ("type_safety", &["type", "prop"])]);
        let records = vec![
            commit("refactor to hooks"),
            commit("add unit test"),
            commit("fix prop types"),
        ];
        let matches = classify(&records, &themes);
        assert_eq!(matches["testing"].count, 1);
        assert_eq!(matches["type_safety"].count, 1);

        let ranked = qualifying(&matches, 1);
        let names: Vec<&str> = ranked.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["testing", "type_safety"]);
    }

    #[test]
    fn qualifying_filters_below_threshold_and_ranks_by_count() {
        let themes = dictionary(&[
            ("testing", &["test"]),
            ("naming", &["rename"]),
            ("performance", &["slow"]),
        ]);
        let records = vec![
            commit("test one"),
            commit("test two"),
            commit("rename the helper"),
        ];
        let matches = classify(&records, &themes);
        let ranked = qualifying(&matches, 1);
        let names: Vec<&str> = ranked.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["testing", "naming"]);
    }
}
