/// truncate a string to a maximum length with ellipsis
pub fn truncate_with_ellipsis(text: &str, max_length: usize) -> String {
    if text.len() <= max_length {
        text.to_string()
    } else {
        // unicode-safe truncation to avoid panics on multi-byte characters
        let truncate_at = std::cmp::min(max_length.saturating_sub(3), text.len());
        let mut end_pos = truncate_at;

        while end_pos > 0 && !text.is_char_boundary(end_pos) {
            end_pos -= 1;
        }

        format!("{}...", &text[..end_pos])
    }
}

/// collapse a sampled record onto one line and cap its length for display
pub fn clean_excerpt(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_with_ellipsis(&collapsed, 200)
}

/// turn a theme key like "type_safety" into a display heading like "Type Safety"
pub fn display_theme(name: &str) -> String {
    name.split(|c| c == '_' || c == ' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_is_unicode_safe() {
        let text = "héllo wörld with ümläuts and more text than fits";
        let truncated = truncate_with_ellipsis(text, 20);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 20);
    }

    #[test]
    fn short_strings_pass_through_untouched() {
        assert_eq!(truncate_with_ellipsis("short", 20), "short");
    }

    #[test]
    fn excerpts_collapse_onto_one_line() {
        let multi = "first line\n\n  second line\tthird";
        assert_eq!(clean_excerpt(multi), "first line second line third");
    }

    #[test]
    fn theme_keys_become_title_headings() {
        assert_eq!(display_theme("type_safety"), "Type Safety");
        assert_eq!(display_theme("testing"), "Testing");
        assert_eq!(display_theme("code organization"), "Code Organization");
    }
}
