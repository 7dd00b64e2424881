//! String helpers shared by column resolution and field conversion.

use std::borrow::Cow;

use regex::Regex;

/// Folds a column name into its canonical, case-insensitive form.
///
/// Uses Unicode's locale-independent lowercase mapping, so `"TIME"` folds to
/// `"time"` on every host regardless of the process locale. Dotted capital I
/// (`'İ'`) folds to `"i\u{307}"`, never to a bare `'i'`.
pub fn fold_case(value: &str) -> Cow<'_, str> {
    if value.chars().all(|c| c.to_lowercase().eq([c])) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(value.to_lowercase())
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns `value` when it holds something other than whitespace.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !is_blank(v))
}

/// Extracts the first capture group of `regex` from `value`, or the whole
/// match when the pattern has no groups.
pub fn match_pattern<'a>(value: &'a str, regex: &Regex) -> Option<&'a str> {
    let captures = regex.captures(value)?;
    captures
        .get(1)
        .or_else(|| captures.get(0))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_case_borrows_lowercase_input() {
        assert!(matches!(fold_case("latitude"), Cow::Borrowed(_)));
        assert_eq!(fold_case("LaTiTuDe"), "latitude");
    }

    #[test]
    fn fold_case_is_locale_independent_for_dotted_and_dotless_i() {
        assert_eq!(fold_case("TIME"), "time");
        assert_eq!(fold_case("İ"), "i\u{307}");
        assert_eq!(fold_case("ı"), "ı");
        assert_ne!(fold_case("TIME"), fold_case("TİME"));
    }

    #[test]
    fn match_pattern_prefers_first_group() {
        let grouped = Regex::new(r"log_(\d{8})").unwrap();
        assert_eq!(match_pattern("log_20240102.csv", &grouped), Some("20240102"));

        let plain = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
        assert_eq!(match_pattern("run 2024-01-02 a", &plain), Some("2024-01-02"));
        assert_eq!(match_pattern("nothing here", &plain), None);
    }

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("Latitude")), Some("Latitude"));
    }
}
