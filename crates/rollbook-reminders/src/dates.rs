//! Date parsing and name helpers for the reminders pass.
//!
//! Roster dates arrive as display strings from the import, so matching is
//! best-effort: a date that fits none of the known shapes never matches.

use chrono::{Datelike, NaiveDate};

/// Date shapes seen in imported rosters, tried in order.
const DATE_FORMATS: [&str; 4] = ["%d %b %Y", "%d %B %Y", "%Y-%m-%d", "%m/%d/%Y"];

/// Parse a roster date string such as `5 Mar 1987`, `12 March 1987`,
/// `1987-03-05` or `3/5/1987`.
pub fn parse_roster_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// True when the stored date lands on the same month and day as `on`.
pub fn matches_month_day(raw: &str, on: NaiveDate) -> bool {
    parse_roster_date(raw)
        .is_some_and(|date| date.month() == on.month() && date.day() == on.day())
}

/// First name for a greeting: `"Wademan, Jennifer"` gives `Jennifer`,
/// `"John Smith"` gives `John`.
pub fn first_name(preferred_name: &str) -> String {
    let trimmed = preferred_name.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.contains(',') {
        // The piece between the first and second comma, so suffixes like
        // ", Jr" stay out of the greeting.
        if let Some(after_comma) = trimmed.split(',').nth(1) {
            let after_comma = after_comma.trim();
            if !after_comma.is_empty() {
                return after_comma.to_string();
            }
        }
    }
    trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_roster_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(1987, 3, 5).expect("date should build");
        assert_eq!(parse_roster_date("5 Mar 1987"), Some(expected));
        assert_eq!(parse_roster_date("05 Mar 1987"), Some(expected));
        assert_eq!(parse_roster_date("5 March 1987"), Some(expected));
        assert_eq!(parse_roster_date("1987-03-05"), Some(expected));
        assert_eq!(parse_roster_date("3/5/1987"), Some(expected));
        assert_eq!(parse_roster_date("sometime in spring"), None);
        assert_eq!(parse_roster_date(""), None);
    }

    #[test]
    fn month_day_match_ignores_year() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 5).expect("date should build");
        assert!(matches_month_day("5 Mar 1987", today));
        assert!(matches_month_day("1950-03-05", today));
        assert!(!matches_month_day("6 Mar 1987", today));
        assert!(!matches_month_day("not a date", today));
    }

    #[test]
    fn first_name_prefers_token_after_comma() {
        assert_eq!(first_name("Wademan, Jennifer"), "Jennifer");
        assert_eq!(first_name("Lee, Ada, Jr"), "Ada");
        assert_eq!(first_name("John Smith"), "John");
        assert_eq!(first_name("  Cher  "), "Cher");
        assert_eq!(first_name("Lee,"), "Lee,");
        assert_eq!(first_name(""), "");
    }
}
