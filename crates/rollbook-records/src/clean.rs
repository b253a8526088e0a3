//! Value cleaning shared by record construction and import.
//!
//! LCR exports are messy: numeric cells carry stray suffixes, callings
//! arrive wrapped in report markup, phone numbers mix punctuation styles.
//! These helpers normalize those values the same way everywhere.

const CALLING_SPAN_OPEN: &str = "<span class=\"custom-report-position\">";
const CALLING_SPAN_CLOSE: &str = "</span>";

/// Parse the leading integer of a string, tolerating trailing junk.
///
/// `"34"` and `"34 years"` both parse to 34; a string with no leading
/// digits parses to `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|n| sign * n)
}

/// Parse an age cell. Valid ages are 0..=120; anything else is `None`.
pub fn parse_age(raw: &str) -> Option<u8> {
    parse_int_prefix(raw)
        .filter(|age| (0..=120).contains(age))
        .map(|age| age as u8)
}

/// Parse a birth-day cell. Valid days are 1..=31; anything else is `None`.
pub fn parse_birth_day(raw: &str) -> Option<u32> {
    parse_int_prefix(raw)
        .filter(|day| (1..=31).contains(day))
        .map(|day| day as u32)
}

/// Parse a birth-year cell. Valid years are 1900..=`current_year`.
pub fn parse_birth_year(raw: &str, current_year: i32) -> Option<i32> {
    parse_int_prefix(raw)
        .filter(|year| (1900..=current_year as i64).contains(year))
        .map(|year| year as i32)
}

/// Split a callings cell into individual callings.
///
/// LCR renders multiple callings as adjacent
/// `<span class="custom-report-position">…</span>` fragments. Splitting on
/// the opening tag before stripping markup keeps each calling separate; a
/// plain unmarked cell comes through as a single calling.
pub fn split_callings(raw: &str) -> Vec<String> {
    raw.split(CALLING_SPAN_OPEN)
        .map(|piece| piece.replace(CALLING_SPAN_CLOSE, ""))
        .map(|piece| piece.trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Keep only ASCII digits, for phone matching and sms links.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_prefix_tolerates_trailing_text() {
        assert_eq!(parse_int_prefix("34"), Some(34));
        assert_eq!(parse_int_prefix("  34 years"), Some(34));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("years 34"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn age_outside_range_is_none() {
        assert_eq!(parse_age("0"), Some(0));
        assert_eq!(parse_age("120"), Some(120));
        assert_eq!(parse_age("121"), None);
        assert_eq!(parse_age("-1"), None);
        assert_eq!(parse_age("unknown"), None);
    }

    #[test]
    fn birth_day_and_year_respect_ranges() {
        assert_eq!(parse_birth_day("31"), Some(31));
        assert_eq!(parse_birth_day("32"), None);
        assert_eq!(parse_birth_day("0"), None);
        assert_eq!(parse_birth_year("1900", 2025), Some(1900));
        assert_eq!(parse_birth_year("2026", 2025), None);
        assert_eq!(parse_birth_year("1899", 2025), None);
    }

    #[test]
    fn callings_split_on_span_markup() {
        let raw = "<span class=\"custom-report-position\">Primary Teacher</span>\
                   <span class=\"custom-report-position\">Ward Missionary</span>";
        assert_eq!(
            split_callings(raw),
            vec!["Primary Teacher".to_string(), "Ward Missionary".to_string()]
        );
    }

    #[test]
    fn callings_plain_cell_is_single_calling() {
        assert_eq!(split_callings("Ward Clerk"), vec!["Ward Clerk".to_string()]);
        assert!(split_callings("").is_empty());
        assert!(split_callings("   ").is_empty());
    }

    #[test]
    fn digits_only_strips_punctuation() {
        assert_eq!(digits_only("(555) 123-4567"), "5551234567");
        assert_eq!(digits_only("+1 555.123.4567"), "15551234567");
        assert_eq!(digits_only("none"), "");
    }
}
