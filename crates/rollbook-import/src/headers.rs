//! LCR header normalization.
//!
//! The portal renders header cells doubled (`"AgeAge"`), glues headers onto
//! the front of data cells, and labels columns inconsistently between
//! report variants. Everything downstream works on canonical
//! SCREAMING_SNAKE keys, so all of that is repaired here.

use regex::Regex;
use std::sync::OnceLock;

/// Columns an import source must provide (after canonicalization).
pub const REQUIRED_KEYS: [&str; 2] = ["PREFERRED_NAME", "HEAD_OF_HOUSE"];

/// Repair doubled header text: `"Preferred NamePreferred Name"` becomes
/// `"Preferred Name"`. Text that is not an exact doubling is only trimmed.
pub fn undouble_header_text(text: &str) -> String {
    let trimmed = text.trim();
    let half = trimmed.len() / 2;
    if half > 0
        && trimmed.is_char_boundary(half)
        && trimmed[..half] == trimmed[half..]
    {
        return trimmed[..half].trim().to_string();
    }
    trimmed.to_string()
}

/// Map a scraped header to its canonical import key.
///
/// Known label variants map explicitly; unknown labels fall back to a
/// mechanical rewrite (whitespace runs to `_`, parens stripped, uppercased).
pub fn canonical_import_key(raw_key: &str) -> String {
    let single = undouble_header_text(raw_key);
    let label = single.to_lowercase();
    if let Some(mapped) = mapped_label(&label) {
        return mapped.to_string();
    }
    let mechanical = mechanical_key(&single);
    if !mechanical.is_empty() {
        return mechanical;
    }
    raw_key
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

fn mapped_label(label: &str) -> Option<&'static str> {
    Some(match label {
        "preferred name" | "preferredname" | "name" | "member name" => "PREFERRED_NAME",
        "head of house" | "headofhouse" | "head of household" => "HEAD_OF_HOUSE",
        "address street 1" | "address - street 1" | "address" | "street address" => {
            "ADDRESS_STREET_1"
        }
        "age" => "AGE",
        "gender" => "GENDER",
        "birth date" | "birth date (1 jan 1990)" | "birthdate" => "BIRTH_DATE",
        "birth day" | "birth day (1)" | "birthday" => "BIRTH_DAY",
        "birth month" | "birth month (jan)" | "birthmonth" => "BIRTH_MONTH",
        "birth year" | "birthyear" => "BIRTH_YEAR",
        "baptism date" | "baptismdate" => "BAPTISM_DATE",
        "callings" => "CALLINGS",
        "birthplace" | "birth place" => "BIRTHPLACE",
        "individual phone" | "phone" => "INDIVIDUAL_PHONE",
        "individual email" | "individual e-mail" | "email" => "INDIVIDUAL_EMAIL",
        "marriage date" | "marriagedate" => "MARRIAGE_DATE",
        "priesthood office" | "priesthood" => "PRIESTHOOD_OFFICE",
        "temple recommend expiration date" | "temple recommend" | "recommend expiration" => {
            "TEMPLE_RECOMMEND_EXPIRATION_DATE"
        }
        _ => return None,
    })
}

fn mechanical_key(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace(['(', ')'], "")
        .to_uppercase()
}

/// Strip a column header glued onto the front of a cell value.
///
/// The DOM concatenates headers with data in some report variants, e.g.
/// `"Preferred NameAsiata, Nicholas"`. The undoubled header is stripped
/// first, then the full raw (possibly doubled) header.
pub fn strip_header_from_value(value: &str, header_key: &str) -> String {
    let mut v = value.trim();
    if header_key.is_empty() {
        return v.to_string();
    }
    let single = undouble_header_text(header_key);
    if !single.is_empty()
        && let Some(rest) = v.strip_prefix(single.as_str())
    {
        v = rest.trim();
    }
    if let Some(rest) = v.strip_prefix(header_key) {
        v = rest.trim();
    }
    v.to_string()
}

/// Clean one cell: strip the glued header, then normalize AGE/GENDER cells.
///
/// `"Age 14"` becomes `"14"`; `"GenderFemale"` becomes `"F"`. A gender
/// whose first letter is not M/F passes through for validation to flag.
pub fn clean_cell_value(key: &str, value: &str, header_key: &str) -> String {
    let v = strip_header_from_value(value, header_key);
    if key == "AGE" {
        return age_prefix_re().replace(&v, "").trim().to_string();
    }
    if key == "GENDER" {
        let after = gender_prefix_re().replace(&v, "").trim().to_string();
        return match after.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('M') => "M".to_string(),
            Some('F') => "F".to_string(),
            _ => after,
        };
    }
    v
}

fn age_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^Age\s*").expect("age prefix regex must compile"))
}

fn gender_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^Gender\s*").expect("gender prefix regex must compile"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undouble_repairs_exact_doubling() {
        assert_eq!(undouble_header_text("AgeAge"), "Age");
        assert_eq!(
            undouble_header_text("Preferred NamePreferred Name"),
            "Preferred Name"
        );
        assert_eq!(undouble_header_text("  Birth DateBirth Date  "), "Birth Date");
    }

    #[test]
    fn undouble_leaves_plain_text_alone() {
        assert_eq!(undouble_header_text("Age"), "Age");
        assert_eq!(undouble_header_text("AgeAges"), "AgeAges");
        assert_eq!(undouble_header_text(""), "");
    }

    #[test]
    fn undouble_is_char_boundary_safe() {
        // Byte midpoint falls inside the euro sign; no doubling detected.
        assert_eq!(undouble_header_text("a€"), "a€");
        assert_eq!(undouble_header_text("€€"), "€");
    }

    #[test]
    fn known_labels_map_to_canonical_keys() {
        assert_eq!(canonical_import_key("Preferred Name"), "PREFERRED_NAME");
        assert_eq!(canonical_import_key("head of household"), "HEAD_OF_HOUSE");
        assert_eq!(canonical_import_key("Birth Date (1 Jan 1990)"), "BIRTH_DATE");
        assert_eq!(
            canonical_import_key("Temple Recommend"),
            "TEMPLE_RECOMMEND_EXPIRATION_DATE"
        );
        assert_eq!(canonical_import_key("AgeAge"), "AGE");
    }

    #[test]
    fn unknown_labels_fall_back_mechanically() {
        assert_eq!(canonical_import_key("Ward Unit (Id)"), "WARD_UNIT_ID");
        assert_eq!(canonical_import_key("PREFERRED_NAME"), "PREFERRED_NAME");
        assert_eq!(canonical_import_key("custom   field"), "CUSTOM_FIELD");
    }

    #[test]
    fn strip_header_handles_single_and_doubled_forms() {
        assert_eq!(
            strip_header_from_value(
                "Preferred NameAsiata, Nicholas",
                "Preferred NamePreferred Name"
            ),
            "Asiata, Nicholas"
        );
        assert_eq!(strip_header_from_value("Age19", "Age"), "19");
        assert_eq!(strip_header_from_value("plain value", "Age"), "plain value");
        assert_eq!(strip_header_from_value("  padded  ", ""), "padded");
    }

    #[test]
    fn clean_cell_normalizes_age_and_gender() {
        assert_eq!(clean_cell_value("AGE", "Age 14", "Age"), "14");
        assert_eq!(clean_cell_value("AGE", "AgeAge19", "AgeAge"), "19");
        assert_eq!(clean_cell_value("GENDER", "GenderFemale", "Gender"), "F");
        assert_eq!(clean_cell_value("GENDER", "male", "Gender"), "M");
        assert_eq!(clean_cell_value("GENDER", "Gender Unknown", "Gender"), "Unknown");
        assert_eq!(
            clean_cell_value("PREFERRED_NAME", "Smith, Jane", "Preferred Name"),
            "Smith, Jane"
        );
    }
}
