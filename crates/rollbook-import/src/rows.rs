//! Row normalization: raw scraped rows into canonical import rows.

use chrono::{DateTime, Utc};
use rollbook_records::clean::{parse_age, parse_birth_day, parse_birth_year, split_callings};
use rollbook_records::member::{Gender, Member};
use std::collections::BTreeMap;

use crate::headers::{canonical_import_key, clean_cell_value};

/// One import row with canonical keys and cleaned string cells.
///
/// Cells stay strings here; typed parsing happens when the row becomes a
/// `Member`, so validation can still report the original cell text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRow {
    pub preferred_name: String,
    pub head_of_house: String,
    pub address_street_1: String,
    pub age: String,
    pub gender: String,
    pub birth_date: String,
    pub birth_day: String,
    pub birth_month: String,
    pub birth_year: String,
    pub birthplace: String,
    pub baptism_date: String,
    pub callings: String,
    pub individual_phone: String,
    pub individual_email: String,
    pub marriage_date: String,
    pub priesthood_office: String,
    pub temple_recommend_expiration_date: String,
}

impl ImportRow {
    /// Pick the known canonical keys out of a normalized cell map.
    /// Unknown keys are ignored.
    pub fn from_map(cells: &BTreeMap<String, String>) -> Self {
        let cell = |key: &str| cells.get(key).cloned().unwrap_or_default();
        Self {
            preferred_name: cell("PREFERRED_NAME"),
            head_of_house: cell("HEAD_OF_HOUSE"),
            address_street_1: cell("ADDRESS_STREET_1"),
            age: cell("AGE"),
            gender: cell("GENDER"),
            birth_date: cell("BIRTH_DATE"),
            birth_day: cell("BIRTH_DAY"),
            birth_month: cell("BIRTH_MONTH"),
            birth_year: cell("BIRTH_YEAR"),
            birthplace: cell("BIRTHPLACE"),
            baptism_date: cell("BAPTISM_DATE"),
            callings: cell("CALLINGS"),
            individual_phone: cell("INDIVIDUAL_PHONE"),
            individual_email: cell("INDIVIDUAL_EMAIL"),
            marriage_date: cell("MARRIAGE_DATE"),
            priesthood_office: cell("PRIESTHOOD_OFFICE"),
            temple_recommend_expiration_date: cell("TEMPLE_RECOMMEND_EXPIRATION_DATE"),
        }
    }

    /// The dedup key, matching `Member::identity_key`.
    pub fn identity_key(&self) -> String {
        format!("{}|{}", self.preferred_name, self.head_of_house)
    }

    /// Convert to a member record. Invalid numeric cells fall back to
    /// defaults (age 0, gender M, birth day/year dropped); empty optional
    /// cells become `None`.
    pub fn to_member(
        &self,
        id: impl Into<String>,
        now: DateTime<Utc>,
        current_year: i32,
    ) -> Member {
        Member {
            id: id.into(),
            preferred_name: self.preferred_name.clone(),
            head_of_house: self.head_of_house.clone(),
            address_street_1: self.address_street_1.clone(),
            individual_phone: opt_cell(&self.individual_phone),
            individual_email: opt_cell(&self.individual_email),
            age: parse_age(&self.age).unwrap_or(0),
            gender: Gender::parse(self.gender.trim()).unwrap_or(Gender::M),
            birth_date: opt_cell(&self.birth_date),
            birth_day: parse_birth_day(&self.birth_day),
            birth_month: opt_cell(&self.birth_month),
            birth_year: parse_birth_year(&self.birth_year, current_year),
            birthplace: opt_cell(&self.birthplace),
            baptism_date: opt_cell(&self.baptism_date),
            callings: split_callings(&self.callings),
            marriage_date: opt_cell(&self.marriage_date),
            priesthood_office: opt_cell(&self.priesthood_office),
            temple_recommend_expiration_date: opt_cell(&self.temple_recommend_expiration_date),
            created_at: now,
            updated_at: now,
        }
    }
}

fn opt_cell(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Outcome of normalizing raw rows.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRows {
    pub rows: Vec<ImportRow>,
    pub dropped_header_echoes: usize,
    pub dropped_missing_name: usize,
}

/// Normalize raw rows: drop header-echo rows, canonicalize keys, clean
/// cells, apply the head-of-house fallback, drop rows with no name.
pub fn normalize_rows(raw_rows: &[BTreeMap<String, String>]) -> NormalizedRows {
    let mut normalized = NormalizedRows::default();
    for raw in raw_rows {
        if is_header_echo(raw) {
            normalized.dropped_header_echoes += 1;
            continue;
        }

        let mut cells = BTreeMap::new();
        for (raw_key, raw_value) in raw {
            let key = canonical_import_key(raw_key);
            let value = clean_cell_value(&key, raw_value, raw_key);
            cells.insert(key, value);
        }
        apply_head_of_house_fallback(&mut cells);

        let row = ImportRow::from_map(&cells);
        if row.preferred_name.trim().is_empty() {
            normalized.dropped_missing_name += 1;
            continue;
        }
        normalized.rows.push(row);
    }
    normalized
}

// A row whose every cell repeats its own column key is the table header
// leaking into the data. An empty row counts too.
fn is_header_echo(raw: &BTreeMap<String, String>) -> bool {
    raw.iter().all(|(key, value)| value.trim() == key.trim())
}

// Some LCR rows have no head of house; grouping needs one, so fall back
// to the member's own name, then to "Unknown".
fn apply_head_of_house_fallback(cells: &mut BTreeMap<String, String>) {
    let missing = cells
        .get("HEAD_OF_HOUSE")
        .is_none_or(|head| head.trim().is_empty());
    if missing {
        let fallback = match cells.get("PREFERRED_NAME") {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => "Unknown".to_string(),
        };
        cells.insert("HEAD_OF_HOUSE".to_string(), fallback);
    }
}
