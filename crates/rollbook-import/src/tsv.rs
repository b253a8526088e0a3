//! TSV source: clipboard pastes and scraped report exports.
//!
//! First line is the header row. Headers may be canonical keys (a
//! re-import of our own export) or raw LCR labels (pasted straight off
//! the portal table); both canonicalize to the same columns.

use rollbook_records::member::Member;
use std::collections::BTreeMap;

use crate::ImportError;
use crate::headers::{REQUIRED_KEYS, canonical_import_key};

/// Canonical column order for TSV export.
pub const EXPORT_COLUMNS: [&str; 17] = [
    "PREFERRED_NAME",
    "HEAD_OF_HOUSE",
    "ADDRESS_STREET_1",
    "AGE",
    "BAPTISM_DATE",
    "BIRTH_DATE",
    "CALLINGS",
    "BIRTH_DAY",
    "BIRTH_MONTH",
    "BIRTH_YEAR",
    "BIRTHPLACE",
    "GENDER",
    "INDIVIDUAL_PHONE",
    "INDIVIDUAL_EMAIL",
    "MARRIAGE_DATE",
    "PRIESTHOOD_OFFICE",
    "TEMPLE_RECOMMEND_EXPIRATION_DATE",
];

/// A parsed TSV table: raw headers, raw trimmed cells, skip warnings.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<BTreeMap<String, String>>,
    pub warnings: Vec<String>,
}

/// Parse TSV text into raw rows keyed by their (raw) headers.
///
/// Rows whose cell count does not match the header are skipped with a
/// warning, counting the header as line 1.
pub fn parse_tsv(text: &str) -> Result<RawTable, ImportError> {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    if lines.len() < 2 {
        return Err(ImportError::InvalidFormat(
            "need at least a header and one data row".to_string(),
        ));
    }

    let headers: Vec<String> = lines[0].split('\t').map(|h| h.trim().to_string()).collect();
    let canonical: Vec<String> = headers
        .iter()
        .map(|header| canonical_import_key(header))
        .collect();
    for required in REQUIRED_KEYS {
        if !canonical.iter().any(|key| key == required) {
            return Err(ImportError::MissingHeader(required.to_string()));
        }
    }

    let mut rows = Vec::new();
    let mut warnings = Vec::new();
    for (line_index, line) in lines.iter().enumerate().skip(1) {
        let values: Vec<&str> = line.split('\t').collect();
        if values.len() != headers.len() {
            warnings.push(format!(
                "row {} has {} values but expected {}, skipping",
                line_index + 1,
                values.len(),
                headers.len()
            ));
            continue;
        }
        let mut row = BTreeMap::new();
        for (header, value) in headers.iter().zip(values.iter()) {
            row.insert(header.clone(), value.trim().to_string());
        }
        rows.push(row);
    }

    Ok(RawTable {
        headers,
        rows,
        warnings,
    })
}

/// Export members as TSV in the canonical column order.
///
/// Callings are re-wrapped in the report markup spans so an export pastes
/// back through the importer without losing the list structure.
pub fn export_tsv<'a>(members: impl Iterator<Item = &'a Member>) -> String {
    let mut lines = vec![EXPORT_COLUMNS.join("\t")];
    for member in members {
        let cells = [
            member.preferred_name.clone(),
            member.head_of_house.clone(),
            member.address_street_1.clone(),
            member.age.to_string(),
            member.baptism_date.clone().unwrap_or_default(),
            member.birth_date.clone().unwrap_or_default(),
            callings_cell(&member.callings),
            member.birth_day.map(|d| d.to_string()).unwrap_or_default(),
            member.birth_month.clone().unwrap_or_default(),
            member.birth_year.map(|y| y.to_string()).unwrap_or_default(),
            member.birthplace.clone().unwrap_or_default(),
            member.gender.as_str().to_string(),
            member.individual_phone.clone().unwrap_or_default(),
            member.individual_email.clone().unwrap_or_default(),
            member.marriage_date.clone().unwrap_or_default(),
            member.priesthood_office.clone().unwrap_or_default(),
            member
                .temple_recommend_expiration_date
                .clone()
                .unwrap_or_default(),
        ];
        lines.push(cells.join("\t"));
    }
    lines.join("\n")
}

fn callings_cell(callings: &[String]) -> String {
    callings
        .iter()
        .map(|calling| format!("<span class=\"custom-report-position\">{calling}</span>"))
        .collect()
}
