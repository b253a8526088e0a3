//! Import preview summary: what a batch of rows holds before it lands.

use rollbook_records::clean::parse_age;
use rollbook_records::member::Gender;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::rows::ImportRow;

/// Headline counts over a batch of import rows.
///
/// Age groups: children under 18, youth 18 to 29, adults 30 and up.
/// Rows with unparseable ages count as age 0, i.e. children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total_records: usize,
    pub households: usize,
    pub children: usize,
    pub youth: usize,
    pub adults: usize,
    pub male: usize,
    pub female: usize,
}

pub fn summarize_rows(rows: &[ImportRow]) -> ImportSummary {
    let households: BTreeSet<&str> = rows.iter().map(|row| row.head_of_house.as_str()).collect();

    let mut summary = ImportSummary {
        total_records: rows.len(),
        households: households.len(),
        children: 0,
        youth: 0,
        adults: 0,
        male: 0,
        female: 0,
    };

    for row in rows {
        let age = parse_age(&row.age).unwrap_or(0);
        if age < 18 {
            summary.children += 1;
        } else if age < 30 {
            summary.youth += 1;
        } else {
            summary.adults += 1;
        }
        match Gender::parse(row.gender.trim()) {
            Some(Gender::M) => summary.male += 1,
            Some(Gender::F) => summary.female += 1,
            None => {}
        }
    }

    summary
}
