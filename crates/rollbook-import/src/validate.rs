//! Pre-import validation: per-row problems with 1-based row numbers.

use rollbook_records::clean::parse_age;
use rollbook_records::member::Gender;

use crate::rows::ImportRow;

/// Validate normalized rows. Returns human-readable problems; an empty
/// vec means clean. Import still proceeds past these (invalid cells fall
/// back to defaults), so callers surface them rather than abort on them.
pub fn validate_rows(rows: &[ImportRow]) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let row_no = index + 1;
        if row.preferred_name.trim().is_empty() {
            errors.push(format!("Row {row_no}: Missing preferred name"));
        }
        let age_cell = row.age.trim();
        if !age_cell.is_empty() && parse_age(age_cell).is_none() {
            errors.push(format!("Row {row_no}: Invalid age: {}", row.age));
        }
        let gender_cell = row.gender.trim();
        if !gender_cell.is_empty() && Gender::parse(gender_cell).is_none() {
            errors.push(format!("Row {row_no}: Invalid gender: {}", row.gender));
        }
    }
    errors
}
