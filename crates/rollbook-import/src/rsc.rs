//! RSC source: recover the report payload from a server-component blob.
//!
//! The portal ships report data inside a `text/x-component` response that
//! is not JSON as a whole. The `"members"` and `"columns"` arrays inside it
//! are, though, so a balanced-bracket scan finds each array's extent and
//! hands the slice to the JSON parser. The scan honors both quote kinds and
//! backslash escapes so brackets inside strings do not unbalance it.

use serde_json::Value;

use crate::ImportError;
use crate::report::{ReportPayload, column_keys, rows_from_members};

/// Extract the report payload from RSC text.
///
/// `members` is required; `columns` is optional and defaults to empty.
pub fn extract_report_from_rsc(text: &str) -> Result<ReportPayload, ImportError> {
    let members = extract_array(text, "members").ok_or(ImportError::RscMembersMissing)?;
    let columns = extract_array(text, "columns").unwrap_or_default();
    Ok(ReportPayload {
        columns: column_keys(&columns),
        rows: rows_from_members(&members),
    })
}

/// Find `"key"`, then the next `[`, then scan to its balanced close and
/// parse the slice. Any failure (no key, no bracket, unbalanced, bad
/// JSON, non-array) yields `None`.
fn extract_array(text: &str, key: &str) -> Option<Vec<Value>> {
    let key_str = format!("\"{key}\"");
    let key_index = text.find(&key_str)?;
    let start = key_index + text[key_index..].find('[')?;

    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut i = start + 1;
    let mut in_string = false;
    let mut escape = false;
    let mut quote = 0u8;
    while i < bytes.len() && depth > 0 {
        let c = bytes[i];
        if escape {
            escape = false;
            i += 1;
            continue;
        }
        if in_string {
            if c == b'\\' {
                escape = true;
            } else if c == quote {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            b'"' | b'\'' => {
                in_string = true;
                quote = c;
            }
            b'[' => depth += 1,
            b']' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    if depth != 0 {
        return None;
    }

    match serde_json::from_str::<Value>(&text[start..i]) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::normalize_rows;

    #[test]
    fn extracts_members_from_surrounding_noise() {
        let text = concat!(
            "1:[\"$\",\"div\",null,{\"data\":{",
            "\"columns\":[{\"key\":\"Preferred Name\"},{\"key\":\"Age\"}],",
            "\"members\":[{\"Preferred Name\":\"Smith, Jane\",\"Age\":\"34\"}]",
            "}}]\n2:trailing chunk"
        );
        let payload = extract_report_from_rsc(text).expect("payload should extract");
        assert_eq!(payload.columns, vec!["Preferred Name", "Age"]);
        assert_eq!(payload.rows.len(), 1);

        let normalized = normalize_rows(&payload.rows);
        assert_eq!(normalized.rows[0].preferred_name, "Smith, Jane");
    }

    #[test]
    fn brackets_inside_strings_do_not_unbalance() {
        let text = r#"noise "members":[{"Preferred Name":"Smith [Jay], Jane","Age":"34"}] more"#;
        let payload = extract_report_from_rsc(text).expect("payload should extract");
        assert_eq!(payload.rows[0]["Preferred Name"], "Smith [Jay], Jane");
    }

    #[test]
    fn escaped_quotes_inside_strings_are_honored() {
        let text = r#""members":[{"Preferred Name":"Smith \"JJ\" John","Age":"4"}]"#;
        let payload = extract_report_from_rsc(text).expect("payload should extract");
        assert_eq!(payload.rows[0]["Preferred Name"], r#"Smith "JJ" John"#);
    }

    #[test]
    fn nested_arrays_stay_balanced() {
        let text = r#""members":[{"Preferred Name":"A","tags":["x","y"]}] trailing"#;
        let payload = extract_report_from_rsc(text).expect("payload should extract");
        assert_eq!(payload.rows.len(), 1);
    }

    #[test]
    fn unbalanced_payload_is_rejected() {
        let text = r#""members":[{"Preferred Name":"A""#;
        let err = extract_report_from_rsc(text).expect_err("must error");
        assert!(matches!(err, ImportError::RscMembersMissing));
    }

    #[test]
    fn missing_members_key_is_rejected() {
        let err = extract_report_from_rsc("no payload here").expect_err("must error");
        assert!(matches!(err, ImportError::RscMembersMissing));
    }

    #[test]
    fn missing_columns_default_to_empty() {
        let text = r#""members":[{"Preferred Name":"A"}]"#;
        let payload = extract_report_from_rsc(text).expect("payload should extract");
        assert!(payload.columns.is_empty());
    }
}
