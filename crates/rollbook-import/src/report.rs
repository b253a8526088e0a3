//! Saved report JSON source: the `{ columns, members }` payload shape.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::ImportError;

/// A report payload: column keys plus raw member rows.
///
/// Row keys and cells are still raw here; `normalize_rows` canonicalizes
/// them the same way it does for TSV input.
#[derive(Debug, Clone)]
pub struct ReportPayload {
    pub columns: Vec<String>,
    pub rows: Vec<BTreeMap<String, String>>,
}

/// Parse a saved report JSON document.
pub fn parse_report_json(text: &str) -> Result<ReportPayload, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    payload_from_value(&value)
}

pub(crate) fn payload_from_value(value: &Value) -> Result<ReportPayload, ImportError> {
    let mut object = value.as_object().ok_or_else(|| {
        ImportError::InvalidFormat("report payload must be a JSON object".to_string())
    })?;
    // Some saves wrap the payload one level down under `data`.
    if !object.contains_key("members")
        && let Some(inner) = object.get("data").and_then(Value::as_object)
    {
        object = inner;
    }
    let members = object
        .get("members")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ImportError::InvalidFormat("report payload missing members array".to_string())
        })?;
    let columns = object
        .get("columns")
        .and_then(Value::as_array)
        .map(|cols| column_keys(cols))
        .unwrap_or_default();
    Ok(ReportPayload {
        columns,
        rows: rows_from_members(members),
    })
}

/// Column key per entry: `key`, else `label`, else a positional `colN`.
pub(crate) fn column_keys(columns: &[Value]) -> Vec<String> {
    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let object = column.as_object();
            let key = object
                .and_then(|o| o.get("key"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty());
            let label = object
                .and_then(|o| o.get("label"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty());
            key.or(label)
                .map(str::to_string)
                .unwrap_or_else(|| format!("col{index}"))
        })
        .collect()
}

// Non-object entries become empty rows; normalization drops those as
// header echoes, matching how the row filter treats them.
pub(crate) fn rows_from_members(members: &[Value]) -> Vec<BTreeMap<String, String>> {
    members
        .iter()
        .map(|member| {
            member
                .as_object()
                .map(|object| {
                    object
                        .iter()
                        .map(|(key, value)| (key.clone(), value_to_cell(value)))
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect()
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
