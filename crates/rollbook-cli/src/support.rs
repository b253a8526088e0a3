use chrono::{Local, NaiveDate};
use rollbook_records::{DATA_DIR_NAME, DataDir, Record, RecordStore, month_key, mutate_records_jsonl};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::Path;

pub const SAMPLE_LIMIT: usize = 25;

/// Resolve the data directory under `path`, requiring it to exist.
///
/// Every command except `init` goes through here, so a mistyped `--path`
/// fails instead of silently growing a fresh data directory.
pub fn data_dir_or_exit(path: &str) -> DataDir {
    let data_dir = DataDir::under(path);
    if !data_dir.root().is_dir() {
        eprintln!("error: no {DATA_DIR_NAME} directory under {path} (run `rollbook init` first)");
        std::process::exit(1);
    }
    data_dir
}

/// Load a collection for reading. An absent file hydrates as empty.
pub fn load_collection_or_exit<T>(path: &Path) -> RecordStore<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    if !path.exists() {
        return RecordStore::default();
    }
    RecordStore::load_jsonl(path).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", path.display());
        std::process::exit(1);
    })
}

/// Run one lock-scoped mutation against a collection, exiting on any
/// failure (lock busy, load error, or a mutation error message).
pub fn mutate_collection_or_exit<T, V, F>(path: &Path, mutator: F) -> V
where
    T: Record + Serialize + DeserializeOwned,
    F: FnOnce(&mut RecordStore<T>) -> Result<(V, bool), String>,
{
    mutate_records_jsonl(path, mutator).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Read an input argument: a file path, or `-` for stdin.
pub fn read_input_or_exit(file: &str) -> String {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).unwrap_or_else(|e| {
            eprintln!("error: failed to read stdin: {e}");
            std::process::exit(1);
        });
        return text;
    }
    fs::read_to_string(file).unwrap_or_else(|e| {
        eprintln!("error: failed to read {file}: {e}");
        std::process::exit(1);
    })
}

pub fn parse_date_or_exit(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|_| {
        eprintln!("error: invalid date: {raw} (use YYYY-MM-DD)");
        std::process::exit(1);
    })
}

/// Resolve an optional `--month` argument to a `YYYY-MM` key, defaulting
/// to the current local month.
pub fn month_arg_or_exit(month: Option<String>) -> String {
    match month {
        Some(raw) => {
            if NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").is_err() {
                eprintln!("error: invalid month: {raw} (use YYYY-MM)");
                std::process::exit(1);
            }
            raw
        }
        None => month_key(Local::now().date_naive()),
    }
}

pub fn sample_with_truncation<T>(items: Vec<T>, limit: usize) -> (Vec<T>, usize) {
    let total = items.len();
    let sample: Vec<T> = items.into_iter().take(limit).collect();
    let truncated = total.saturating_sub(sample.len());
    (sample, truncated)
}

pub fn print_sample_block(header: &str, items: &[String], truncated: usize) {
    if items.is_empty() {
        return;
    }

    println!("  {header} (showing up to {}):", items.len());
    for item in items {
        println!("    - {item}");
    }
    if truncated > 0 {
        println!("    - ... and {truncated} more");
    }
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
