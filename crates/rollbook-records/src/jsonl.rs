//! JSONL storage: one line per record.
//!
//! The portable interchange format. Every record is a single JSON line,
//! one file per collection. The files diff cleanly under version control
//! and hydrate straight into a `RecordStore`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Read records from a JSONL reader.
pub fn read_records<T: DeserializeOwned>(reader: impl BufRead) -> Result<Vec<T>, JsonlError> {
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| JsonlError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record: T = serde_json::from_str(trimmed)
            .map_err(|e| JsonlError::Parse(line_no + 1, e.to_string()))?;
        records.push(record);
    }
    Ok(records)
}

/// Write records to a JSONL writer.
pub fn write_records<T: Serialize>(
    writer: &mut impl Write,
    records: &[T],
) -> Result<(), JsonlError> {
    for record in records {
        let line =
            serde_json::to_string(record).map_err(|e| JsonlError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| JsonlError::Io(0, e.to_string()))?;
    }
    Ok(())
}

/// Read records from a JSONL file path.
pub fn read_records_from_path<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<Vec<T>, JsonlError> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).map_err(|e| JsonlError::Io(0, format!("{}: {e}", path.display())))?;
    validate_substrate_bytes(path, &bytes)?;
    let reader = BufReader::new(bytes.as_slice());
    read_records(reader)
}

/// Write records to a JSONL file path.
///
/// The write is atomic: a temp file is written and fsynced, renamed over
/// the destination, and the parent directory fsynced. A crash mid-write
/// leaves the previous file intact.
pub fn write_records_to_path<T: Serialize>(
    path: impl AsRef<Path>,
    records: &[T],
) -> Result<(), JsonlError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| JsonlError::Io(0, format!("{parent:?}: {e}")))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), JsonlError> {
        let file = File::create(&tmp_path)
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        let mut writer = BufWriter::new(file);
        write_records(&mut writer, records)?;
        writer
            .flush()
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        let file = writer
            .into_inner()
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        file.sync_all()
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        JsonlError::Io(
            0,
            format!("{} -> {}: {e}", tmp_path.display(), path.display()),
        )
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let dir = File::open(parent)
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", parent.display())))?;
        dir.sync_all()
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", parent.display())))?;
    }

    Ok(())
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

fn validate_substrate_bytes(path: &Path, bytes: &[u8]) -> Result<(), JsonlError> {
    if bytes.contains(&0) {
        return Err(JsonlError::Corrupt(format!(
            "{}: contains NUL byte(s)",
            path.display()
        )));
    }
    if std::str::from_utf8(bytes).is_err() {
        return Err(JsonlError::Corrupt(format!(
            "{}: contains non-UTF-8 byte sequence(s)",
            path.display()
        )));
    }
    Ok(())
}

/// Errors from JSONL operations.
#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("line {0}: I/O error: {1}")]
    Io(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("corrupted substrate: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Member;
    use std::fs;

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "rollbook-jsonl-{prefix}-{}-{unique}.jsonl",
            std::process::id()
        ))
    }

    #[test]
    fn read_records_skips_blank_and_comment_lines() {
        let payload = "\n# roster snapshot\n{\"id\":\"mbr-1\",\"preferred_name\":\"Smith, Jane\"}\n\n";
        let members: Vec<Member> =
            read_records(payload.as_bytes()).expect("payload should parse");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, "mbr-1");
    }

    #[test]
    fn read_records_reports_line_numbers() {
        let payload = "{\"id\":\"mbr-1\",\"preferred_name\":\"Smith, Jane\"}\nnot json\n";
        let result: Result<Vec<Member>, JsonlError> = read_records(payload.as_bytes());
        match result {
            Err(JsonlError::Parse(line, _)) => assert_eq!(line, 2),
            other => panic!("expected parse error with line number, got {other:?}"),
        }
    }

    #[test]
    fn read_records_from_path_rejects_nul_payload() {
        let path = temp_path("nul");
        fs::write(
            &path,
            b"{\"id\":\"mbr-1\",\"preferred_name\":\"Smith, Jane\"}\n\0garbage",
        )
        .expect("fixture should write");

        let result: Result<Vec<Member>, JsonlError> = read_records_from_path(&path);
        match result {
            Err(JsonlError::Corrupt(message)) => {
                assert!(message.contains("contains NUL"));
            }
            other => panic!("expected corrupt substrate error, got {other:?}"),
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn read_records_from_path_rejects_non_utf8_payload() {
        let path = temp_path("non-utf8");
        fs::write(&path, [0xff, 0xfe, 0xfd]).expect("fixture should write");

        let result: Result<Vec<Member>, JsonlError> = read_records_from_path(&path);
        match result {
            Err(JsonlError::Corrupt(message)) => {
                assert!(message.contains("non-UTF-8"));
            }
            other => panic!("expected corrupt substrate error, got {other:?}"),
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn write_records_to_path_replaces_file_atomically() {
        let path = temp_path("atomic-write");
        let first = Member::new("mbr-1", "Smith, Jane", "Smith, John");
        write_records_to_path(&path, &[first]).expect("first write should succeed");

        let second = Member::new("mbr-2", "Lee, Ana", "Lee, Ana");
        write_records_to_path(&path, &[second]).expect("second write should succeed");

        let lines = fs::read_to_string(&path).expect("jsonl should exist");
        assert!(!lines.contains("mbr-1"));
        assert!(lines.contains("mbr-2"));

        let _ = fs::remove_file(path);
    }
}
