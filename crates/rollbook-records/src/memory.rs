//! Canonical in-memory representation of one roster collection.
//!
//! This is the memory boundary for `rollbook-records`:
//! - load/store JSONL
//! - expose deterministic record queries
//! - avoid ingestion and presentation concerns (no import/HTTP coupling here)

use crate::jsonl::{JsonlError, read_records_from_path, write_records_to_path};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

/// A record that can live in a `RecordStore`: anything with a stable id.
pub trait Record: Clone {
    fn record_id(&self) -> &str;
}

/// Errors raised while loading or mutating a record store.
#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),

    #[error("record not found: {0}")]
    NotFound(String),
}

/// Canonical in-memory state for one collection.
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    records: BTreeMap<String, T>,
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<T: Record> RecordStore<T> {
    /// Build a store from fully-materialized records.
    ///
    /// Duplicate ids are resolved with deterministic last-write-wins
    /// semantics, matching append/overlay behavior in JSONL sync workflows.
    pub fn from_records(records: Vec<T>) -> Self {
        let mut index = BTreeMap::new();
        for record in records {
            let id = record.record_id().to_string();
            index.insert(id, record);
        }
        Self { records: index }
    }

    /// Load store state from a JSONL file.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, RecordStoreError>
    where
        T: DeserializeOwned,
    {
        let records = read_records_from_path(path)?;
        Ok(Self::from_records(records))
    }

    /// Persist store state to a JSONL file.
    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<(), RecordStoreError>
    where
        T: Serialize,
    {
        let records: Vec<T> = self.records.values().cloned().collect();
        write_records_to_path(path, &records)?;
        Ok(())
    }

    /// Total number of records in memory.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store has zero records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lookup one record by id.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.get(id)
    }

    /// Lookup one record by id (mutable).
    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.records.get_mut(id)
    }

    /// Insert or replace a record by id.
    ///
    /// Returns previous value if present.
    pub fn upsert(&mut self, record: T) -> Option<T> {
        self.records.insert(record.record_id().to_string(), record)
    }

    /// Remove a record by id.
    pub fn remove(&mut self, id: &str) -> Result<T, RecordStoreError> {
        self.records
            .remove(id)
            .ok_or_else(|| RecordStoreError::NotFound(id.to_string()))
    }

    /// Iterate all records in deterministic id order.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Member;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(prefix: &str) -> std::path::PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "rollbook-memory-{prefix}-{}-{unique}.jsonl",
            std::process::id()
        ))
    }

    #[test]
    fn duplicate_ids_use_last_write_wins() {
        let first = Member::new("mbr-1", "Smith, Jane", "Smith, John");
        let mut second = Member::new("mbr-1", "Smith, Jane", "Smith, John");
        second.age = 35;

        let store = RecordStore::from_records(vec![first, second]);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("mbr-1").expect("record must exist after dedupe").age,
            35
        );
    }

    #[test]
    fn upsert_returns_previous_value() {
        let mut store = RecordStore::default();
        assert!(store.upsert(Member::new("mbr-1", "Smith, Jane", "Smith, John")).is_none());
        let mut updated = Member::new("mbr-1", "Smith, Jane", "Smith, John");
        updated.age = 40;
        let previous = store.upsert(updated).expect("previous value should return");
        assert_eq!(previous.age, 0);
    }

    #[test]
    fn remove_missing_record_is_typed_error() {
        let mut store: RecordStore<Member> = RecordStore::default();
        let err = store.remove("mbr-404").expect_err("missing id must error");
        assert!(matches!(err, RecordStoreError::NotFound(id) if id == "mbr-404"));
    }

    #[test]
    fn records_iterate_in_id_order() {
        let mut store = RecordStore::default();
        store.upsert(Member::new("mbr-2", "B", "B"));
        store.upsert(Member::new("mbr-1", "A", "A"));
        let ids: Vec<&str> = store.records().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["mbr-1", "mbr-2"]);
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = temp_path("round-trip");
        let mut store = RecordStore::default();
        store.upsert(Member::new("mbr-1", "Smith, Jane", "Smith, John"));
        store.save_jsonl(&path).expect("store should save");

        let loaded: RecordStore<Member> =
            RecordStore::load_jsonl(&path).expect("store should load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.get("mbr-1").expect("member must exist").preferred_name,
            "Smith, Jane"
        );

        let _ = std::fs::remove_file(path);
    }
}
