//! # rollbook-records
//!
//! Record layer for congregation roster state.
//!
//! This crate provides:
//! - `Member`, `Family`, `CompletionRecord`, `PlotLocation` types (the records)
//! - JSONL read/write (portable persistence, one line per record)
//! - `RecordStore` (canonical in-memory state per collection)
//! - Content hashing so import can tell changed records from unchanged ones
//!
//! It intentionally does not ingest external data or serve queries.
//! Those concerns live in the adapter crates (`rollbook-import`,
//! `rollbook-directory`, `rollbook-ux`).
//!
//! ## Data model
//!
//! ```text
//! JSONL (on disk, one line per record, one file per collection)
//!     ↕  hydrate / flush
//! RecordStore (deterministic in-memory projection)
//! ```

pub mod atomic_store;
pub mod clean;
pub mod completion;
pub mod config;
pub mod family;
pub mod hash;
pub mod jsonl;
pub mod layout;
pub mod member;
pub mod memory;
pub mod plot;

pub use atomic_store::{AtomicStoreMutationError, mutate_records_jsonl, record_lock_path};
pub use clean::{
    digits_only, parse_age, parse_birth_day, parse_birth_year, parse_int_prefix, split_callings,
};
pub use completion::{CompletionRecord, month_key};
pub use config::{AppConfig, ConfigError, MapConfig, load_config, save_config};
pub use family::{Family, ReviewDay, TodoItem, TodoPriority, family_id_for_household};
pub use hash::{ContentHash, ContentHashBuilder};
pub use jsonl::{
    JsonlError, read_records, read_records_from_path, write_records, write_records_to_path,
};
pub use layout::{DATA_DIR_NAME, DataDir};
pub use member::{Gender, Member, next_member_id};
pub use memory::{Record, RecordStore, RecordStoreError};
pub use plot::PlotLocation;
