//! Lock-scoped atomic mutation helpers for JSONL collections.

use crate::memory::{Record, RecordStore, RecordStoreError};
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::error::Error as StdError;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn record_lock_path(collection_path: &Path) -> PathBuf {
    let mut path: OsString = collection_path.as_os_str().to_os_string();
    path.push(".lock");
    PathBuf::from(path)
}

#[derive(Debug)]
pub enum AtomicStoreMutationError<E> {
    LockBusy { lock_path: String },
    LockIo { lock_path: String, message: String },
    Store(RecordStoreError),
    Mutation(E),
}

impl<E> AtomicStoreMutationError<E> {
    fn lock_busy(lock_path: &Path) -> Self {
        Self::LockBusy {
            lock_path: lock_path.display().to_string(),
        }
    }

    fn lock_io(lock_path: &Path, message: impl Into<String>) -> Self {
        Self::LockIo {
            lock_path: lock_path.display().to_string(),
            message: message.into(),
        }
    }
}

impl<E: Display> Display for AtomicStoreMutationError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LockBusy { lock_path } => write!(f, "collection lock busy: {lock_path}"),
            Self::LockIo { lock_path, message } => {
                write!(f, "failed to acquire collection lock {lock_path}: {message}")
            }
            Self::Store(err) => write!(f, "{err}"),
            Self::Mutation(err) => write!(f, "{err}"),
        }
    }
}

impl<E> StdError for AtomicStoreMutationError<E> where
    E: Display + std::fmt::Debug + StdError + 'static
{
}

/// Execute one lock-scoped store mutation against a collection JSONL path.
///
/// The mutator returns `(value, changed)` where:
/// - `value` is returned to the caller
/// - `changed=true` persists the store to JSONL before lock release.
///
/// An absent collection file hydrates as an empty store, so the first
/// mutation of a fresh layout creates the file.
pub fn mutate_records_jsonl<T, V, E, F>(
    path: impl AsRef<Path>,
    mutator: F,
) -> Result<V, AtomicStoreMutationError<E>>
where
    T: Record + Serialize + DeserializeOwned,
    F: FnOnce(&mut RecordStore<T>) -> Result<(V, bool), E>,
{
    let path = path.as_ref();
    let _guard = RecordFileLockGuard::acquire(path).map_err(|err| match err {
        AtomicStoreMutationError::LockBusy { lock_path } => {
            AtomicStoreMutationError::LockBusy { lock_path }
        }
        AtomicStoreMutationError::LockIo { lock_path, message } => {
            AtomicStoreMutationError::LockIo { lock_path, message }
        }
        AtomicStoreMutationError::Store(source) => AtomicStoreMutationError::Store(source),
        AtomicStoreMutationError::Mutation(unreachable) => match unreachable {},
    })?;

    let mut store = if path.exists() {
        RecordStore::load_jsonl(path).map_err(AtomicStoreMutationError::Store)?
    } else {
        RecordStore::default()
    };
    let (value, changed) = mutator(&mut store).map_err(AtomicStoreMutationError::Mutation)?;
    if changed {
        store
            .save_jsonl(path)
            .map_err(AtomicStoreMutationError::Store)?;
    }
    Ok(value)
}

struct RecordFileLockGuard {
    lock_path: PathBuf,
    _file: File,
}

impl RecordFileLockGuard {
    fn acquire(path: &Path) -> Result<Self, AtomicStoreMutationError<std::convert::Infallible>> {
        let lock_path = record_lock_path(path);
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| AtomicStoreMutationError::lock_io(&lock_path, e.to_string()))?;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(mut file) => {
                let _ = writeln!(
                    file,
                    "pid={}\nutc={}",
                    std::process::id(),
                    Utc::now().to_rfc3339()
                );
                Ok(Self {
                    lock_path,
                    _file: file,
                })
            }
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(AtomicStoreMutationError::lock_busy(&lock_path))
            }
            Err(err) => Err(AtomicStoreMutationError::lock_io(
                &lock_path,
                err.to_string(),
            )),
        }
    }
}

impl Drop for RecordFileLockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Member;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "rollbook-atomic-{prefix}-{}-{unique}.jsonl",
            std::process::id()
        ))
    }

    #[test]
    fn mutate_creates_collection_on_first_write() {
        let path = temp_path("fresh");
        let id = mutate_records_jsonl::<Member, _, std::convert::Infallible, _>(&path, |store| {
            store.upsert(Member::new("mbr-1", "Smith, Jane", "Smith, John"));
            Ok(("mbr-1".to_string(), true))
        })
        .expect("mutation should succeed");

        assert_eq!(id, "mbr-1");
        let contents = fs::read_to_string(&path).expect("collection should exist");
        assert!(contents.contains("mbr-1"));
        assert!(!record_lock_path(&path).exists());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn mutate_skips_write_when_unchanged() {
        let path = temp_path("unchanged");
        mutate_records_jsonl::<Member, _, std::convert::Infallible, _>(&path, |_store| {
            Ok(((), false))
        })
        .expect("mutation should succeed");

        assert!(!path.exists());
    }

    #[test]
    fn held_lock_reports_busy() {
        let path = temp_path("busy");
        let lock_path = record_lock_path(&path);
        fs::write(&lock_path, "pid=0\n").expect("lock fixture should write");

        let result = mutate_records_jsonl::<Member, _, std::convert::Infallible, _>(
            &path,
            |_store| Ok(((), false)),
        );
        match result {
            Err(AtomicStoreMutationError::LockBusy { lock_path: reported }) => {
                assert!(reported.ends_with(".lock"));
            }
            other => panic!("expected lock-busy error, got {other:?}"),
        }

        let _ = fs::remove_file(lock_path);
    }
}
