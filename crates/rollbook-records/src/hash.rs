//! Content-addressed hashing for roster records.
//!
//! Import compares the hash of an incoming record against the stored one to
//! decide between "updated" and "unchanged". The hash covers substantive
//! fields only; ids and timestamps are volatile and excluded.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A content-addressed hash over a record's substantive fields.
///
/// Two records with the same `ContentHash` carry the same roster facts,
/// even when their ids or timestamps differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute a content hash from raw bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{hash:x}"))
    }

    /// Compute a content hash from a string.
    pub fn from_str_content(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }

    /// A builder for incrementally computing content hashes.
    pub fn builder() -> ContentHashBuilder {
        ContentHashBuilder {
            hasher: Sha256::new(),
        }
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Incremental content hash builder.
///
/// Feeds fields in a stable order to produce a deterministic hash.
pub struct ContentHashBuilder {
    hasher: Sha256,
}

impl ContentHashBuilder {
    /// Feed a string field into the hash.
    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.hasher.update(name.as_bytes());
        self.hasher.update(b":");
        self.hasher.update(value.as_bytes());
        self.hasher.update(b"\n");
        self
    }

    /// Feed an integer field into the hash.
    pub fn field_int(self, name: &str, value: i64) -> Self {
        self.field(name, &value.to_string())
    }

    /// Feed an optional field (skipped if None).
    pub fn field_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.field(name, v),
            None => self,
        }
    }

    /// Finalize and produce the content hash.
    pub fn finish(self) -> ContentHash {
        let hash = self.hasher.finalize();
        ContentHash(format!("{hash:x}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_is_order_sensitive() {
        let a = ContentHash::builder()
            .field("name", "Smith, Jane")
            .field("house", "Smith, John")
            .finish();
        let b = ContentHash::builder()
            .field("house", "Smith, John")
            .field("name", "Smith, Jane")
            .finish();
        assert_ne!(a, b);
    }

    #[test]
    fn field_opt_none_is_skipped() {
        let with_none = ContentHash::builder()
            .field("name", "Smith, Jane")
            .field_opt("phone", None)
            .finish();
        let bare = ContentHash::builder().field("name", "Smith, Jane").finish();
        assert_eq!(with_none, bare);
    }

    #[test]
    fn same_fields_same_hash() {
        let a = ContentHash::builder()
            .field("name", "Smith, Jane")
            .field_int("age", 34)
            .finish();
        let b = ContentHash::builder()
            .field("name", "Smith, Jane")
            .field_int("age", 34)
            .finish();
        assert_eq!(a, b);
    }
}
