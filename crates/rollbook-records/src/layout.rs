//! On-disk layout of a roll book data directory.
//!
//! All collections live as JSONL files under one `.rollbook/` directory
//! next to the config file. Paths are derived here so every consumer
//! agrees on the layout.

use std::path::{Path, PathBuf};

/// Directory name created inside the working directory.
pub const DATA_DIR_NAME: &str = ".rollbook";

/// Resolved paths for one roll book data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Wrap an explicit data directory path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The conventional layout under a base directory: `<base>/.rollbook`.
    pub fn under(base: impl AsRef<Path>) -> Self {
        Self {
            root: base.as_ref().join(DATA_DIR_NAME),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn members_file(&self) -> PathBuf {
        self.root.join("members.jsonl")
    }

    pub fn families_file(&self) -> PathBuf {
        self.root.join("families.jsonl")
    }

    pub fn completions_file(&self) -> PathBuf {
        self.root.join("completions.jsonl")
    }

    pub fn plots_file(&self) -> PathBuf {
        self.root.join("plots.jsonl")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }
}
