//! # rollbook-import
//!
//! LCR ingestion pipeline.
//!
//! This crate provides:
//! - header normalization (doubled-label repair, canonical key mapping)
//! - row cleaning (header-echo filtering, glued-prefix stripping)
//! - three source parsers: TSV paste, saved report JSON, raw RSC payload
//! - validation, roster summary, and the dedup import plan/apply step
//!
//! ## Pipeline
//!
//! ```text
//! TSV / report JSON / RSC blob
//!     → raw rows (string cells keyed by scraped header)
//!     → normalize (undouble headers, canonical keys, cell cleaning)
//!     → ImportRow
//!     → validate / summarize / plan / apply
//! ```

pub mod headers;
pub mod plan;
pub mod report;
pub mod rows;
pub mod rsc;
pub mod summary;
pub mod tsv;
pub mod validate;

pub use headers::{
    REQUIRED_KEYS, canonical_import_key, clean_cell_value, strip_header_from_value,
    undouble_header_text,
};
pub use plan::{ImportPlan, PlannedMember, apply_import, plan_import};
pub use report::{ReportPayload, parse_report_json};
pub use rows::{ImportRow, NormalizedRows, normalize_rows};
pub use rsc::extract_report_from_rsc;
pub use summary::{ImportSummary, summarize_rows};
pub use tsv::{EXPORT_COLUMNS, RawTable, export_tsv, parse_tsv};
pub use validate::validate_rows;

/// Errors from parsing an import source.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid data format: {0}")]
    InvalidFormat(String),

    #[error("missing required header: {0}")]
    MissingHeader(String),

    #[error("invalid report json: {0}")]
    InvalidJson(String),

    #[error("no members array found in RSC payload")]
    RscMembersMissing,
}
