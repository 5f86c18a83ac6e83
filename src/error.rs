//! Error types for catalog conversion.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Failure modes of a conversion run.
///
/// Per-field decode failures are not represented here: a bad or blank numeric
/// field degrades to `None` inside the record, and a duplicate-key insert is
/// an [`InsertOutcome`](crate::sink::InsertOutcome), not an error. These
/// variants cover the file-level and connection-level failures that abort a
/// single-file run (and are collected per file in directory-batch mode).
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unknown format '{token}' (expected ascii, ascii_zonestats, binary, sqlite or postgres)")]
    UnknownFormat { token: String },

    #[error("endpoint '{endpoint}' is missing a location (expected format:location)")]
    MissingLocation { endpoint: String },

    #[error("{path}: size {size} is not a multiple of the 78-byte record length", path = .path.display())]
    TruncatedFile { path: PathBuf, size: u64 },

    #[error("line is {len} characters, need at least {needed}")]
    LineTooShort { len: usize, needed: usize },

    #[error("bad {field} field: '{value}'")]
    BadField { field: &'static str, value: String },

    #[error("cannot derive a zone number from '{name}'")]
    BadZoneName { name: String },

    #[error("postgres target '{location}' must be of the form database.table")]
    BadPostgresTarget { location: String },

    #[error("no zone files found in {path}", path = .path.display())]
    EmptyBatch { path: PathBuf },

    #[error("directory-batch mode needs an ascii or binary source")]
    BadBatchSource,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Postgres(#[from] postgres::Error),
}
