//! Error types for intensity ingestion.
//!
//! Only structural problems are errors. Rows with unusable values are
//! dropped by the intensity set and counted, never reported here.

use thiserror::Error;

use xtal_merge::MergeError;
use xtal_model::DataKind;
use xtal_symmetry::SymmetryError;

#[derive(Debug, Error)]
pub enum IngestError {
    /// A required column is absent.
    #[error("column not found: {label}")]
    ColumnNotFound { label: String },

    /// A column exists but not where the format requires it.
    #[error("column {label} should be at position {expected}, found at {found}")]
    MisplacedColumn {
        label: String,
        expected: usize,
        found: usize,
    },

    /// Unmerged extraction requested from a merged file.
    #[error("expected unmerged file")]
    ExpectedUnmerged,

    /// Merged extraction requested from an unmerged file.
    #[error("expected merged file")]
    ExpectedMerged,

    /// The format cannot hold the requested kind of data.
    #[error("{format} files do not contain {kind} intensities")]
    UnsupportedKind { format: &'static str, kind: DataKind },

    /// A column refers to a dataset that is not defined.
    #[error("no dataset with ID {id}")]
    MissingDataset { id: i32 },

    /// A data row does not match the table layout.
    #[error("row length mismatch: expected {expected}, got {actual}")]
    RowLengthMismatch { expected: usize, actual: usize },

    /// A JSON value has no CIF counterpart.
    #[error("cannot convert JSON {kind} to a CIF value")]
    UnsupportedJsonValue { kind: &'static str },

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Symmetry(#[from] SymmetryError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    pub fn column_not_found(label: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            label: label.into(),
        }
    }

    pub fn misplaced_column(label: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::MisplacedColumn {
            label: label.into(),
            expected,
            found,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
