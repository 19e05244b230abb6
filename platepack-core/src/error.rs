use std::path::PathBuf;
use thiserror::Error;

/// One manifest row that failed validation: the 1-based row number in the
/// source text (the header is row 1, so the first data row is 2) plus the
/// names of the fields that are missing or invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    pub row: usize,
    pub fields: Vec<String>,
}

impl std::fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: missing {}", self.row, self.fields.join(", "))
    }
}

#[derive(Error, Debug)]
pub enum PackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("manifest header mismatch: found {found:?}, expected {expected:?}")]
    HeaderMismatch {
        found: Vec<String>,
        expected: Vec<String>,
    },

    #[error("manifest validation failed: {} row(s) with missing or invalid fields", .0.len())]
    ValidationFailed(Vec<RowDiagnostic>),

    #[error("no payload files found under {}", .0.display())]
    NoPayloadFound(PathBuf),

    #[error("archive write failed for group \"{group}\": {source}")]
    ArchiveWriteFailed {
        group: String,
        #[source]
        source: Box<PackError>,
    },

    #[error("container error: {0}")]
    Container(#[from] zip::result::ZipError),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, PackError>;
