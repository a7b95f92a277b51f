use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, RttError>;

#[derive(Error, Debug)]
pub enum RttError {
    #[error("The file was not found at path: {}", .0.display())]
    NotFound(PathBuf),

    #[error("File '{0}' contains no valid RTT data.")]
    EmptyData(String),

    #[error("Column '{column}' not found in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("Invalid RTT value {value:?} at data row {row}")]
    MalformedSample { row: usize, value: String },

    #[error("Invalid row index: {index} (ledger has {len} rows)")]
    InvalidIndex { index: usize, len: usize },

    #[error("At least {required} row(s) required, got {supplied}")]
    InsufficientRows { required: usize, supplied: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RttError {
    /// Conditions the operator can fix by changing the input, as opposed to
    /// operational failures of the disk or the table format.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            RttError::NotFound(_)
                | RttError::EmptyData(_)
                | RttError::MissingColumn { .. }
                | RttError::MalformedSample { .. }
                | RttError::InvalidIndex { .. }
                | RttError::InsufficientRows { .. }
        )
    }
}
