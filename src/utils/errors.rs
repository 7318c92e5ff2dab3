use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetTranslatorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    RowDecode(#[from] RowDecodeError),

    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    #[error("Failed to build JSON for row {row_index}: {reason}")]
    RowMerge { row_index: usize, reason: String },

    #[error("Unknown entity kind: {0}")]
    UnknownEntityKind(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, SheetTranslatorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeReason {
    MissingId,
    MissingKrName,
    MissingIdAndKrName,
}

impl DecodeReason {
    pub fn from_presence(has_id: bool, has_kr_name: bool) -> Option<Self> {
        match (has_id, has_kr_name) {
            (true, true) => None,
            (false, true) => Some(DecodeReason::MissingId),
            (true, false) => Some(DecodeReason::MissingKrName),
            (false, false) => Some(DecodeReason::MissingIdAndKrName),
        }
    }
}

impl std::fmt::Display for DecodeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeReason::MissingId => write!(f, "missing id"),
            DecodeReason::MissingKrName => write!(f, "missing Korean name"),
            DecodeReason::MissingIdAndKrName => write!(f, "missing id and Korean name"),
        }
    }
}

/// A row that cannot enter the working set. `row_number` is the 1-based
/// sheet row, header rows included.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Row {row_number}: {reason}")]
pub struct RowDecodeError {
    pub row_number: usize,
    pub reason: DecodeReason,
}
