use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LeaseError {
    #[error("malformed table layout on page {page}: {reason}")]
    MalformedTableLayout { page: usize, reason: String },

    #[error("column pattern mismatch in record {record}: {reason}")]
    ColumnPatternMismatch { record: usize, reason: String },

    #[error("no page contains a schedule of notices of leases")]
    EmptyDocument,

    #[error("column offsets never reconciled across {records} record(s); property descriptions are best-effort")]
    Unreconciled { records: usize },

    #[error("unsupported media type: {0}. Please provide a PDF file.")]
    UnsupportedMediaType(String),

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
