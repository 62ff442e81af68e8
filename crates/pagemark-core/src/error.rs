use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PagemarkError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("page {page} is out of range (document has {count} page(s))")]
    PageOutOfRange { page: usize, count: usize },

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to parse pdftotext output: {0}")]
    ParseError(String),

    #[error("template '{0}' not found")]
    TemplateNotFound(String),

    #[error("selection '{selection}' not found in template '{template}'")]
    SelectionNotFound { template: String, selection: String },

    #[error("failed to access store at {path}: {reason}")]
    Store { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PagemarkError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PagemarkError::InvalidArgument(msg.into())
    }
}
