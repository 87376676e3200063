use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlurtError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Import files must carry the one expected name.
    #[error("Import file must be named exactly \"{expected}\", got \"{found}\"")]
    InvalidImportFilename { expected: String, found: String },

    #[error("Invalid snippet: {0}")]
    InvalidSnippet(String),

    #[error("Trigger '{0}' not found")]
    SnippetNotFound(String),

    #[error("Error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BlurtError>;
