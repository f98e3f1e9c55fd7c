//! Error types for artifact generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for generation operations.
pub type InitResult<T> = Result<T, InitError>;

/// Errors that can occur while writing template artifacts.
#[derive(Debug, Error)]
pub enum InitError {
    /// A required template file was not found in embedded assets.
    #[error("Template file not found: {0}")]
    TemplateNotFound(String),

    /// Failed to create a directory.
    #[error("Failed to create directory {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file {path:?}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
