//! Error types for nbexport-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for nbexport-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting a notebook.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file.
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Failed to write a generated file.
    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// Failed to create a directory.
    #[error("failed to create directory {path}: {message}")]
    CreateDir { path: PathBuf, message: String },

    /// Failed to list a directory.
    #[error("failed to list directory {path}: {message}")]
    ListDir { path: PathBuf, message: String },

    /// Failed to copy or link a file into another package.
    #[error("failed to copy {from} to {to}: {message}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    /// The notebook does not have the expected cell structure.
    #[error("unexpected notebook format: {0}")]
    InvalidNotebook(String),

    /// The notebook is not valid JSON.
    #[error("unexpected notebook format: {0}")]
    Json(#[from] serde_json::Error),

    /// A notebook file could not be decoded.
    #[error("{path}: {source}")]
    Notebook { path: PathBuf, source: Box<Error> },
}

impl Error {
    /// Whether the notebook itself is malformed, as opposed to a filesystem failure.
    pub fn is_structural(&self) -> bool {
        match self {
            Error::InvalidNotebook(_) | Error::Json(_) => true,
            Error::Notebook { source, .. } => source.is_structural(),
            _ => false,
        }
    }

    pub(crate) fn notebook(path: impl Into<PathBuf>, err: Error) -> Self {
        Error::Notebook {
            path: path.into(),
            source: Box::new(err),
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn create_dir(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Error::CreateDir {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn list_dir(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Error::ListDir {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
