//! Infrastructure-level errors (container store and file I/O)

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the hierarchical container store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error at {group}: {reason}")]
    Storage { group: String, reason: String },

    #[error("missing attribute '{name}' on {group}")]
    MissingAttribute { group: String, name: String },

    #[error("malformed container file {path}: {message}")]
    Format { path: PathBuf, message: String },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Persisting a container failed.
    pub fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn storage(group: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Storage {
            group: group.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for container store operations.
pub type StoreResult<T> = Result<T, StoreError>;
