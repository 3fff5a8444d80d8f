//! Application-level errors (wraps domain and store errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::StoreError;

/// Application errors wrap domain and store errors and add tree-file context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("corrupt tree file {path}: no 'root' container")]
    CorruptTree { path: PathBuf },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
