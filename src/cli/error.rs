//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::StoreError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("console I/O failed: {0}")]
    Console(#[from] std::io::Error),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(e.into())
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Console(_) => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                ApplicationError::CorruptTree { .. } => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                ApplicationError::Store(store) => match store {
                    StoreError::Io { .. } => crate::exitcode::NOINPUT,
                    StoreError::Write { .. } => crate::exitcode::CANTCREAT,
                    StoreError::Format { .. } | StoreError::MissingAttribute { .. } => {
                        crate::exitcode::DATAERR
                    }
                    StoreError::Storage { .. } => crate::exitcode::CANTCREAT,
                },
            },
        }
    }
}
