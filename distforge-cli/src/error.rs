//! CLI error type.

use std::fmt;
use std::io;

use distforge::publish::PublishError;
use distforge::sync::SyncError;

/// Errors surfaced to the operator.
#[derive(Debug)]
pub enum CliError {
    /// Publishing failed.
    Publish(PublishError),

    /// Synchronization failed (including conflicts).
    Sync(SyncError),

    /// Local I/O failure outside the library (e.g. pin config).
    Io(io::Error),

    /// Invalid command-line input.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Publish(err) => write!(f, "{}", err),
            CliError::Sync(err) => write!(f, "{}", err),
            CliError::Io(err) => write!(f, "{}", err),
            CliError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Publish(err) => Some(err),
            CliError::Sync(err) => Some(err),
            CliError::Io(err) => Some(err),
            CliError::Usage(_) => None,
        }
    }
}

impl From<PublishError> for CliError {
    fn from(err: PublishError) -> Self {
        CliError::Publish(err)
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        CliError::Sync(err)
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Io(err)
    }
}
