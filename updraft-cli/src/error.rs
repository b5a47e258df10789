//! CLI error type.

use std::fmt;

use updraft::fetch::FetchError;
use updraft::loader::LoaderError;
use updraft::store::StoreError;

/// Errors surfaced to the command line.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or missing configuration.
    Config(String),

    /// The requested update is not persisted.
    NotFound(String),

    /// A load session failed.
    Loader(LoaderError),

    /// The update store could not be read or written.
    Store(StoreError),

    /// The HTTP client could not be constructed.
    Fetch(FetchError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "configuration error: {}", msg),
            CliError::NotFound(id) => write!(f, "update {} is not persisted", id),
            CliError::Loader(e) => write!(f, "load failed: {}", e),
            CliError::Store(e) => write!(f, "store error: {}", e),
            CliError::Fetch(e) => write!(f, "HTTP client error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Loader(e) => Some(e),
            CliError::Store(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LoaderError> for CliError {
    fn from(e: LoaderError) -> Self {
        CliError::Loader(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}
