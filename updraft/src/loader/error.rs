//! Error types for load sessions.

use thiserror::Error;

use crate::fetch::FetchError;
use crate::store::StoreError;

/// Errors that can terminate a load session.
///
/// Per-asset download failures are deliberately absent: they are absorbed
/// into the update's status (a failed bucket keeps the update pending) and
/// never surface through this type.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// `start` was called on a loader that already started a load.
    ///
    /// Reported to the second caller only; the in-flight session is
    /// unaffected.
    #[error("loader has already started; create a new instance to load again")]
    AlreadyStarted,

    /// The manifest could not be fetched or parsed.
    ///
    /// Terminal for the whole session; no persistence mutation has occurred
    /// when this is returned.
    #[error("failed to fetch manifest: {0}")]
    ManifestFetch(#[source] FetchError),

    /// A persistence operation failed.
    #[error("update store error: {0}")]
    Store(#[from] StoreError),

    /// An internal invariant was violated.
    ///
    /// Defensive only; a correct implementation never produces this.
    #[error("internal loader error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_started_display() {
        let err = LoaderError::AlreadyStarted;
        assert!(err.to_string().contains("already started"));
    }

    #[test]
    fn test_manifest_fetch_wraps_source() {
        let err = LoaderError::ManifestFetch(FetchError::Http("connection refused".to_string()));
        assert!(err.to_string().contains("failed to fetch manifest"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
