//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::RosterError;

/// Errors emitted while fetching the upstream dataset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("dataset request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("dataset document is neither an array nor an object of records")]
    UnexpectedShape,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `DatasetService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("student data unavailable: {0}")]
    Unavailable(#[from] FetchError),
    #[error(transparent)]
    Roster(#[from] RosterError),
}

impl DatasetError {
    /// Network and HTTP failures may succeed on retry; an empty roster will not
    /// change without new upstream data.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, DatasetError::Unavailable(_))
    }
}

/// Errors emitted by quiz sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions to ask: roster has {roster} entities, {requested} questions requested")]
    EmptyPlan { roster: usize, requested: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_is_retryable() {
        assert!(DatasetError::from(FetchError::UnexpectedShape).is_retryable());
        assert!(!DatasetError::from(RosterError::Empty { rejected: 3 }).is_retryable());
    }
}
