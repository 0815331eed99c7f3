use seedscout_utils::seed::SeedError;
use thiserror::Error;

/// Errors returned by [`SearchEngine`](crate::SearchEngine).
///
/// Every variant is raised before any scanning starts, except
/// [`SearchError::Cancelled`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The seed text was empty.
    #[error("invalid seed: {0}")]
    InvalidSeedFormat(#[from] SeedError),
    /// The request cannot be searched as given.
    #[error("invalid search request: {0}")]
    InvalidSearchRequest(String),
    /// The search settings are out of range.
    #[error("invalid search settings: {0}")]
    InvalidSettings(String),
    /// The caller cancelled the search before it finished.
    #[error("search cancelled")]
    Cancelled,
}
