//! Error types for the `AuthZ` resolver module.

use thiserror::Error;

/// Errors a [`GrantStore`](crate::GrantStore) may report.
///
/// These represent infrastructure failures only. A subject lacking a capability
/// is expressed by the capability's absence from the returned set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrantStoreError {
    /// The backing store cannot be reached right now.
    #[error("grant store unavailable: {0}")]
    Unavailable(String),

    /// Stored grant data could not be interpreted.
    #[error("malformed grant data: {0}")]
    Malformed(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
