//! Domain errors for the `AuthZ` resolver.

use std::time::Duration;

use authz_resolver_sdk::GrantStoreError;

/// Internal domain errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("grant store did not answer within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Store(#[from] GrantStoreError),
}

impl DomainError {
    /// Transient failures worth one more attempt. Malformed data will not fix itself.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Store(GrantStoreError::Unavailable(_))
        )
    }
}
