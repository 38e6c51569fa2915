//! Plugin API trait for grant store implementations.

use std::collections::HashSet;

use async_trait::async_trait;
use evently_security::Capability;

use crate::error::GrantStoreError;

/// Source of truth for which capabilities a subject holds.
///
/// Implementations must be safe to call concurrently. The resolver bounds every
/// call with a timeout and may drop the future before it completes.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Return every capability granted to `subject_id`.
    ///
    /// Unknown subjects have no grants; that is an empty set, not an error.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the backing store cannot be reached
    /// - `Malformed` if stored grant data cannot be interpreted
    /// - `Internal` for unexpected errors
    async fn grants_for(&self, subject_id: &str) -> Result<HashSet<Capability>, GrantStoreError>;
}
