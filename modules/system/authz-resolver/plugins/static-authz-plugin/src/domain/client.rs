//! Grant store implementation for the static `AuthZ` plugin.

use std::collections::HashSet;

use async_trait::async_trait;
use authz_resolver_sdk::{GrantStore, GrantStoreError};
use evently_security::Capability;

use super::service::StaticGrantStore;

#[async_trait]
impl GrantStore for StaticGrantStore {
    async fn grants_for(&self, subject_id: &str) -> Result<HashSet<Capability>, GrantStoreError> {
        Ok(self.lookup(subject_id))
    }
}
