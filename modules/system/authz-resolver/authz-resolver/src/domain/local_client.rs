//! Local (in-process) client for the `AuthZ` resolver.

use std::sync::Arc;

use async_trait::async_trait;
use authz_resolver_sdk::{AuthZResolverClient, AuthorizationDecision};
use evently_security::Capability;

use super::Service;

/// Local client wrapping the service.
///
/// Handed to the API gateway at startup.
pub struct AuthZResolverLocalClient {
    svc: Arc<Service>,
}

impl AuthZResolverLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

#[async_trait]
impl AuthZResolverClient for AuthZResolverLocalClient {
    async fn resolve(&self, subject_id: &str, capability: Capability) -> AuthorizationDecision {
        self.svc.resolve(subject_id, capability).await
    }
}
