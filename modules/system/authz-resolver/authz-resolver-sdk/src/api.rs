//! Public API trait for the `AuthZ` resolver.

use async_trait::async_trait;
use evently_security::Capability;

use crate::models::AuthorizationDecision;

/// Public API trait for the `AuthZ` resolver.
///
/// Consumed by the API gateway's authorization gate:
///
/// ```ignore
/// let decision = authz.resolve("u1", Capability::CreateEvent).await;
/// ```
#[async_trait]
pub trait AuthZResolverClient: Send + Sync {
    /// Decide whether `subject_id` holds `capability`.
    ///
    /// Infallible by contract: grant store failures are folded into
    /// [`AuthorizationDecision::Denied`] with [`DenyCode::ResolverUnavailable`](crate::DenyCode),
    /// so a caller can never mistake a failure for an allow.
    async fn resolve(&self, subject_id: &str, capability: Capability) -> AuthorizationDecision;
}
