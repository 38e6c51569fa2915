//! Domain service for the `AuthZ` resolver.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use authz_resolver_sdk::{AuthorizationDecision, GrantStore};
use evently_security::Capability;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::cache::GrantCache;
use super::error::DomainError;
use crate::config::AuthZResolverConfig;

/// `AuthZ` resolver service.
///
/// Holds no per-request state: the only shared pieces are the grant store handle and
/// the optional cache, both safe for concurrent use. Nothing is spawned, so dropping a
/// `resolve` future (client went away) abandons the lookup without side effects.
pub struct Service {
    store: Arc<dyn GrantStore>,
    timeout: Duration,
    retry_backoff: Option<Duration>,
    cache: Option<GrantCache>,
}

impl Service {
    #[must_use]
    pub fn new(store: Arc<dyn GrantStore>, cfg: &AuthZResolverConfig) -> Self {
        let cache = cfg.cache.enabled.then(|| {
            GrantCache::new(
                Duration::from_millis(cfg.cache.ttl_ms),
                cfg.cache.max_entries,
            )
        });

        Self {
            store,
            timeout: cfg.grant_store_timeout(),
            retry_backoff: cfg
                .retry
                .enabled
                .then(|| Duration::from_millis(cfg.retry.backoff_ms)),
            cache,
        }
    }

    /// Decide whether `subject_id` holds `capability`. Fails closed.
    #[tracing::instrument(skip_all, fields(subject_id = %subject_id, capability = %capability))]
    pub async fn resolve(&self, subject_id: &str, capability: Capability) -> AuthorizationDecision {
        match self.grants_for(subject_id).await {
            Ok(grants) if grants.contains(&capability) => AuthorizationDecision::Allowed,
            Ok(_) => {
                debug!("capability not granted");
                AuthorizationDecision::missing_capability(capability)
            }
            Err(e) => {
                warn!(error = %e, "grant lookup failed; denying");
                AuthorizationDecision::resolver_unavailable(e.to_string())
            }
        }
    }

    /// Grants for `subject_id`, served from the cache when fresh.
    ///
    /// # Errors
    ///
    /// - `Timeout` if the store did not answer in time (after the optional retry)
    /// - `Store` if the store reported a failure
    pub async fn grants_for(
        &self,
        subject_id: &str,
    ) -> Result<Arc<HashSet<Capability>>, DomainError> {
        if let Some(grants) = self.cache.as_ref().and_then(|c| c.get(subject_id)) {
            debug!("grant cache hit");
            return Ok(grants);
        }

        let fetched_at = Instant::now();
        let grants = Arc::new(self.fetch_with_retry(subject_id).await?);

        if let Some(cache) = &self.cache {
            cache.insert(subject_id, Arc::clone(&grants), fetched_at);
        }

        Ok(grants)
    }

    /// Drop any cached grants for `subject_id`.
    pub fn invalidate(&self, subject_id: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(subject_id);
        }
    }

    /// Drop every cached grant set, e.g. after the store was reloaded.
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    async fn fetch_with_retry(&self, subject_id: &str) -> Result<HashSet<Capability>, DomainError> {
        match self.fetch_once(subject_id).await {
            Err(e) if e.is_retryable() => {
                let Some(backoff) = self.retry_backoff else {
                    return Err(e);
                };
                warn!(error = %e, backoff_ms = backoff.as_millis(), "grant lookup failed; retrying once");
                tokio::time::sleep(backoff).await;
                self.fetch_once(subject_id).await
            }
            other => other,
        }
    }

    async fn fetch_once(&self, subject_id: &str) -> Result<HashSet<Capability>, DomainError> {
        tokio::time::timeout(self.timeout, self.store.grants_for(subject_id))
            .await
            .map_err(|_| DomainError::Timeout(self.timeout))?
            .map_err(DomainError::from)
    }
}
