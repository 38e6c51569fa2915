//! Events module definition

use std::sync::Arc;

use axum::Router;
use evently_api::OperationRegistry;
use tracing::debug;

use crate::api::rest::routes::{self, ConcreteService};
use crate::config::EventsConfig;
use crate::domain::service::Service;
use crate::infra::storage::InMemoryEventsRepository;

/// Owns the events service and mounts its REST routes.
pub struct EventsModule {
    service: Arc<ConcreteService>,
}

impl EventsModule {
    #[must_use]
    pub fn new(config: EventsConfig) -> Self {
        debug!("Effective events configuration: {:?}", config);
        let repo = Arc::new(InMemoryEventsRepository::new());
        Self {
            service: Arc::new(Service::new(repo, config)),
        }
    }

    #[must_use]
    pub fn service(&self) -> Arc<ConcreteService> {
        Arc::clone(&self.service)
    }

    /// Register every events operation with `registry` and mount the handlers on `router`.
    pub fn register_rest(&self, router: Router, registry: &dyn OperationRegistry) -> Router {
        let router = routes::register_routes(router, registry, self.service());
        tracing::info!("Events REST routes registered");
        router
    }
}
