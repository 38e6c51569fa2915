use std::sync::Arc;

use axum::{Extension, Json, Router};
use evently_api::{OperationBuilder, OperationRegistry};
use evently_security::Capability;
use utoipa::OpenApi;

use super::handlers;
use super::openapi::EventsApiDoc;
use crate::domain::service::Service;
use crate::infra::storage::InMemoryEventsRepository;

/// Type alias for the concrete service type.
pub type ConcreteService = Service<InMemoryEventsRepository>;

const TAG: &str = "events";

pub fn register_routes(
    mut router: Router,
    registry: &dyn OperationRegistry,
    service: Arc<ConcreteService>,
) -> Router {
    router = OperationBuilder::post("/api/events")
        .operation_id("events.create_event")
        .summary("Create an event")
        .tag(TAG)
        .require_capability(Capability::CreateEvent)
        .handler(handlers::create_event)
        .register(router, registry);

    router = OperationBuilder::get("/api/events")
        .operation_id("events.list_events")
        .summary("List events")
        .tag(TAG)
        .require_capability(Capability::ReadEvent)
        .handler(handlers::list_events)
        .register(router, registry);

    router = OperationBuilder::get("/api/events/{id}")
        .operation_id("events.get_event")
        .summary("Get an event by id")
        .tag(TAG)
        .require_capability(Capability::ReadEvent)
        .handler(handlers::get_event)
        .register(router, registry);

    router = OperationBuilder::put("/api/events/{id}")
        .operation_id("events.replace_event")
        .summary("Replace an event")
        .tag(TAG)
        .require_capability(Capability::UpdateEvent)
        .handler(handlers::replace_event)
        .register(router, registry);

    router = OperationBuilder::delete("/api/events/{id}")
        .operation_id("events.delete_event")
        .summary("Delete an event")
        .tag(TAG)
        .require_capability(Capability::DeleteEvent)
        .handler(handlers::delete_event)
        .register(router, registry);

    router = OperationBuilder::get("/api/events/name/{name}")
        .operation_id("events.search_by_name")
        .summary("Find events by name")
        .tag(TAG)
        .require_capability(Capability::ReadEvent)
        .handler(handlers::search_by_name)
        .register(router, registry);

    router = OperationBuilder::get("/api/events/location/{location}")
        .operation_id("events.search_by_location")
        .summary("Find events by location")
        .tag(TAG)
        .require_capability(Capability::ReadEvent)
        .handler(handlers::search_by_location)
        .register(router, registry);

    // Build once, serve as static JSON (no per-request generation)
    let doc = Arc::new(EventsApiDoc::openapi());
    router = OperationBuilder::get("/api/events/openapi.json")
        .operation_id("events.openapi")
        .summary("OpenAPI document for the events API")
        .tag(TAG)
        .public()
        .handler(move || {
            let doc = Arc::clone(&doc);
            async move { Json(doc.as_ref().clone()) }
        })
        .register(router, registry);

    router = router.layer(Extension(service));

    router
}
