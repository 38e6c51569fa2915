//! `OpenAPI` document for the events API.

use evently_api::Problem;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{EventDto, EventRequest};
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "Evently events API", description = "Events CRUD and search"),
    paths(
        handlers::create_event,
        handlers::list_events,
        handlers::get_event,
        handlers::replace_event,
        handlers::delete_event,
        handlers::search_by_name,
        handlers::search_by_location,
    ),
    components(schemas(EventDto, EventRequest, Problem)),
    modifiers(&BearerAuth),
    tags((name = "events", description = "Events, gated per capability"))
)]
pub struct EventsApiDoc;

/// Adds the `bearerAuth` scheme referenced by every operation.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
