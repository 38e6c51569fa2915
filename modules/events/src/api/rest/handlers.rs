use std::sync::Arc;

use axum::extract::{Extension, Json, Path};
use evently_api::Problem;
use evently_security::SecurityContext;
use http::StatusCode;

use super::dto::{EventDto, EventRequest};
use super::error::ApiResult;
use super::routes::ConcreteService;
use crate::domain::model::SearchField;

fn to_dtos(events: Vec<crate::domain::model::Event>) -> Vec<EventDto> {
    events.into_iter().map(EventDto::from).collect()
}

/// Create an event
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = EventDto),
        (status = 400, description = "Invalid event", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Missing or invalid bearer token", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller lacks `create-event`", body = Problem, content_type = "application/problem+json"),
    ),
    security(("bearerAuth" = []))
)]
#[tracing::instrument(skip(svc, ctx, req_body))]
pub async fn create_event(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<ConcreteService>>,
    Json(req_body): Json<EventRequest>,
) -> ApiResult<(StatusCode, Json<EventDto>)> {
    let event = svc.create_event(&ctx, req_body.into()).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// List all events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "events",
    responses(
        (status = 200, description = "All events, ordered by id", body = [EventDto]),
        (status = 401, description = "Missing or invalid bearer token", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller lacks `read-event`", body = Problem, content_type = "application/problem+json"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_events(
    Extension(svc): Extension<Arc<ConcreteService>>,
) -> ApiResult<Json<Vec<EventDto>>> {
    Ok(Json(to_dtos(svc.list_events().await?)))
}

/// Get an event by id
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event found", body = EventDto),
        (status = 404, description = "No event with this id", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Missing or invalid bearer token", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller lacks `read-event`", body = Problem, content_type = "application/problem+json"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_event(
    Extension(svc): Extension<Arc<ConcreteService>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EventDto>> {
    Ok(Json(svc.get_event(id).await?.into()))
}

/// Replace an event
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event replaced", body = EventDto),
        (status = 400, description = "Invalid event", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "No event with this id", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Missing or invalid bearer token", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller lacks `update-event`", body = Problem, content_type = "application/problem+json"),
    ),
    security(("bearerAuth" = []))
)]
#[tracing::instrument(skip(svc, ctx, req_body))]
pub async fn replace_event(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<ConcreteService>>,
    Path(id): Path<i64>,
    Json(req_body): Json<EventRequest>,
) -> ApiResult<Json<EventDto>> {
    let event = svc.replace_event(&ctx, id, req_body.into()).await?;
    Ok(Json(event.into()))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted; body is the removed event", body = EventDto),
        (status = 404, description = "No event with this id", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Missing or invalid bearer token", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller lacks `delete-event`", body = Problem, content_type = "application/problem+json"),
    ),
    security(("bearerAuth" = []))
)]
#[tracing::instrument(skip(svc, ctx))]
pub async fn delete_event(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<ConcreteService>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EventDto>> {
    Ok(Json(svc.delete_event(&ctx, id).await?.into()))
}

/// Find events whose name contains the term (case-insensitive)
#[utoipa::path(
    get,
    path = "/api/events/name/{name}",
    tag = "events",
    params(("name" = String, Path, description = "Search term")),
    responses(
        (status = 200, description = "Matching events, ordered by id", body = [EventDto]),
        (status = 404, description = "No event name contains the term", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Missing or invalid bearer token", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller lacks `read-event`", body = Problem, content_type = "application/problem+json"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn search_by_name(
    Extension(svc): Extension<Arc<ConcreteService>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<EventDto>>> {
    Ok(Json(to_dtos(svc.search(SearchField::Name, &name).await?)))
}

/// Find events whose location contains the term (case-insensitive)
#[utoipa::path(
    get,
    path = "/api/events/location/{location}",
    tag = "events",
    params(("location" = String, Path, description = "Search term")),
    responses(
        (status = 200, description = "Matching events, ordered by id", body = [EventDto]),
        (status = 404, description = "No event location contains the term", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Missing or invalid bearer token", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller lacks `read-event`", body = Problem, content_type = "application/problem+json"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn search_by_location(
    Extension(svc): Extension<Arc<ConcreteService>>,
    Path(location): Path<String>,
) -> ApiResult<Json<Vec<EventDto>>> {
    Ok(Json(to_dtos(
        svc.search(SearchField::Location, &location).await?,
    )))
}
