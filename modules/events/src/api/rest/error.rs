use evently_api::Problem;
use http::StatusCode;

use crate::domain::error::DomainError;

pub type ApiResult<T> = Result<T, Problem>;

/// Convert domain errors to HTTP Problem responses
pub fn domain_error_to_problem(err: DomainError) -> Problem {
    match err {
        DomainError::NotFound { id } => Problem::new(
            StatusCode::NOT_FOUND,
            "Event Not Found",
            format!("Event {id} not found"),
        )
        .with_code("event_not_found"),

        e @ DomainError::NoMatches { .. } => {
            Problem::new(StatusCode::NOT_FOUND, "No Matching Events", e.to_string())
                .with_code("no_matching_events")
        }

        DomainError::Validation { field, message } => Problem::new(
            StatusCode::BAD_REQUEST,
            "Validation Error",
            format!("{field}: {message}"),
        )
        .with_code("validation_error"),

        DomainError::Internal(message) => {
            tracing::error!(error = %message, "Events internal error");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal error occurred",
            )
            .with_code("internal_error")
        }
    }
}

/// Implement Into<Problem> for `DomainError` so `?` works in handlers
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(e)
    }
}
