use super::model::SearchField;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Event {id} not found")]
    NotFound { id: i64 },

    #[error("No event {} contains '{term}'", field.as_str())]
    NoMatches { field: SearchField, term: String },

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
