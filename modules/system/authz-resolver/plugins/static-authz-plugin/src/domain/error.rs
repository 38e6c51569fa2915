//! Configuration errors for the static grant store.

use thiserror::Error;

/// Rejected grant configuration. The previous table stays active on reload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("subject '{subject_id}' references undefined role '{role}'")]
    UndefinedRole { subject_id: String, role: String },

    #[error("subject '{0}' is listed more than once")]
    DuplicateSubject(String),

    #[error("subject entry with a blank subject_id")]
    BlankSubject,

    #[error("subject_id '{0}' has leading or trailing whitespace")]
    PaddedSubject(String),
}
