//! Domain errors for the `AuthN` resolver.

use std::path::PathBuf;

/// Errors raised while building a decoder from configuration.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("hmac signing secret is empty")]
    EmptySecret,

    #[error("algorithm {algorithm:?} cannot be used with {key_kind} key material")]
    KeyAlgorithmMismatch {
        algorithm: jsonwebtoken::Algorithm,
        key_kind: &'static str,
    },

    #[error("failed to read key file '{}': {source}", path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid key material: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),
}
