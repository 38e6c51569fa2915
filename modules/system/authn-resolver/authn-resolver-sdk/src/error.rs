//! Error types for the `AuthN` resolver module.

use thiserror::Error;

/// Why a credential could not be turned into a principal.
///
/// Every variant is a caller-fixable credential problem; none is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthNResolverError {
    /// No bearer credential on the request.
    #[error("token missing")]
    TokenMissing,

    /// The credential is not a well-formed token.
    #[error("token malformed: {0}")]
    TokenMalformed(String),

    /// The token's `exp` claim has passed.
    #[error("token expired")]
    TokenExpired,

    /// The signature does not verify against the configured key.
    #[error("token signature invalid")]
    TokenSignatureInvalid,

    /// Signed and unexpired, but issuer, audience or not-before is unacceptable.
    #[error("token claims rejected: {0}")]
    ClaimsRejected(String),

    /// Verified claims carry no usable `sub`.
    #[error("subject claim missing")]
    SubjectMissing,
}
