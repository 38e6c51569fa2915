//! Public API trait for the `AuthN` resolver.

use crate::error::AuthNResolverError;
use crate::models::Claims;

/// Verifies bearer credentials.
///
/// Implementations must check the signature and expiry against configured key
/// material and must never return claims that were not verified. Decoding is a pure
/// computation, so the trait is synchronous.
pub trait TokenDecoder: Send + Sync {
    /// Verify `bearer_token` (without the `Bearer ` prefix) and return its claims.
    ///
    /// # Errors
    ///
    /// - `TokenMalformed` if the token cannot be parsed
    /// - `TokenExpired` if the `exp` claim is in the past
    /// - `TokenSignatureInvalid` if the signature does not verify
    /// - `ClaimsRejected` if issuer, audience or not-before checks fail
    fn decode(&self, bearer_token: &str) -> Result<Claims, AuthNResolverError>;
}
