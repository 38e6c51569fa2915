//! Configuration for the `AuthN` resolver.

use std::path::PathBuf;

use jsonwebtoken::Algorithm;
use secrecy::SecretString;
use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthNResolverConfig {
    /// The only signing algorithm accepted. Tokens whose header names a different
    /// algorithm are rejected.
    pub algorithm: Algorithm,

    /// Verification key material; must match the family of `algorithm`.
    pub key: SigningKeyConfig,

    /// Required `iss` claim, if set.
    pub issuer: Option<String>,

    /// Accepted `aud` values. Empty disables the audience check.
    pub audience: Vec<String>,

    /// Clock skew tolerance applied to `exp` and `nbf`, in seconds.
    pub leeway_secs: u64,
}

impl Default for AuthNResolverConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::HS256,
            key: SigningKeyConfig::default(),
            issuer: None,
            audience: Vec::new(),
            leeway_secs: 0,
        }
    }
}

/// Where the verification key comes from.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SigningKeyConfig {
    /// Shared secret for the `HS*` algorithms.
    Hmac { secret: SecretString },
    /// PEM-encoded public key for the `RS*`, `PS*`, `ES*` and `EdDSA` algorithms.
    PemFile { path: PathBuf },
}

impl Default for SigningKeyConfig {
    fn default() -> Self {
        Self::Hmac {
            secret: SecretString::from(String::new()),
        }
    }
}
