//! JWT implementation of the token decoder.

use authn_resolver_sdk::{AuthNResolverError, Claims, TokenDecoder};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::ExposeSecret;

use super::DomainError;
use crate::config::{AuthNResolverConfig, SigningKeyConfig};

/// Verifies compact JWS tokens with a single configured algorithm and key.
///
/// Signature, `exp` and (when configured) `nbf`, `iss` and `aud` are checked by
/// `jsonwebtoken` before any claim is handed out.
pub struct JwtTokenDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenDecoder")
            .field("algorithms", &self.validation.algorithms)
            .field("iss", &self.validation.iss)
            .field("aud", &self.validation.aud)
            .finish_non_exhaustive()
    }
}

impl JwtTokenDecoder {
    /// Build a decoder from resolver configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty, the key file cannot be read or parsed,
    /// or the key kind does not match the configured algorithm.
    pub fn from_config(cfg: &AuthNResolverConfig) -> Result<Self, DomainError> {
        let key = decoding_key(cfg.algorithm, &cfg.key)?;

        let mut validation = Validation::new(cfg.algorithm);
        validation.leeway = cfg.leeway_secs;
        validation.validate_nbf = true;
        if let Some(iss) = &cfg.issuer {
            validation.set_issuer(&[iss]);
        }
        if cfg.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&cfg.audience);
        }

        tracing::info!(
            algorithm = ?cfg.algorithm,
            issuer = cfg.issuer.as_deref().unwrap_or("<any>"),
            audiences = cfg.audience.len(),
            "JWT token decoder configured"
        );

        Ok(Self { key, validation })
    }
}

impl TokenDecoder for JwtTokenDecoder {
    fn decode(&self, bearer_token: &str) -> Result<Claims, AuthNResolverError> {
        if bearer_token.trim().is_empty() {
            return Err(AuthNResolverError::TokenMissing);
        }

        decode::<Claims>(bearer_token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| map_jwt_error(&e))
    }
}

fn map_jwt_error(err: &jsonwebtoken::errors::Error) -> AuthNResolverError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthNResolverError::TokenExpired,
        // A token signed with another algorithm cannot be verified with our key.
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            AuthNResolverError::TokenSignatureInvalid
        }
        ErrorKind::InvalidIssuer => AuthNResolverError::ClaimsRejected("issuer".to_owned()),
        ErrorKind::InvalidAudience => AuthNResolverError::ClaimsRejected("audience".to_owned()),
        ErrorKind::ImmatureSignature => {
            AuthNResolverError::ClaimsRejected("not yet valid".to_owned())
        }
        ErrorKind::InvalidSubject => AuthNResolverError::ClaimsRejected("subject".to_owned()),
        _ => AuthNResolverError::TokenMalformed(err.to_string()),
    }
}

#[derive(Clone, Copy)]
enum KeyFamily {
    Hmac,
    Rsa,
    Ec,
    Ed,
}

fn family(algorithm: Algorithm) -> KeyFamily {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => KeyFamily::Hmac,
        Algorithm::ES256 | Algorithm::ES384 => KeyFamily::Ec,
        Algorithm::EdDSA => KeyFamily::Ed,
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => KeyFamily::Rsa,
    }
}

fn decoding_key(algorithm: Algorithm, key: &SigningKeyConfig) -> Result<DecodingKey, DomainError> {
    match (key, family(algorithm)) {
        (SigningKeyConfig::Hmac { secret }, KeyFamily::Hmac) => {
            let secret = secret.expose_secret();
            if secret.is_empty() {
                return Err(DomainError::EmptySecret);
            }
            Ok(DecodingKey::from_secret(secret.as_bytes()))
        }
        (SigningKeyConfig::Hmac { .. }, _) => Err(DomainError::KeyAlgorithmMismatch {
            algorithm,
            key_kind: "hmac",
        }),
        (SigningKeyConfig::PemFile { .. }, KeyFamily::Hmac) => {
            Err(DomainError::KeyAlgorithmMismatch {
                algorithm,
                key_kind: "pem",
            })
        }
        (SigningKeyConfig::PemFile { path }, family) => {
            let pem = std::fs::read(path).map_err(|source| DomainError::KeyFile {
                path: path.clone(),
                source,
            })?;
            let key = match family {
                KeyFamily::Rsa => DecodingKey::from_rsa_pem(&pem)?,
                KeyFamily::Ec => DecodingKey::from_ec_pem(&pem)?,
                KeyFamily::Ed | KeyFamily::Hmac => DecodingKey::from_ed_pem(&pem)?,
            };
            Ok(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hmac_config(secret: &str) -> AuthNResolverConfig {
        AuthNResolverConfig {
            key: SigningKeyConfig::Hmac {
                secret: secret.to_owned().into(),
            },
            ..AuthNResolverConfig::default()
        }
    }

    #[test]
    fn default_config_is_rejected() {
        let err = JwtTokenDecoder::from_config(&AuthNResolverConfig::default()).unwrap_err();
        assert!(matches!(err, DomainError::EmptySecret));
    }

    #[test]
    fn hmac_secret_with_rsa_algorithm_is_rejected() {
        let cfg = AuthNResolverConfig {
            algorithm: Algorithm::RS256,
            ..hmac_config("s3cret")
        };
        let err = JwtTokenDecoder::from_config(&cfg).unwrap_err();
        assert!(matches!(
            err,
            DomainError::KeyAlgorithmMismatch {
                key_kind: "hmac",
                ..
            }
        ));
    }

    #[test]
    fn pem_file_with_hmac_algorithm_is_rejected() {
        let cfg = AuthNResolverConfig {
            key: SigningKeyConfig::PemFile {
                path: "/nonexistent/key.pem".into(),
            },
            ..AuthNResolverConfig::default()
        };
        let err = JwtTokenDecoder::from_config(&cfg).unwrap_err();
        assert!(matches!(err, DomainError::KeyAlgorithmMismatch { .. }));
    }

    #[test]
    fn missing_pem_file_is_reported() {
        let cfg = AuthNResolverConfig {
            algorithm: Algorithm::RS256,
            key: SigningKeyConfig::PemFile {
                path: "/nonexistent/key.pem".into(),
            },
            ..AuthNResolverConfig::default()
        };
        let err = JwtTokenDecoder::from_config(&cfg).unwrap_err();
        assert!(matches!(err, DomainError::KeyFile { .. }));
    }

    #[test]
    fn blank_token_is_missing() {
        let decoder = JwtTokenDecoder::from_config(&hmac_config("s3cret")).unwrap();
        assert_eq!(decoder.decode("  "), Err(AuthNResolverError::TokenMissing));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let decoder = JwtTokenDecoder::from_config(&hmac_config("s3cret")).unwrap();
        assert!(matches!(
            decoder.decode("not-a-jwt"),
            Err(AuthNResolverError::TokenMalformed(_))
        ));
    }

    #[test]
    fn debug_does_not_leak_key() {
        let decoder = JwtTokenDecoder::from_config(&hmac_config("very-secret")).unwrap();
        assert!(!format!("{decoder:?}").contains("very-secret"));
    }
}
