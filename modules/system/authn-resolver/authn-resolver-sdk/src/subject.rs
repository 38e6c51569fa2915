//! Subject extraction.

use crate::error::AuthNResolverError;
use crate::models::Claims;

/// Return the subject identifier found under the standard `sub` claim, exactly as
/// issued. The id is opaque: it is never trimmed or normalised.
///
/// # Errors
///
/// `SubjectMissing` when the claim is absent or blank.
pub fn extract_subject(claims: &Claims) -> Result<String, AuthNResolverError> {
    match claims.sub.as_deref() {
        Some(sub) if !sub.trim().is_empty() => Ok(sub.to_owned()),
        _ => Err(AuthNResolverError::SubjectMissing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_sub(sub: Option<&str>) -> Claims {
        Claims {
            sub: sub.map(str::to_owned),
            exp: 1,
            ..Claims::default()
        }
    }

    #[test]
    fn returns_subject() {
        let claims = claims_with_sub(Some("auth0|u1"));
        assert_eq!(extract_subject(&claims), Ok("auth0|u1".to_owned()));
    }

    #[test]
    fn missing_subject_fails() {
        assert_eq!(
            extract_subject(&claims_with_sub(None)),
            Err(AuthNResolverError::SubjectMissing)
        );
    }

    #[test]
    fn blank_subject_fails() {
        assert_eq!(
            extract_subject(&claims_with_sub(Some("   "))),
            Err(AuthNResolverError::SubjectMissing)
        );
    }

    #[test]
    fn surrounding_whitespace_is_preserved() {
        assert_eq!(
            extract_subject(&claims_with_sub(Some(" u1 "))),
            Ok(" u1 ".to_owned())
        );
    }

    #[test]
    fn subject_is_not_read_from_other_claims() {
        let mut claims = claims_with_sub(None);
        claims
            .extra
            .insert("user_id".to_owned(), serde_json::json!("u1"));
        assert_eq!(
            extract_subject(&claims),
            Err(AuthNResolverError::SubjectMissing)
        );
    }
}
