use secrecy::SecretString;

/// `SecurityContext` carries the authenticated principal through the request lifecycle.
///
/// Built by the authorization gate after the bearer token has been verified and its
/// subject extracted, then attached to the request extensions for downstream handlers.
/// Public routes receive [`SecurityContext::anonymous`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SecurityContext {
    /// Subject ID: the opaque, stable identifier from the token's `sub` claim.
    /// Empty for anonymous contexts.
    subject_id: String,
    /// Original bearer token. Never serialized/persisted.
    /// Wrapped in `SecretString` so `Debug` redacts the value automatically.
    #[serde(skip)]
    bearer_token: Option<SecretString>,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Create an anonymous `SecurityContext` with no subject
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    /// Get the subject ID associated with the security context
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Whether this context was produced for a public route (no subject).
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.subject_id.is_empty()
    }

    /// Get the original bearer token.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&SecretString> {
        self.bearer_token.as_ref()
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    subject_id: Option<String>,
    bearer_token: Option<SecretString>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn subject_id(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<SecretString>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            subject_id: self.subject_id.unwrap_or_default(),
            bearer_token: self.bearer_token,
        }
    }
}
