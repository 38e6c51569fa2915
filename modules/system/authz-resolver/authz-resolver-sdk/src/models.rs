//! Domain models for the `AuthZ` resolver module.

use std::fmt;

use evently_security::Capability;
use serde::{Deserialize, Serialize};

/// Outcome of one permission check. Never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AuthorizationDecision {
    Allowed,
    Denied(DenyReason),
}

impl AuthorizationDecision {
    /// Denial for a subject whose grants do not include `capability`.
    #[must_use]
    pub fn missing_capability(capability: Capability) -> Self {
        Self::Denied(DenyReason {
            code: DenyCode::MissingCapability,
            details: format!("missing capability: {capability}"),
        })
    }

    /// Denial produced when the grant store could not answer.
    #[must_use]
    pub fn resolver_unavailable(details: impl Into<String>) -> Self {
        Self::Denied(DenyReason {
            code: DenyCode::ResolverUnavailable,
            details: details.into(),
        })
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Why a decision was `Denied`.
///
/// `details` is for operators; it is logged and never returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenyReason {
    pub code: DenyCode,
    pub details: String,
}

/// Machine-readable denial category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyCode {
    /// The subject's grants do not include the capability.
    MissingCapability,
    /// The grant store failed, timed out or returned unusable data.
    ResolverUnavailable,
}

impl DenyCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DenyCode::MissingCapability => "missing_capability",
            DenyCode::ResolverUnavailable => "resolver_unavailable",
        }
    }
}

impl fmt::Display for DenyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
