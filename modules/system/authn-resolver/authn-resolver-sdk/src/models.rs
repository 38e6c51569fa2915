//! Domain models for the `AuthN` resolver module.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Verified claim set.
///
/// Only produced by a [`TokenDecoder`](crate::TokenDecoder) after signature and expiry
/// checks have passed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Standard subject claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// String or array of strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Any remaining claims, untouched.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
