//! Configuration for the static `AuthZ` grant store plugin.

use std::collections::BTreeMap;

use evently_security::Capability;
use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthZPluginConfig {
    /// Named capability bundles.
    pub roles: BTreeMap<String, Vec<Capability>>,

    /// Per-subject grants.
    pub subjects: Vec<SubjectGrants>,
}

/// Grants for one subject.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectGrants {
    /// Matches the token's `sub` claim exactly.
    pub subject_id: String,

    #[serde(default)]
    pub capabilities: Vec<Capability>,

    /// Must name entries of [`StaticAuthZPluginConfig::roles`].
    #[serde(default)]
    pub roles: Vec<String>,
}
