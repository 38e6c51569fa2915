//! Grant table for the static `AuthZ` grant store plugin.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arc_swap::ArcSwap;
use evently_security::Capability;

use super::error::ConfigError;
use crate::config::StaticAuthZPluginConfig;

type GrantTable = HashMap<String, HashSet<Capability>>;

/// Configuration-backed grant store.
pub struct StaticGrantStore {
    table: ArcSwap<GrantTable>,
}

impl StaticGrantStore {
    /// Build the store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a subject references an undefined role, a subject is listed
    /// twice, or a subject id is blank or padded with whitespace.
    pub fn from_config(cfg: &StaticAuthZPluginConfig) -> Result<Self, ConfigError> {
        let table = build_table(cfg)?;
        tracing::info!(
            subjects = table.len(),
            roles = cfg.roles.len(),
            "Static grant table loaded"
        );
        Ok(Self {
            table: ArcSwap::from_pointee(table),
        })
    }

    /// Atomically replace the grant table.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_config`]; on error the current table is kept.
    pub fn reload(&self, cfg: &StaticAuthZPluginConfig) -> Result<(), ConfigError> {
        let table = build_table(cfg)?;
        tracing::info!(
            subjects = table.len(),
            roles = cfg.roles.len(),
            "Static grant table reloaded"
        );
        self.table.store(Arc::new(table));
        Ok(())
    }

    /// Grants for `subject_id`; empty for unknown subjects.
    #[must_use]
    pub fn lookup(&self, subject_id: &str) -> HashSet<Capability> {
        self.table
            .load()
            .get(subject_id)
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.table.load().len()
    }
}

fn build_table(cfg: &StaticAuthZPluginConfig) -> Result<GrantTable, ConfigError> {
    let mut table = GrantTable::with_capacity(cfg.subjects.len());

    for entry in &cfg.subjects {
        let subject_id = entry.subject_id.as_str();
        if subject_id.trim().is_empty() {
            return Err(ConfigError::BlankSubject);
        }
        // Subject ids are matched byte for byte against the token's `sub`.
        if subject_id.trim() != subject_id {
            return Err(ConfigError::PaddedSubject(subject_id.to_owned()));
        }

        let mut grants: HashSet<Capability> = entry.capabilities.iter().copied().collect();
        for role in &entry.roles {
            let role_caps = cfg
                .roles
                .get(role)
                .ok_or_else(|| ConfigError::UndefinedRole {
                    subject_id: subject_id.to_owned(),
                    role: role.clone(),
                })?;
            grants.extend(role_caps.iter().copied());
        }

        if table.insert(subject_id.to_owned(), grants).is_some() {
            return Err(ConfigError::DuplicateSubject(subject_id.to_owned()));
        }
    }

    Ok(table)
}
