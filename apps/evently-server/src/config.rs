//! Server configuration.
//!
//! Layers, lowest priority first:
//!
//! 1. Defaults of each section
//! 2. YAML file passed with `--config`
//! 3. `EVENTLY__<SECTION>__<KEY>` environment variables
//!    (e.g. `EVENTLY__API_GATEWAY__BIND_ADDR=0.0.0.0:8080`)

use std::path::Path;

use anyhow::{Context, Result, bail};
use api_gateway::ApiGatewayConfig;
use authn_resolver::AuthNResolverConfig;
use authz_resolver::AuthZResolverConfig;
use events::EventsConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use static_authz_plugin::StaticAuthZPluginConfig;

pub const ENV_PREFIX: &str = "EVENTLY__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub api_gateway: ApiGatewayConfig,
    pub authn_resolver: AuthNResolverConfig,
    pub authz_resolver: AuthZResolverConfig,
    pub static_authz_plugin: StaticAuthZPluginConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl AppConfig {
    /// Load configuration from an optional YAML file plus environment overrides.
    ///
    /// # Errors
    /// Returns an error if the file is missing or any layer fails to deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::figment(path)?
            .extract()
            .context("Failed to load configuration")
    }

    fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file_exact(path));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }
}
