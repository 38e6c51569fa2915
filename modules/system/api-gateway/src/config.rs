use serde::Deserialize;

/// API gateway configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiGatewayConfig {
    pub bind_addr: String,

    /// If true, routes without an explicit requirement still require a valid bearer token.
    pub require_auth_by_default: bool,

    /// Requests running longer than this are answered with 504.
    pub request_timeout_secs: u64,

    /// Global defaults
    pub defaults: Defaults,

    /// Authorization gate settings
    pub gate: GateConfig,
}

impl Default for ApiGatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            require_auth_by_default: true,
            request_timeout_secs: 30,
            defaults: Defaults::default(),
            gate: GateConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Defaults {
    /// Global request body size limit in bytes
    pub body_limit_bytes: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GateConfig {
    /// Fraction (0.0 to 1.0) of allowed requests logged at `info`. Rejections are always logged.
    pub continue_sample_rate: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            continue_sample_rate: 0.01,
        }
    }
}
