//! Module wiring: token decoder, grant store, resolver, gateway and feature modules.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use api_gateway::ApiGateway;
use api_gateway::auth::AuthorizationGate;
use authn_resolver::JwtTokenDecoder;
use authz_resolver::{AuthZResolverLocalClient, Service};
use axum::Router;
use events::EventsModule;
use static_authz_plugin::StaticGrantStore;

use crate::config::AppConfig;

pub struct App {
    pub gateway: ApiGateway,
    pub router: Router,
    pub grant_store: Arc<StaticGrantStore>,
    pub authz: Arc<Service>,
}

/// Build every component and the finalized router.
///
/// # Errors
/// Returns an error if the signing key or the grant table is invalid, or if the
/// route policy cannot be built.
pub fn build(cfg: &AppConfig) -> Result<App> {
    let decoder = JwtTokenDecoder::from_config(&cfg.authn_resolver)
        .context("Failed to initialise token decoder")?;

    let grant_store = Arc::new(
        StaticGrantStore::from_config(&cfg.static_authz_plugin)
            .context("Invalid static grant configuration")?,
    );
    let authz = Arc::new(Service::new(grant_store.clone(), &cfg.authz_resolver));
    let gate = AuthorizationGate::new(
        Arc::new(decoder),
        Arc::new(AuthZResolverLocalClient::new(authz.clone())),
    );

    let gateway = ApiGateway::new(cfg.api_gateway.clone());
    let events = EventsModule::new(cfg.events.clone());
    let router = events.register_rest(Router::new(), &gateway);
    let router = gateway.finalize(router, gate)?;

    Ok(App {
        gateway,
        router,
        grant_store,
        authz,
    })
}

/// Re-read the config file and swap in its grant table.
///
/// On error the previous table stays in effect. On success every cached grant set
/// is dropped. A lookup already in flight may still cache the old grants, so a
/// revocation is guaranteed to apply within one cache TTL.
///
/// # Errors
/// Returns an error if the file cannot be loaded or the new grant table is invalid.
pub fn reload_grants(path: Option<&Path>, store: &StaticGrantStore, authz: &Service) -> Result<()> {
    let cfg = AppConfig::load(path)?;
    store
        .reload(&cfg.static_authz_plugin)
        .context("Invalid static grant configuration")?;
    authz.invalidate_all();
    tracing::info!(subjects = store.subject_count(), "Grant table reloaded");
    Ok(())
}
