//! API Gateway definition
//!
//! Contains the `ApiGateway` struct: operation registry, middleware stack and HTTP server.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use axum::http::Method;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::{Router, extract::DefaultBodyLimit};
use dashmap::DashMap;
use evently_api::{OperationBuilder, OperationRegistry, OperationSpec};
use tokio_util::sync::CancellationToken;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::auth::{self, AuthorizationGate};
use crate::config::ApiGatewayConfig;
use crate::middleware;
use crate::web;

/// Owns the HTTP server and collects the operation specs that drive the route policy.
pub struct ApiGateway {
    // Lock-free config using arc-swap for read-mostly access
    config: ArcSwap<ApiGatewayConfig>,
    // Registered operations keyed by (method, path)
    operation_specs: DashMap<(Method, String), OperationSpec>,
    // Duplicate detection per operation id
    registered_handlers: DashMap<String, ()>,
}

impl Default for ApiGateway {
    fn default() -> Self {
        Self::new(ApiGatewayConfig::default())
    }
}

impl ApiGateway {
    /// Create a new `ApiGateway` instance with the given configuration
    #[must_use]
    pub fn new(config: ApiGatewayConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            operation_specs: DashMap::new(),
            registered_handlers: DashMap::new(),
        }
    }

    /// Get the current configuration (cheap clone from `ArcSwap`)
    #[must_use]
    pub fn get_config(&self) -> ApiGatewayConfig {
        (**self.config.load()).clone()
    }

    /// Snapshot of every registered operation.
    #[must_use]
    pub fn operation_specs(&self) -> Vec<OperationSpec> {
        self.operation_specs
            .iter()
            .map(|e| e.value().clone())
            .collect()
    }

    /// Build route policy from operation specs.
    ///
    /// # Errors
    /// Returns an error if two registered paths conflict in the matcher.
    pub fn build_route_policy(&self) -> Result<auth::GatewayRoutePolicy> {
        let config = self.get_config();
        let specs = self.operation_specs();
        let route_policy =
            auth::GatewayRoutePolicy::from_specs(&specs, config.require_auth_by_default)?;

        tracing::info!(
            require_auth_by_default = config.require_auth_by_default,
            operations_count = specs.len(),
            "Route policy built from operation specs"
        );

        Ok(route_policy)
    }

    /// Mount the health endpoint, then wrap the router in the full middleware stack.
    ///
    /// Call once, after every module has registered its operations.
    ///
    /// # Errors
    /// Returns an error if the route policy cannot be built.
    pub fn finalize(&self, router: Router, gate: AuthorizationGate) -> Result<Router> {
        let router = OperationBuilder::get("/health")
            .operation_id("api_gateway.health")
            .summary("Liveness probe")
            .tag("system")
            .public()
            .handler(web::health_check)
            .register(router, self);

        let router = self.apply_middleware_stack(router, gate)?;
        tracing::info!("API gateway finalized router with authorization gate");
        Ok(router)
    }

    /// Apply all middleware layers to a router (request ID, tracing, timeout, body limit, authorization gate)
    fn apply_middleware_stack(&self, mut router: Router, gate: AuthorizationGate) -> Result<Router> {
        // Build route policy once
        let route_policy = self.build_route_policy()?;
        let config = self.get_config();

        // IMPORTANT: `axum::Router::layer(...)` behaves like Tower layers: the **last** added layer
        // becomes the **outermost** layer and therefore runs **first** on the request path.
        //
        // Desired request execution order (outermost -> innermost):
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
        // -> Timeout -> BodyLimit -> AuthorizationGate -> Router
        //
        // Therefore we must add layers in the reverse order (innermost -> outermost) below.

        // 5) Authorization gate
        let auth_state = auth::AuthState {
            gate,
            route_policy,
            continue_sample_rate: config.gate.continue_sample_rate,
        };
        router = router.layer(from_fn_with_state(auth_state, auth::authz_middleware));

        // 4) Body limit
        router = router.layer(RequestBodyLimitLayer::new(config.defaults.body_limit_bytes));
        router = router.layer(DefaultBodyLimit::max(config.defaults.body_limit_bytes));

        // 3) Timeout
        router = router.layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::GATEWAY_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ));

        // 2) Record request_id into span + extensions (requires span to exist first => must be inner to Trace)
        router = router.layer(from_fn(middleware::request_id::push_req_id_to_extensions));

        // 1) Trace (outer to push_req_id_to_extensions)
        router = router.layer({
            use tower_http::trace::TraceLayer;
            use tracing::field::Empty;

            TraceLayer::new_for_http()
                .make_span_with(move |req: &axum::http::Request<axum::body::Body>| {
                    let hdr = middleware::request_id::header();
                    let rid = req
                        .headers()
                        .get(&hdr)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("n/a");

                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        version = ?req.version(),
                        module = "api_gateway",
                        request_id = %rid,
                        status = Empty,
                        latency_ms = Empty,
                        "user_agent.original" = req.headers().get("user-agent")
                            .and_then(|h| h.to_str().ok())
                            .unwrap_or("unknown")
                    )
                })
                .on_response(
                    |res: &axum::http::Response<axum::body::Body>,
                     latency: Duration,
                     span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", latency.as_millis());
                    },
                )
        });

        // 0) Request ID handling
        let x_request_id = middleware::request_id::header();
        // If missing, generate x-request-id first; then propagate it to the response.
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router = router.layer(SetRequestIdLayer::new(
            x_request_id,
            middleware::request_id::MakeReqId,
        ));

        Ok(router)
    }

    /// Parse bind address from configuration string.
    fn parse_bind_address(bind_addr: &str) -> Result<SocketAddr> {
        bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind_addr}': {e}"))
    }

    /// Bind and serve until `cancel` fires, then drain in-flight requests.
    ///
    /// # Errors
    /// Returns an error if the bind address is invalid, the socket cannot be bound,
    /// or the server fails.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let cfg = self.get_config();
        let addr = Self::parse_bind_address(&cfg.bind_addr)?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", addr);

        // Graceful shutdown on cancel
        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }

    /// Check if the operation id is already registered (returns true if duplicate)
    fn check_duplicate_handler(&self, spec: &OperationSpec) -> bool {
        let Some(operation_id) = &spec.operation_id else {
            return false;
        };
        if self
            .registered_handlers
            .insert(operation_id.clone(), ())
            .is_some()
        {
            tracing::error!(
                operation_id = %operation_id,
                method = %spec.method.as_str(),
                path = %spec.path,
                "Duplicate operation_id detected; ignoring subsequent registration"
            );
            return true;
        }
        false
    }

    /// Check if route (method, path) is already registered (returns true if duplicate)
    fn check_duplicate_route(&self, spec: &OperationSpec) -> bool {
        let route_key = (spec.method.clone(), spec.path.clone());
        if self.operation_specs.contains_key(&route_key) {
            tracing::error!(
                method = %spec.method.as_str(),
                path = %spec.path,
                "Duplicate (method, path) detected; ignoring subsequent registration"
            );
            return true;
        }
        false
    }
}

impl OperationRegistry for ApiGateway {
    fn register_operation(&self, spec: &OperationSpec) {
        // Reject duplicates with "first wins" policy (second registration = programmer error).
        if self.check_duplicate_route(spec) {
            return;
        }
        if self.check_duplicate_handler(spec) {
            return;
        }

        self.operation_specs
            .insert((spec.method.clone(), spec.path.clone()), spec.clone());

        tracing::debug!(
            operation_id = %spec.operation_id.as_deref().unwrap_or("n/a"),
            method = %spec.method.as_str(),
            path = %spec.path,
            summary = %spec.summary.as_deref().unwrap_or("No summary"),
            total_operations = self.operation_specs.len(),
            "Registered API operation"
        );
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use evently_api::AuthRequirement;
    use evently_security::Capability;
    use tracing_test::traced_test;

    fn spec(method: Method, path: &str, id: &str, auth: Option<AuthRequirement>) -> OperationSpec {
        OperationSpec {
            method,
            path: path.to_owned(),
            operation_id: Some(id.to_owned()),
            summary: None,
            tags: Vec::new(),
            auth,
        }
    }

    #[test]
    #[traced_test]
    fn duplicate_route_keeps_first_registration() {
        let api = ApiGateway::default();
        api.register_operation(&spec(
            Method::GET,
            "/api/events",
            "events.list",
            Some(AuthRequirement::Capability(Capability::ReadEvent)),
        ));
        api.register_operation(&spec(
            Method::GET,
            "/api/events",
            "events.list_again",
            Some(AuthRequirement::Public),
        ));

        let specs = api.operation_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].operation_id.as_deref(), Some("events.list"));
        assert!(logs_contain("Duplicate (method, path) detected"));

        let policy = api.build_route_policy().unwrap();
        assert_eq!(
            policy.resolve(&Method::GET, "/api/events"),
            AuthRequirement::Capability(Capability::ReadEvent)
        );
    }

    #[test]
    #[traced_test]
    fn duplicate_operation_id_is_ignored() {
        let api = ApiGateway::default();
        api.register_operation(&spec(Method::GET, "/a", "same.id", None));
        api.register_operation(&spec(Method::GET, "/b", "same.id", None));

        assert_eq!(api.operation_specs().len(), 1);
        assert!(logs_contain("Duplicate operation_id detected"));
    }

    #[test]
    fn same_path_different_methods_both_register() {
        let api = ApiGateway::default();
        api.register_operation(&spec(Method::GET, "/api/events", "events.list", None));
        api.register_operation(&spec(Method::POST, "/api/events", "events.create", None));

        assert_eq!(api.operation_specs().len(), 2);
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        assert!(ApiGateway::parse_bind_address("not-an-addr").is_err());
        assert!(ApiGateway::parse_bind_address("0.0.0.0:8080").is_ok());
    }
}
