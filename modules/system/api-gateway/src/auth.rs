use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::{collections::HashMap, sync::Arc};

use authn_resolver_sdk::{AuthNResolverError, TokenDecoder, extract_subject};
use authz_resolver_sdk::{AuthZResolverClient, AuthorizationDecision, DenyCode};
use evently_api::{AuthRequirement, OperationSpec, Problem};
use evently_security::{Capability, SecurityContext};

use crate::middleware::request_id::XRequestId;

/// Gateway-specific route policy implementation.
///
/// One `matchit` router per HTTP method, each mapping a path pattern to the
/// requirement declared when the operation was registered.
#[derive(Clone)]
pub struct GatewayRoutePolicy {
    matchers: Arc<HashMap<Method, matchit::Router<AuthRequirement>>>,
    require_auth_by_default: bool,
}

impl GatewayRoutePolicy {
    /// Build the policy from registered operation specs.
    ///
    /// Specs without an explicit requirement resolve to `Authenticated` when
    /// `require_auth_by_default` is set, `Public` otherwise.
    ///
    /// # Errors
    /// Returns an error if a path pattern cannot be inserted (e.g. conflicting wildcards).
    pub fn from_specs<'a>(
        specs: impl IntoIterator<Item = &'a OperationSpec>,
        require_auth_by_default: bool,
    ) -> anyhow::Result<Self> {
        let default = default_requirement(require_auth_by_default);
        let mut matchers: HashMap<Method, matchit::Router<AuthRequirement>> = HashMap::new();

        for spec in specs {
            let requirement = spec.auth.unwrap_or(default);
            matchers
                .entry(spec.method.clone())
                .or_default()
                .insert(spec.path.as_str(), requirement)
                .map_err(|e| {
                    anyhow::anyhow!("Failed to insert route pattern '{}': {e}", spec.path)
                })?;
        }

        Ok(Self {
            matchers: Arc::new(matchers),
            require_auth_by_default,
        })
    }

    /// Resolve the requirement for a given (method, path).
    ///
    /// Unregistered routes fall back to the default so that a 404 for a protected
    /// prefix is not distinguishable from a 401 without a token.
    ///
    /// axum answers `HEAD` with the `GET` handler, so `HEAD` carries the `GET`
    /// requirement unless a `HEAD` operation was registered explicitly.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> AuthRequirement {
        self.lookup(method, path)
            .or_else(|| {
                if *method == Method::HEAD {
                    self.lookup(&Method::GET, path)
                } else {
                    None
                }
            })
            .unwrap_or_else(|| default_requirement(self.require_auth_by_default))
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<AuthRequirement> {
        self.matchers
            .get(method)
            .and_then(|m| m.at(path).ok())
            .map(|matched| *matched.value)
    }
}

fn default_requirement(require_auth_by_default: bool) -> AuthRequirement {
    if require_auth_by_default {
        AuthRequirement::Authenticated
    } else {
        AuthRequirement::Public
    }
}

/// Position reached in the gate's state machine.
///
/// `Start -> TokenDecoded -> SubjectExtracted -> Resolved -> {Continue | Rejected}`;
/// a rejection records the stage it left from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStage {
    Start,
    TokenDecoded,
    SubjectExtracted,
    Resolved,
}

impl GateStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GateStage::Start => "start",
            GateStage::TokenDecoded => "token_decoded",
            GateStage::SubjectExtracted => "subject_extracted",
            GateStage::Resolved => "resolved",
        }
    }
}

/// Every way a request can be turned away by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    TokenMissing,
    TokenMalformed,
    TokenExpired,
    TokenSignatureInvalid,
    ClaimsRejected,
    SubjectMissing,
    PermissionDenied,
    ResolverUnavailable,
}

impl RejectionKind {
    /// Stable machine-readable code returned in the problem body.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            RejectionKind::TokenMissing => "token_missing",
            RejectionKind::TokenMalformed => "token_malformed",
            RejectionKind::TokenExpired => "token_expired",
            RejectionKind::TokenSignatureInvalid => "token_signature_invalid",
            RejectionKind::ClaimsRejected => "claims_rejected",
            RejectionKind::SubjectMissing => "subject_missing",
            RejectionKind::PermissionDenied => "permission_denied",
            RejectionKind::ResolverUnavailable => "resolver_unavailable",
        }
    }

    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            RejectionKind::PermissionDenied | RejectionKind::ResolverUnavailable => {
                StatusCode::FORBIDDEN
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Generic, client-safe problem body. Never carries the internal reason.
    #[must_use]
    pub fn to_problem(self) -> Problem {
        let (title, detail) = match self {
            RejectionKind::TokenMissing => {
                ("Unauthorized", "Missing or invalid Authorization header")
            }
            RejectionKind::PermissionDenied | RejectionKind::ResolverUnavailable => {
                ("Forbidden", "Access denied")
            }
            _ => ("Unauthorized", "Authentication failed"),
        };
        Problem::new(self.status(), title, detail).with_code(self.code())
    }
}

impl From<&AuthNResolverError> for RejectionKind {
    fn from(err: &AuthNResolverError) -> Self {
        match err {
            AuthNResolverError::TokenMissing => Self::TokenMissing,
            AuthNResolverError::TokenMalformed(_) => Self::TokenMalformed,
            AuthNResolverError::TokenExpired => Self::TokenExpired,
            AuthNResolverError::TokenSignatureInvalid => Self::TokenSignatureInvalid,
            AuthNResolverError::ClaimsRejected(_) => Self::ClaimsRejected,
            AuthNResolverError::SubjectMissing => Self::SubjectMissing,
        }
    }
}

/// A terminal `Rejected` state with everything operators need to know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub stage: GateStage,
    /// Internal reason; logged, never returned.
    pub reason: String,
    /// Known once the subject was extracted.
    pub subject_id: Option<String>,
}

impl Rejection {
    /// Error response with the problem's `instance` set to the rejected request's path.
    #[must_use]
    pub fn response_for(&self, path: &str) -> Response {
        self.build_response(self.kind.to_problem().with_instance(path))
    }

    fn build_response(&self, problem: Problem) -> Response {
        let mut response = problem.into_response();
        if self.kind.status() == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        self.build_response(self.kind.to_problem())
    }
}

#[derive(Debug)]
pub enum GateOutcome {
    Continue(SecurityContext),
    Rejected(Rejection),
}

/// Orchestrates token decoding, subject extraction and permission resolution.
///
/// Holds no per-request state; one instance serves every request.
#[derive(Clone)]
pub struct AuthorizationGate {
    decoder: Arc<dyn TokenDecoder>,
    authz: Arc<dyn AuthZResolverClient>,
}

impl AuthorizationGate {
    #[must_use]
    pub fn new(decoder: Arc<dyn TokenDecoder>, authz: Arc<dyn AuthZResolverClient>) -> Self {
        Self { decoder, authz }
    }

    /// Run the state machine for one request.
    ///
    /// `capability` of `None` means the route only needs an authenticated subject;
    /// the resolver is not consulted.
    pub async fn evaluate(&self, headers: &HeaderMap, capability: Option<Capability>) -> GateOutcome {
        // Start -> TokenDecoded
        let Some(token) = extract_bearer_token(headers) else {
            return reject(
                RejectionKind::TokenMissing,
                GateStage::Start,
                "no bearer credential".to_owned(),
                None,
            );
        };
        let claims = match self.decoder.decode(token) {
            Ok(claims) => claims,
            Err(e) => return reject((&e).into(), GateStage::Start, e.to_string(), None),
        };

        // TokenDecoded -> SubjectExtracted
        let subject_id = match extract_subject(&claims) {
            Ok(subject_id) => subject_id,
            Err(e) => return reject((&e).into(), GateStage::TokenDecoded, e.to_string(), None),
        };
        let ctx = SecurityContext::builder()
            .subject_id(subject_id.as_str())
            .bearer_token(token.to_owned())
            .build();

        let Some(capability) = capability else {
            return GateOutcome::Continue(ctx);
        };

        // SubjectExtracted -> Resolved
        match self.authz.resolve(&subject_id, capability).await {
            AuthorizationDecision::Allowed => GateOutcome::Continue(ctx),
            AuthorizationDecision::Denied(reason) => {
                let kind = match reason.code {
                    DenyCode::MissingCapability => RejectionKind::PermissionDenied,
                    DenyCode::ResolverUnavailable => RejectionKind::ResolverUnavailable,
                };
                reject(kind, GateStage::Resolved, reason.details, Some(subject_id))
            }
        }
    }
}

fn reject(
    kind: RejectionKind,
    stage: GateStage,
    reason: String,
    subject_id: Option<String>,
) -> GateOutcome {
    GateOutcome::Rejected(Rejection {
        kind,
        stage,
        reason,
        subject_id,
    })
}

/// Shared state for the authorization middleware.
#[derive(Clone)]
pub struct AuthState {
    pub gate: AuthorizationGate,
    pub route_policy: GatewayRoutePolicy,
    pub continue_sample_rate: f64,
}

/// Authorization middleware.
///
/// For each request:
/// 1. Skips CORS preflight requests
/// 2. Resolves the route's requirement via `GatewayRoutePolicy`
/// 3. For public routes: inserts anonymous `SecurityContext`
/// 4. Otherwise runs the `AuthorizationGate` and either inserts the caller's
///    `SecurityContext` or answers with a problem response
pub async fn authz_middleware(
    axum::extract::State(state): axum::extract::State<AuthState>,
    mut req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    let capability = match state.route_policy.resolve(req.method(), req.uri().path()) {
        AuthRequirement::Public => {
            req.extensions_mut().insert(SecurityContext::anonymous());
            return next.run(req).await;
        }
        AuthRequirement::Authenticated => None,
        AuthRequirement::Capability(capability) => Some(capability),
    };

    match state.gate.evaluate(req.headers(), capability).await {
        GateOutcome::Continue(ctx) => {
            if sampled(state.continue_sample_rate) {
                tracing::info!(
                    subject_id = ctx.subject_id(),
                    capability = capability.map(Capability::as_str),
                    method = %req.method(),
                    path = %req.uri().path(),
                    "Request allowed by authorization gate"
                );
            }
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        GateOutcome::Rejected(rejection) => {
            let request_id = req.extensions().get::<XRequestId>().map(|rid| rid.0.as_str());
            tracing::warn!(
                request_id,
                code = rejection.kind.code(),
                stage = rejection.stage.as_str(),
                reason = %rejection.reason,
                capability = capability.map(Capability::as_str),
                subject_id = rejection.subject_id.as_deref(),
                method = %req.method(),
                path = %req.uri().path(),
                "Request rejected by authorization gate"
            );
            rejection.response_for(req.uri().path())
        }
    }
}

fn sampled(rate: f64) -> bool {
    rate >= 1.0 || (rate > 0.0 && rand::random::<f64>() < rate)
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Check if this is a CORS preflight request
///
/// Preflight requests are OPTIONS requests with:
/// - Origin header present
/// - Access-Control-Request-Method header present
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}
