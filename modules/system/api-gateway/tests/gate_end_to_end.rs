#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Full request path: real JWT decoder, real resolver and static grant store,
//! behind the gateway's middleware stack.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use api_gateway::auth::AuthorizationGate;
use api_gateway::{ApiGateway, ApiGatewayConfig};
use async_trait::async_trait;
use authn_resolver::{AuthNResolverConfig, JwtTokenDecoder, SigningKeyConfig};
use authz_resolver::{AuthZResolverConfig, AuthZResolverLocalClient, Service};
use authz_resolver_sdk::{GrantStore, GrantStoreError};
use axum::body::Body;
use axum::extract::Path;
use axum::http::{Request, StatusCode, header};
use axum::{Extension, Router};
use evently_api::{OperationBuilder, Problem};
use evently_security::{Capability, SecurityContext};
use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
use secrecy::SecretString;
use serde_json::{Value, json};
use static_authz_plugin::{StaticAuthZPluginConfig, StaticGrantStore, SubjectGrants};
use tower::ServiceExt;

const SECRET: &[u8] = b"integration-test-secret";

/// Wraps a grant store and counts lookups.
struct Counting<S> {
    inner: S,
    calls: AtomicUsize,
}

#[async_trait]
impl<S: GrantStore> GrantStore for Counting<S> {
    async fn grants_for(&self, subject_id: &str) -> Result<HashSet<Capability>, GrantStoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.grants_for(subject_id).await
    }
}

/// Never answers.
struct HangingStore;

#[async_trait]
impl GrantStore for HangingStore {
    async fn grants_for(&self, _subject_id: &str) -> Result<HashSet<Capability>, GrantStoreError> {
        std::future::pending().await
    }
}

fn grants(subject: &str, caps: &[Capability]) -> StaticAuthZPluginConfig {
    StaticAuthZPluginConfig {
        roles: BTreeMap::new(),
        subjects: vec![SubjectGrants {
            subject_id: subject.to_owned(),
            capabilities: caps.to_vec(),
            roles: Vec::new(),
        }],
    }
}

fn token_for(sub: &str, exp: u64) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": sub, "exp": exp }),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

fn valid_token(sub: &str) -> String {
    token_for(sub, get_current_timestamp() + 3600)
}

fn decoder() -> JwtTokenDecoder {
    JwtTokenDecoder::from_config(&AuthNResolverConfig {
        key: SigningKeyConfig::Hmac {
            secret: SecretString::from(String::from_utf8(SECRET.to_vec()).unwrap()),
        },
        ..AuthNResolverConfig::default()
    })
    .unwrap()
}

async fn create_event(Extension(ctx): Extension<SecurityContext>) -> (StatusCode, String) {
    (StatusCode::CREATED, ctx.subject_id().to_owned())
}

async fn list_events() -> &'static str {
    "[]"
}

async fn delete_event(Path(id): Path<i64>) -> StatusCode {
    assert!(id > 0);
    StatusCode::NO_CONTENT
}

async fn whoami(Extension(ctx): Extension<SecurityContext>) -> String {
    ctx.subject_id().to_owned()
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(3600)).await;
    "done"
}

async fn echo(body: String) -> String {
    body
}

fn app(
    store: Arc<dyn GrantStore>,
    authz_cfg: &AuthZResolverConfig,
    gw_cfg: ApiGatewayConfig,
) -> Router {
    let api = ApiGateway::new(gw_cfg);

    let router = OperationBuilder::post("/api/events")
        .operation_id("events.create")
        .require_capability(Capability::CreateEvent)
        .handler(create_event)
        .register(Router::new(), &api);
    let router = OperationBuilder::get("/api/events")
        .operation_id("events.list")
        .require_capability(Capability::ReadEvent)
        .handler(list_events)
        .register(router, &api);
    let router = OperationBuilder::delete("/api/events/{id}")
        .operation_id("events.delete")
        .require_capability(Capability::DeleteEvent)
        .handler(delete_event)
        .register(router, &api);
    let router = OperationBuilder::get("/api/me")
        .operation_id("me.get")
        .authenticated()
        .handler(whoami)
        .register(router, &api);
    let router = OperationBuilder::get("/slow")
        .operation_id("slow.get")
        .public()
        .handler(slow)
        .register(router, &api);
    let router = OperationBuilder::post("/echo")
        .operation_id("echo.post")
        .public()
        .handler(echo)
        .register(router, &api);

    let authz = Arc::new(AuthZResolverLocalClient::new(Arc::new(Service::new(
        store, authz_cfg,
    ))));
    let gate = AuthorizationGate::new(Arc::new(decoder()), authz);

    api.finalize(router, gate).unwrap()
}

fn counting_store(cfg: &StaticAuthZPluginConfig) -> Arc<Counting<StaticGrantStore>> {
    Arc::new(Counting {
        inner: StaticGrantStore::from_config(cfg).unwrap(),
        calls: AtomicUsize::new(0),
    })
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn read_problem(response: axum::response::Response) -> Problem {
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn granted_capability_reaches_handler() {
    let store = counting_store(&grants("u1", &[Capability::CreateEvent]));
    let router = app(
        store.clone(),
        &AuthZResolverConfig::default(),
        ApiGatewayConfig::default(),
    );

    let response = router
        .oneshot(authed("POST", "/api/events", &valid_token("u1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"u1");
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_capability_is_forbidden() {
    let store = counting_store(&grants("u1", &[Capability::CreateEvent]));
    let router = app(store, &AuthZResolverConfig::default(), ApiGatewayConfig::default());

    let response = router
        .oneshot(authed("DELETE", "/api/events/42", &valid_token("u1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let problem = read_problem(response).await;
    assert_eq!(problem.code.as_deref(), Some("permission_denied"));
    assert!(!problem.detail.contains("delete-event"));
    assert_eq!(problem.instance.as_deref(), Some("/api/events/42"));
}

#[tokio::test]
async fn expired_token_never_reaches_resolver() {
    let store = counting_store(&grants("u1", &[Capability::CreateEvent]));
    let router = app(
        store.clone(),
        &AuthZResolverConfig::default(),
        ApiGatewayConfig::default(),
    );

    let expired = token_for("u1", get_current_timestamp() - 3600);
    let response = router
        .oneshot(authed("POST", "/api/events", &expired))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    let problem = read_problem(response).await;
    assert_eq!(problem.code.as_deref(), Some("token_expired"));
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn head_is_gated_like_get() {
    for require_auth_by_default in [true, false] {
        let store = counting_store(&grants("u1", &[Capability::ReadEvent]));
        let gw_cfg = ApiGatewayConfig {
            require_auth_by_default,
            ..ApiGatewayConfig::default()
        };
        let router = app(store.clone(), &AuthZResolverConfig::default(), gw_cfg);

        let response = router
            .clone()
            .oneshot(authed("HEAD", "/api/events", &valid_token("nobody")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = router
            .clone()
            .oneshot(Request::head("/api/events").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = router
            .oneshot(authed("HEAD", "/api/events", &valid_token("u1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }
}

#[tokio::test]
async fn padded_subject_is_a_different_principal() {
    let store = counting_store(&grants("u1", &[Capability::CreateEvent]));
    let router = app(store, &AuthZResolverConfig::default(), ApiGatewayConfig::default());

    let response = router
        .clone()
        .oneshot(authed("POST", "/api/events", &valid_token(" u1 ")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .oneshot(authed("POST", "/api/events", &valid_token("u1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test(start_paused = true)]
async fn grant_store_timeout_fails_closed() {
    let authz_cfg = AuthZResolverConfig {
        grant_store_timeout_ms: 50,
        ..AuthZResolverConfig::default()
    };
    let router = app(Arc::new(HangingStore), &authz_cfg, ApiGatewayConfig::default());

    let response = router
        .oneshot(authed("POST", "/api/events", &valid_token("u1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let problem = read_problem(response).await;
    assert_eq!(problem.code.as_deref(), Some("resolver_unavailable"));
}

#[tokio::test]
async fn credential_failures_map_to_401_codes() {
    let store = counting_store(&grants("u1", &[Capability::CreateEvent]));
    let router = app(
        store.clone(),
        &AuthZResolverConfig::default(),
        ApiGatewayConfig::default(),
    );

    let forged = encode(
        &Header::default(),
        &json!({ "sub": "u1", "exp": get_current_timestamp() + 3600 }),
        &EncodingKey::from_secret(b"someone-elses-secret"),
    )
    .unwrap();
    let no_sub = encode(
        &Header::default(),
        &json!({ "exp": get_current_timestamp() + 3600 }),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    let cases = [
        (Some("Bearer not.a.jwt".to_owned()), "token_malformed"),
        (Some(format!("Bearer {forged}")), "token_signature_invalid"),
        (Some(format!("Bearer {no_sub}")), "subject_missing"),
        (Some("Basic dTE6cHc=".to_owned()), "token_missing"),
        (None, "token_missing"),
    ];

    for (authorization, code) in cases {
        let mut req = Request::post("/api/events");
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        let response = router
            .clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{code}");
        assert_eq!(read_problem(response).await.code.as_deref(), Some(code));
    }
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn authenticated_route_needs_token_but_no_grant() {
    let store = counting_store(&grants("someone-else", &[]));
    let router = app(
        store.clone(),
        &AuthZResolverConfig::default(),
        ApiGatewayConfig::default(),
    );

    let response = router
        .clone()
        .oneshot(authed("GET", "/api/me", &valid_token("u7")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(Request::get("/api/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn health_is_public() {
    let store = counting_store(&grants("u1", &[]));
    let router = app(store, &AuthZResolverConfig::default(), ApiGatewayConfig::default());

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn unknown_route_requires_auth_by_default() {
    let store = counting_store(&grants("u1", &[]));
    let router = app(store, &AuthZResolverConfig::default(), ApiGatewayConfig::default());

    let response = router
        .clone()
        .oneshot(Request::get("/api/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .oneshot(authed("GET", "/api/unknown", &valid_token("u1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn request_id_is_generated_and_propagated() {
    let store = counting_store(&grants("u1", &[]));
    let router = app(store, &AuthZResolverConfig::default(), ApiGatewayConfig::default());

    let response = router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let generated = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());

    // Rejections carry the caller's id too.
    let response = router
        .oneshot(
            Request::post("/api/events")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
}

#[tokio::test(start_paused = true)]
async fn slow_handler_times_out_with_504() {
    let store = counting_store(&grants("u1", &[]));
    let gw_cfg = ApiGatewayConfig {
        request_timeout_secs: 1,
        ..ApiGatewayConfig::default()
    };
    let router = app(store, &AuthZResolverConfig::default(), gw_cfg);

    let response = router
        .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let store = counting_store(&grants("u1", &[]));
    let mut gw_cfg = ApiGatewayConfig::default();
    gw_cfg.defaults.body_limit_bytes = 16;
    let router = app(store, &AuthZResolverConfig::default(), gw_cfg);

    let payload = "x".repeat(1024);
    let response = router
        .clone()
        .oneshot(
            Request::post("/echo")
                .header(header::CONTENT_LENGTH, payload.len())
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let response = router
        .oneshot(Request::post("/echo").body(Body::from("small")).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
