//! Type-safe operation builder.
//!
//! Uses a type-state so `register()` cannot be called before a handler is set, and records
//! the route's [`AuthRequirement`] next to the handler so the gateway can build its route
//! policy from the same source of truth the router is built from.

use std::marker::PhantomData;

use axum::{Router, handler::Handler, routing::MethodRouter};
use evently_security::Capability;
use http::Method;

/// Type-state markers for compile-time enforcement
pub mod state {
    /// Marker for missing required components
    #[derive(Debug, Clone, Copy)]
    pub struct Missing;

    /// Marker for present required components
    #[derive(Debug, Clone, Copy)]
    pub struct Present;
}

pub use state::{Missing, Present};

mod sealed {
    pub trait Sealed {}
}

/// Maps handler state to the concrete router slot type.
/// For `Missing` there is no router slot; for `Present` it is `MethodRouter<S>`.
pub trait HandlerSlot<S>: sealed::Sealed {
    type Slot;
}

impl sealed::Sealed for Missing {}
impl sealed::Sealed for Present {}

impl<S> HandlerSlot<S> for Missing {
    type Slot = ();
}

impl<S> HandlerSlot<S> for Present {
    type Slot = MethodRouter<S>;
}

/// What the authorization gate must establish before the handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    /// No credential required; the handler receives an anonymous context.
    Public,
    /// A valid bearer token with a subject is enough.
    Authenticated,
    /// A valid bearer token whose subject holds the capability.
    Capability(Capability),
}

/// Everything the gateway needs to know about a registered operation.
#[derive(Debug, Clone)]
pub struct OperationSpec {
    pub method: Method,
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    /// `None` defers to the gateway's `require_auth_by_default` setting.
    pub auth: Option<AuthRequirement>,
}

/// Sink for operation specs; implemented by the API gateway.
pub trait OperationRegistry: Send + Sync {
    fn register_operation(&self, spec: &OperationSpec);
}

pub struct OperationBuilder<H = Missing, S = ()>
where
    H: HandlerSlot<S>,
{
    spec: OperationSpec,
    method_router: <H as HandlerSlot<S>>::Slot,
    _has_handler: PhantomData<H>,
}

impl<S> OperationBuilder<Missing, S> {
    /// Start a builder for the given method and path (axum `{param}` syntax).
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            spec: OperationSpec {
                method,
                path: path.into(),
                operation_id: None,
                summary: None,
                tags: Vec::new(),
                auth: None,
            },
            method_router: (),
            _has_handler: PhantomData,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }
}

impl<H, S> OperationBuilder<H, S>
where
    H: HandlerSlot<S>,
{
    /// Inspect the spec (useful in tests).
    pub fn spec(&self) -> &OperationSpec {
        &self.spec
    }

    #[must_use]
    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.spec.operation_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn summary(mut self, text: impl Into<String>) -> Self {
        self.spec.summary = Some(text.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.spec.tags.push(tag.into());
        self
    }

    /// Mark this route as public (no authentication required).
    ///
    /// This explicitly opts out of the `require_auth_by_default` setting.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.spec.auth = Some(AuthRequirement::Public);
        self
    }

    /// Mark this route as requiring a valid bearer token, without a capability check.
    #[must_use]
    pub fn authenticated(mut self) -> Self {
        self.spec.auth = Some(AuthRequirement::Authenticated);
        self
    }

    /// Require the caller's subject to hold `capability`.
    #[must_use]
    pub fn require_capability(mut self, capability: Capability) -> Self {
        self.spec.auth = Some(AuthRequirement::Capability(capability));
        self
    }
}

impl<S> OperationBuilder<Missing, S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Set the handler for this operation.
    ///
    /// This transitions the builder from `Missing` to `Present` handler state.
    pub fn handler<F, T>(self, h: F) -> OperationBuilder<Present, S>
    where
        F: Handler<T, S> + Clone + Send + 'static,
        T: 'static,
    {
        let method_router = match self.spec.method {
            Method::GET => axum::routing::get(h),
            Method::POST => axum::routing::post(h),
            Method::PUT => axum::routing::put(h),
            Method::DELETE => axum::routing::delete(h),
            Method::PATCH => axum::routing::patch(h),
            _ => axum::routing::any(|| async { axum::http::StatusCode::METHOD_NOT_ALLOWED }),
        };

        OperationBuilder {
            spec: self.spec,
            method_router,
            _has_handler: PhantomData::<Present>,
        }
    }
}

impl<S> OperationBuilder<Present, S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Record the spec with the registry and mount the handler on the router.
    pub fn register(self, router: Router<S>, registry: &dyn OperationRegistry) -> Router<S> {
        registry.register_operation(&self.spec);
        router.route(&self.spec.path, self.method_router)
    }
}
