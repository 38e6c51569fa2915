//! API Gateway
//!
//! Owns the HTTP server and every concern that sits in front of module handlers:
//!
//! - collecting [`OperationSpec`](evently_api::OperationSpec)s from modules and detecting
//!   duplicate registrations
//! - deriving the per-route [`GatewayRoutePolicy`](auth::GatewayRoutePolicy) from those specs
//! - the [`AuthorizationGate`](auth::AuthorizationGate): token decoding, subject extraction and
//!   capability resolution before a protected handler runs
//! - the middleware stack, in request order:
//!   set request id -> propagate request id -> trace -> push request id to extensions
//!   -> timeout -> body limit -> authorization gate -> router
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod auth;
pub mod config;
pub mod middleware;
mod module;
mod web;

pub use config::ApiGatewayConfig;
pub use module::ApiGateway;
