#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthZ` Resolver SDK
//!
//! This crate provides the public API for the `authz_resolver` module:
//!
//! - [`AuthZResolverClient`] - Public API trait for consumers (the API gateway)
//! - [`GrantStore`] - Plugin API trait for grant store implementations
//! - [`AuthorizationDecision`], [`DenyReason`], [`DenyCode`] - Decision models
//! - [`GrantStoreError`] - Grant store failure taxonomy
//!
//! ## Usage
//!
//! ```ignore
//! use authz_resolver_sdk::{AuthZResolverClient, AuthorizationDecision};
//! use evently_security::Capability;
//!
//! match authz.resolve(ctx.subject_id(), Capability::DeleteEvent).await {
//!     AuthorizationDecision::Allowed => { /* continue */ }
//!     AuthorizationDecision::Denied(reason) => { /* reject with reason.code */ }
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::AuthZResolverClient;
pub use error::GrantStoreError;
pub use models::{AuthorizationDecision, DenyCode, DenyReason};
pub use plugin_api::GrantStore;
