//! `AuthN` Resolver Module
//!
//! Verifies bearer JWTs against the configured signing key, issuer and audience,
//! and exposes the result through the SDK's [`TokenDecoder`](authn_resolver_sdk::TokenDecoder)
//! trait for consumption by the API gateway.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::{AuthNResolverConfig, SigningKeyConfig};
pub use domain::{DomainError, JwtTokenDecoder};
