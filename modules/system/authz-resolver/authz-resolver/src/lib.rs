//! `AuthZ` Resolver Module
//!
//! Answers "may this subject invoke this capability?" by consulting a
//! [`GrantStore`](authz_resolver_sdk::GrantStore) under a timeout, optionally through a
//! TTL-bounded grant cache, and folding every failure into a denial.
//!
//! Provides the `AuthZResolverClient` implementation consumed by the API gateway.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::{AuthZResolverConfig, CacheConfig, RetryConfig};
pub use domain::{AuthZResolverLocalClient, DomainError, GrantCache, Service};
