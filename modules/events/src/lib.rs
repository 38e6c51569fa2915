//! Events module
//!
//! CRUD and search over events. Every REST operation declares the capability it needs
//! through [`OperationBuilder`](evently_api::OperationBuilder); the gateway's authorization
//! gate enforces it before a handler runs, and handlers receive the caller's
//! [`SecurityContext`](evently_security::SecurityContext).
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
mod module;

pub use config::EventsConfig;
pub use module::EventsModule;
