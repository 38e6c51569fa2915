//! `AuthN` Resolver SDK
//!
//! This crate provides the public API for the `authn_resolver` module:
//!
//! - [`TokenDecoder`] - verifies a bearer credential and returns its [`Claims`]
//! - [`extract_subject`] - pulls the principal's subject id out of verified claims
//! - [`AuthNResolverError`] - the decode/extraction failure taxonomy

pub mod api;
pub mod error;
pub mod models;
pub mod subject;

pub use api::TokenDecoder;
pub use error::AuthNResolverError;
pub use models::Claims;
pub use subject::extract_subject;
