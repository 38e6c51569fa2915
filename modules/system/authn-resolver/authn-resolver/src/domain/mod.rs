//! Domain layer for the `AuthN` resolver.

pub mod error;
pub mod service;

pub use error::DomainError;
pub use service::JwtTokenDecoder;
