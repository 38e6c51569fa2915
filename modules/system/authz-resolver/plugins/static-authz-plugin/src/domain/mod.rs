//! Domain layer for the static `AuthZ` grant store plugin.

mod client;
pub mod error;
pub mod service;

pub use error::ConfigError;
pub use service::StaticGrantStore;
