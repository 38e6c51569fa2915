#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static `AuthZ` Grant Store Plugin
//!
//! Serves subject grants from configuration. A subject's grant set is the union of
//! its direct capabilities and the capabilities of every role it holds. Subjects not
//! listed have no grants.
//!
//! The grant table lives behind an [`arc_swap::ArcSwap`], so [`StaticGrantStore::reload`]
//! replaces it atomically: in-flight lookups finish against the old table and every
//! later lookup sees the new one.
//!
//! ## Configuration
//!
//! ```yaml
//! static_authz_plugin:
//!   roles:
//!     organizer: [create-event, read-event, update-event]
//!     viewer: [read-event]
//!   subjects:
//!     - subject_id: "auth0|u1"
//!       roles: [organizer]
//!       capabilities: [delete-event]
//!     - subject_id: "auth0|u2"
//!       roles: [viewer]
//! ```

pub mod config;
pub mod domain;

pub use config::{StaticAuthZPluginConfig, SubjectGrants};
pub use domain::{ConfigError, StaticGrantStore};
