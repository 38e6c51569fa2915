//! REST building blocks shared by the gateway and feature modules.
//!
//! - [`OperationBuilder`] registers a handler together with its [`OperationSpec`], so the
//!   gateway learns each route's [`AuthRequirement`] at registration time.
//! - [`Problem`] is the RFC 9457 error body used for every non-2xx response.

pub mod operation_builder;
pub mod problem;

pub use operation_builder::{AuthRequirement, OperationBuilder, OperationRegistry, OperationSpec};
pub use problem::Problem;
