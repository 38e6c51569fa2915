//! Security primitives shared by the gateway, the resolvers and feature modules.
//!
//! - [`SecurityContext`] is the authenticated principal attached to a request.
//! - [`Capability`] is the closed catalog of operations a route can protect.

pub mod capability;
pub mod context;

pub use capability::{Capability, UnknownCapability};
pub use context::SecurityContext;
