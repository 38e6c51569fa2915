//! Capability catalog.
//!
//! Routes declare the capability they require with a variant of [`Capability`], and grant
//! stores hand back sets of the same type, so a typo in either place fails to compile
//! (or fails to deserialize at config load) instead of silently changing a decision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named, statically known operation a caller may wish to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Create a new event.
    CreateEvent,
    /// Read events: list, get by id, search by name or location.
    ReadEvent,
    /// Replace an existing event.
    UpdateEvent,
    /// Delete an event.
    DeleteEvent,
}

impl Capability {
    /// Every capability known to the process.
    pub const ALL: [Capability; 4] = [
        Capability::CreateEvent,
        Capability::ReadEvent,
        Capability::UpdateEvent,
        Capability::DeleteEvent,
    ];

    /// Stable wire name, identical to the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Capability::CreateEvent => "create-event",
            Capability::ReadEvent => "read-event",
            Capability::UpdateEvent => "update-event",
            Capability::DeleteEvent => "delete-event",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability: {0}")]
pub struct UnknownCapability(pub String);

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCapability(s.to_owned()))
    }
}
