//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::Deserialize;

/// Identity of one permission request.
///
/// Travels with the prompt to the platform and comes back with the result,
/// so results can be routed to the caller that asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// What the permission gate does when a request arrives while another
/// one is still waiting for the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum PermissionPolicy {
    /// Fail the new request with `Busy`; the outstanding one is untouched.
    RejectIfBusy,
    /// Drop every outstanding request (their callers see `Superseded`).
    OverwriteAndDrop,
    /// Keep every request; results are routed by request id.
    Queue,
}

impl PermissionPolicy {
    /// Parse a policy name (`reject`, `overwrite`, `queue`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "reject-if-busy" => Some(Self::RejectIfBusy),
            "overwrite" | "overwrite-and-drop" => Some(Self::OverwriteAndDrop),
            "queue" => Some(Self::Queue),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RejectIfBusy => "reject",
            Self::OverwriteAndDrop => "overwrite",
            Self::Queue => "queue",
        }
    }
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self::RejectIfBusy
    }
}

impl std::fmt::Display for PermissionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
