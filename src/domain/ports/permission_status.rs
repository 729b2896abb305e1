//! Permission Status Port
//!
//! Read-only view of what the user has already granted.

use crate::domain::entities::{PermissionKind, LOCATION_PERMISSIONS};

/// Current grant state held by the platform.
pub trait PermissionStatus: Send + Sync {
    /// Whether `kind` is granted right now.
    fn is_granted(&self, kind: PermissionKind) -> bool;

    /// Whether fine or coarse location is granted.
    fn any_location_granted(&self) -> bool {
        LOCATION_PERMISSIONS.iter().any(|k| self.is_granted(*k))
    }
}
